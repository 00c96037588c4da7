pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{HttpRateProvider, JsonSnapshot};
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{cache::RateCache, client::RateClient};
pub use crate::server::{AppState, LiveRateClient};
pub use crate::utils::error::{FxError, Result};
