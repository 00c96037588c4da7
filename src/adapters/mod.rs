// Adapters layer: concrete implementations of the domain ports (upstream http, snapshot file).

pub mod http;
pub mod snapshot;

pub use http::{HttpRateProvider, RatesPayload};
pub use snapshot::JsonSnapshot;
