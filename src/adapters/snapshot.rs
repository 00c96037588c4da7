use crate::adapters::http::RatesPayload;
use crate::domain::model::RateSeries;
use crate::domain::ports::FallbackSource;
use crate::utils::error::{FxError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SNAPSHOT_PATH: &str = "data/sample_fx.json";

/// Fallback backed by a JSON file in the upstream range-response shape.
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_series(&self) -> Result<RateSeries> {
        let content = fs::read_to_string(&self.path)?;
        let payload: RatesPayload = serde_json::from_str(&content)?;
        payload.into_series()
    }
}

impl FallbackSource for JsonSnapshot {
    fn load(&self) -> Result<RateSeries> {
        tracing::info!("Loading fallback data from {}", self.path.display());

        self.read_series().map_err(|e| FxError::DataUnavailable {
            message: format!("{}: {}", self.path.display(), e),
        })
    }
}

/// 將上游回應寫成快照檔案（fetch-snapshot 使用）
pub fn save_snapshot(path: &Path, payload: &RatesPayload) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(payload)?;
    fs::write(path, json)?;
    Ok(())
}
