// src/territory/config.rs

use crate::math::voronoi::GeometryConfig;
use crate::territory::error::{TerritoryError, TerritoryResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Konfiguration für den gesamten Territorien-Prozess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Clip-Rechteck, Strahllänge, Umrechnungsfaktor.
    pub geometry: GeometryConfig,
    /// Sekunden zwischen zwei Zyklusstarts.
    pub interval_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            interval_secs: 60,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Liest eine JSON-Datei; fehlende Felder behalten ihre Standardwerte.
    pub fn from_json_file(path: impl AsRef<Path>) -> TerritoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TerritoryError::Config {
            message: format!("cannot read '{}': {e}", path.display()),
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| TerritoryError::Config {
            message: format!("cannot parse '{}': {e}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_geometry(mut self, geometry: GeometryConfig) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_interval_secs(mut self, secs: u64) -> Self {
        self.interval_secs = secs;
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn validate(&self) -> TerritoryResult<()> {
        self.geometry.validate()?;
        if self.interval_secs == 0 {
            return Err(TerritoryError::Config {
                message: "interval_secs must be greater than 0.".to_string(),
            });
        }
        Ok(())
    }
}
