// src/territory/sink.rs

use crate::territory::{area::TerritoryTotals, error::SinkError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Nimmt die Gesamtflächen eines Zyklus entgegen.
///
/// Vertrag: alle bisherigen Zeilen werden durch `totals` ersetzt (kein Merge),
/// und Leser sehen nie einen halb geschriebenen Zustand.
pub trait AreaSink {
    fn replace_all(&mut self, totals: &TerritoryTotals) -> Result<(), SinkError>;
}

/// Ausgabezeile, eindeutig je `owner_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRow {
    pub owner_id: String,
    pub area_sq_miles: f64,
}

/// Hält die zuletzt veröffentlichten Werte im Speicher.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    totals: Option<TerritoryTotals>,
    publish_count: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zuletzt veröffentlichte Werte, `None` vor dem ersten Zyklus.
    pub fn totals(&self) -> Option<&TerritoryTotals> {
        self.totals.as_ref()
    }

    pub fn publish_count(&self) -> usize {
        self.publish_count
    }
}

impl AreaSink for MemorySink {
    fn replace_all(&mut self, totals: &TerritoryTotals) -> Result<(), SinkError> {
        self.totals = Some(totals.clone());
        self.publish_count += 1;
        Ok(())
    }
}

/// Schreibt ein JSON-Array aus `AreaRow`. Erst in eine temporäre Datei im selben
/// Verzeichnis, dann per `rename` über die Zieldatei.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "areas.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl AreaSink for JsonFileSink {
    fn replace_all(&mut self, totals: &TerritoryTotals) -> Result<(), SinkError> {
        let rows: Vec<AreaRow> = totals
            .iter()
            .map(|(owner, area)| AreaRow {
                owner_id: owner.to_string(),
                area_sq_miles: area,
            })
            .collect();
        let json = serde_json::to_string_pretty(&rows)?;

        let temp = self.temp_path();
        std::fs::write(&temp, json).map_err(|source| SinkError::Io {
            path: temp.clone(),
            source,
        })?;
        std::fs::rename(&temp, &self.path).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("JsonFileSink: wrote {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}
