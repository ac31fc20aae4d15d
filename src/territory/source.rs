// src/territory/source.rs

use crate::territory::{error::SourceError, points::OwnedPoint, points::PointRow};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Liefert die Anspruchspunkte eines Zyklus. Eine leere Liste heißt "nichts zu tun".
pub trait PointSource {
    fn fetch(&mut self) -> Result<Vec<OwnedPoint>, SourceError>;
}

impl<F> PointSource for F
where
    F: FnMut() -> Result<Vec<OwnedPoint>, SourceError>,
{
    fn fetch(&mut self) -> Result<Vec<OwnedPoint>, SourceError> {
        self()
    }
}

/// Feste Punktmenge im Speicher.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    points: Vec<OwnedPoint>,
}

impl MemorySource {
    pub fn new(points: Vec<OwnedPoint>) -> Self {
        Self { points }
    }

    pub fn set_points(&mut self, points: Vec<OwnedPoint>) {
        self.points = points;
    }
}

impl PointSource for MemorySource {
    fn fetch(&mut self) -> Result<Vec<OwnedPoint>, SourceError> {
        Ok(self.points.clone())
    }
}

/// JSON-Datei mit einem Array aus `{ owner_id, latitude, longitude }`.
/// Wird bei jedem Zyklus neu gelesen.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointSource for JsonFileSource {
    fn fetch(&mut self) -> Result<Vec<OwnedPoint>, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let rows: Vec<PointRow> =
            serde_json::from_str(&content).map_err(|source| SourceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!("JsonFileSource: read {} rows from {}", rows.len(), self.path.display());

        rows.into_iter()
            .enumerate()
            .map(|(index, row)| row.into_owned_point(index))
            .collect()
    }
}
