// src/territory/error.rs
use crate::math::MathError;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::math::voronoi::finite::RegionError;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read point source '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse point source '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid point row #{index}: {reason}")]
    InvalidRow { index: usize, reason: String },

    #[error("Point source unavailable: {message}")]
    Unavailable { message: String },
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write area sink '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize area totals: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Area sink unavailable: {message}")]
    Unavailable { message: String },
}

/// Fehler, die einen ganzen Zyklus abbrechen. Es wird dann nichts veröffentlicht.
#[derive(Error, Debug)]
pub enum TerritoryError {
    #[error("Diagram construction failed: {0}")]
    Input(#[from] MathError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

pub type TerritoryResult<T> = Result<T, TerritoryError>;
