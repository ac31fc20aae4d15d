// src/territory/mod.rs

// Territorien: Punktquelle -> Geometrie -> Flächensummen -> Senke
pub mod area;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod points;
pub mod report;
pub mod sink;
pub mod source;

pub use area::{AreaAggregator, CellMeasurement, TerritoryTotals};
pub use config::PipelineConfig;
pub use error::{RegionError, SinkError, SourceError, TerritoryError, TerritoryResult};
pub use pipeline::{
    CycleOutcome, CycleReport, RunSummary, Schedule, SkippedPoint, TerritoryCell,
    TerritoryPipeline, compute_territories,
};
pub use points::{OwnedPoint, PointRow};
pub use sink::{AreaRow, AreaSink, JsonFileSink, MemorySink};
pub use source::{JsonFileSource, MemorySource, PointSource};
