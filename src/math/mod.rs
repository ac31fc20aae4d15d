// src/math/mod.rs
pub mod algorithms;
pub mod error;
pub mod types;
pub mod utils;
pub mod voronoi;

// Re-exports für einfache Verwendung
pub use error::{MathError, MathResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        algorithms::clipping::{BoundedClipper, ClippedPolygon},
        error::{MathError, MathResult},
        types::*,
        voronoi::{
            FiniteRegionReconstructor, FiniteVoronoi, GeometryConfig, PlanarVoronoiBuilder,
            RegionError, VertexRef, VoronoiDiagram,
        },
    };
}
