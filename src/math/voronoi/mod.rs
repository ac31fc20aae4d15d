// src/math/voronoi/mod.rs

// Deklaration der Untermodule für Voronoi-spezifische Funktionalität
pub mod config;
pub mod diagram; // Enthält VertexRef, Ridge, VoronoiDiagram, PlanarVoronoiBuilder
pub mod finite;

// Re-Exporte für den einfachen Zugriff auf die wichtigsten Voronoi-Elemente
pub use self::config::GeometryConfig;
pub use self::diagram::{PlanarVoronoiBuilder, Ridge, VertexRef, VoronoiDiagram};
pub use self::finite::{FiniteRegionReconstructor, FiniteVoronoi, RegionError};
