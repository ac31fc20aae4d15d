// src/math/algorithms/mod.rs

pub mod clipping;

// Clipping
pub use self::clipping::{BoundedClipper, ClippedPolygon};
