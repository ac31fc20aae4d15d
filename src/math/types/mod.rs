// src/math/types/mod.rs
pub mod bounds;
pub mod vector;

pub use bounds::*;
pub use vector::*;

// Re-export häufig verwendete externe Typen
pub use geo::Coord;
pub use spade::Point2;

// Einheitliche Typen für das gesamte Modul (x = Länge, y = Breite)
pub type Point2D = Coord<f64>;
pub type SpadePoint = Point2<f64>;

pub fn to_spade_point(point: Point2D) -> SpadePoint {
    SpadePoint::new(point.x, point.y)
}

pub fn from_spade_point(point: SpadePoint) -> Point2D {
    Point2D {
        x: point.x,
        y: point.y,
    }
}
