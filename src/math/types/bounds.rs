// src/math/types/bounds.rs

use crate::math::types::{Point2D, length};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D Bounding Box (Axis-Aligned Bounding Box)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    /// Erstellt eine Bounding Box aus zwei beliebigen Punkten
    pub fn from_points(p1: Point2D, p2: Point2D) -> Self {
        Self {
            min: Point2D {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
            },
            max: Point2D {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
            },
        }
    }

    /// Weltausdehnung: Länge [-180, 180], Breite [-90, 90]
    pub fn world() -> Self {
        Self::from_points(
            Point2D { x: -180.0, y: -90.0 },
            Point2D { x: 180.0, y: 90.0 },
        )
    }

    /// Prüft ob die Bounding Box gültig ist
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    /// Fläche der Bounding Box (in Grad², wenn die Achsen Grad sind)
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Länge der Diagonale
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    /// Prüft ob ein Punkt in der Bounding Box liegt (Rand inklusive)
    pub fn contains_point(&self, point: Point2D) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Abstand eines Punkts zur Box, 0 für Punkte innerhalb oder auf dem Rand
    pub fn distance_to(&self, point: Point2D) -> f64 {
        let nearest = Point2D {
            x: point.x.max(self.min.x).min(self.max.x),
            y: point.y.max(self.min.y).min(self.max.y),
        };
        length(point - nearest)
    }

    /// Eckpunkte gegen den Uhrzeigersinn, beginnend unten links
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.min,
            Point2D {
                x: self.max.x,
                y: self.min.y,
            },
            self.max,
            Point2D {
                x: self.min.x,
                y: self.max.y,
            },
        ]
    }
}

impl Default for Bounds2D {
    fn default() -> Self {
        Self::world()
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}]",
            self.min.x, self.max.x, self.min.y, self.max.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::coord;

    #[test]
    fn world_bounds_area() {
        let world = Bounds2D::world();
        assert_relative_eq!(world.area(), 64800.0);
        assert!(world.contains_point(coord! { x: 180.0, y: -90.0 }));
        assert!(!world.contains_point(coord! { x: 180.1, y: 0.0 }));
    }

    #[test]
    fn diagonal_and_distance() {
        let bounds = Bounds2D::from_points(coord! { x: 3.0, y: -1.0 }, coord! { x: -2.0, y: 5.0 });
        assert_relative_eq!(bounds.diagonal(), 61.0f64.sqrt());
        assert_relative_eq!(bounds.distance_to(coord! { x: 0.0, y: 0.0 }), 0.0);
        assert_relative_eq!(bounds.distance_to(coord! { x: 3.0, y: 7.0 }), 2.0);
        assert_relative_eq!(bounds.distance_to(coord! { x: 6.0, y: -5.0 }), 5.0);
    }

    #[test]
    fn corners_are_counter_clockwise() {
        let c = Bounds2D::world().corners();
        assert_eq!(c[0], coord! { x: -180.0, y: -90.0 });
        assert_eq!(c[2], coord! { x: 180.0, y: 90.0 });
    }

    #[test]
    fn deserializes_from_json() {
        let bounds: Bounds2D =
            serde_json::from_str(r#"{"min":{"x":-10.0,"y":-5.0},"max":{"x":10.0,"y":5.0}}"#)
                .unwrap();
        assert_relative_eq!(bounds.area(), 200.0);
    }
}
