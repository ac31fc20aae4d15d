// src/math/types/vector.rs
//
// `geo::Coord` bringt Add/Sub/Mul/Div mit, aber keine Längen- und Skalarprodukt-Helfer.

use super::Point2D;
use crate::math::utils::constants;

/// Skalarprodukt zweier Vektoren
pub fn dot(a: Point2D, b: Point2D) -> f64 {
    a.x * b.x + a.y * b.y
}

/// z-Komponente des Kreuzprodukts; > 0 wenn `b` links von `a` liegt
pub fn cross(a: Point2D, b: Point2D) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Länge eines Vektors
pub fn length(v: Point2D) -> f64 {
    dot(v, v).sqrt()
}

/// Normiert einen Vektor, `None` bei (nahezu) Nullvektor
pub fn normalize(v: Point2D) -> Option<Point2D> {
    let len_sq = dot(v, v);
    if len_sq < constants::EPSILON_SQUARED || !len_sq.is_finite() {
        return None;
    }
    Some(v / len_sq.sqrt())
}

/// Dreht einen Vektor um 90° gegen den Uhrzeigersinn: (x, y) -> (-y, x)
pub fn perpendicular(v: Point2D) -> Point2D {
    Point2D { x: -v.y, y: v.x }
}

/// Arithmetisches Mittel einer Punktmenge
pub fn mean(points: impl IntoIterator<Item = Point2D>) -> Option<Point2D> {
    let mut sum = Point2D { x: 0.0, y: 0.0 };
    let mut count = 0usize;
    for p in points {
        sum = sum + p;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}
