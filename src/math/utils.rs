// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f64 = 1e-10;
    pub const EPSILON_SQUARED: f64 = EPSILON * EPSILON;
    /// 1° Breite ≈ 69 Meilen
    pub const MILES_PER_DEGREE_LAT: f64 = 69.0;
    /// Mindestanzahl eindeutiger Punkte für ein Voronoi-Diagramm
    pub const MIN_VORONOI_POINTS: usize = 4;
    /// Wie oft ein Strahlradius höchstens verdoppelt wird, um das Clip-Rechteck abzudecken
    pub const MAX_RAY_DOUBLINGS: usize = 40;
}

/// Winkel-Hilfsfunktionen
pub mod angles {
    /// Konvertiert Grad zu Radiant
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    /// Polarwinkel von `point` um `center`, Bereich (-π, π]
    pub fn polar_angle(center: crate::math::Point2D, point: crate::math::Point2D) -> f64 {
        (point.y - center.y).atan2(point.x - center.x)
    }
}
