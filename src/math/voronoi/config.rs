// src/math/voronoi/config.rs

use crate::math::{
    error::{MathError, MathResult},
    types::{Bounds2D, Point2D},
    utils::constants,
};
use serde::{Deserialize, Serialize};

/// Konfiguration der Geometrie-Pipeline: Clip-Rechteck, Strahllänge und Umrechnungsfaktor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Rechteck, gegen das alle Zellen geclippt werden (Standard: Weltausdehnung).
    pub bounds: Bounds2D,
    /// Mindestlänge der synthetischen Strahlen für offene Zellen; die Pipeline
    /// verlängert sie je Region bis über `bounds` hinaus.
    /// `None`: doppelte Spannweite aller Eingabekoordinaten.
    pub radius: Option<f64>,
    /// Länge eines Breitengrads in Meilen.
    pub miles_per_degree_lat: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds2D::world(),
            radius: Some(360.0),
            miles_per_degree_lat: constants::MILES_PER_DEGREE_LAT,
        }
    }
}

impl GeometryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: Bounds2D) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_auto_radius(mut self) -> Self {
        self.radius = None;
        self
    }

    pub fn with_miles_per_degree(mut self, miles: f64) -> Self {
        self.miles_per_degree_lat = miles;
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        if !self.bounds.is_valid() || self.bounds.area() <= 0.0 {
            return Err(MathError::InvalidConfiguration {
                message: format!("Clip bounds {} must be finite and non-empty.", self.bounds),
            });
        }
        if let Some(radius) = self.radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(MathError::InvalidConfiguration {
                    message: format!("Ray radius must be positive and finite, got {radius}."),
                });
            }
        }
        if !(self.miles_per_degree_lat.is_finite() && self.miles_per_degree_lat > 0.0) {
            return Err(MathError::InvalidConfiguration {
                message: format!(
                    "Miles per degree must be positive and finite, got {}.",
                    self.miles_per_degree_lat
                ),
            });
        }
        Ok(())
    }

    /// Effektive Strahllänge für eine konkrete Punktmenge.
    pub fn radius_for(&self, points: &[Point2D]) -> f64 {
        self.radius.unwrap_or_else(|| auto_radius(points))
    }
}

/// Doppelte Spannweite (max - min) über alle x- und y-Koordinaten zusammen.
pub fn auto_radius(points: &[Point2D]) -> f64 {
    let (lo, hi) = points
        .iter()
        .flat_map(|p| [p.x, p.y])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let spread = hi - lo;
    if spread.is_finite() && spread > 0.0 {
        spread * 2.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::coord;

    #[test]
    fn default_is_world_with_fixed_radius() {
        let config = GeometryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bounds, Bounds2D::world());
        assert_eq!(config.radius, Some(360.0));
        assert_relative_eq!(config.miles_per_degree_lat, 69.0);
    }

    #[test]
    fn validate_rejects_bad_radius() {
        let config = GeometryConfig::new().with_radius(-1.0);
        assert!(matches!(
            config.validate(),
            Err(MathError::InvalidConfiguration { .. })
        ));
        let config = GeometryConfig::new().with_radius(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_flat_bounds() {
        let flat = Bounds2D::from_points(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 });
        assert!(GeometryConfig::new().with_bounds(flat).validate().is_err());
    }

    #[test]
    fn auto_radius_uses_peak_to_peak_of_all_coordinates() {
        let points = [coord! { x: -10.0, y: 2.0 }, coord! { x: 5.0, y: 30.0 }];
        assert_relative_eq!(auto_radius(&points), 80.0);
        let config = GeometryConfig::new().with_auto_radius();
        assert_relative_eq!(config.radius_for(&points), 80.0);
        assert_relative_eq!(auto_radius(&[coord! { x: 1.0, y: 1.0 }]), 1.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GeometryConfig = serde_json::from_str(r#"{"radius": 1000.0}"#).unwrap();
        assert_eq!(config.radius, Some(1000.0));
        assert_eq!(config.bounds, Bounds2D::world());
    }
}
