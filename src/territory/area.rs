// src/territory/area.rs

use crate::math::{Point2D, algorithms::ClippedPolygon, utils::angles};
use geo::{Area, Centroid, LineString, Polygon};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fläche und Schwerpunkt einer geclippten Zelle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMeasurement {
    /// Planare Fläche in Grad²
    pub area_deg2: f64,
    /// Flächengewichteter Schwerpunkt (x = Länge, y = Breite)
    pub centroid: Point2D,
    /// Fläche in Quadratmeilen nach Breitenkorrektur
    pub area_sq_miles: f64,
}

/// Besitzer -> Fläche in Quadratmeilen, nach Besitzer sortiert.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TerritoryTotals(BTreeMap<String, f64>);

impl TerritoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, owner: &str) -> Option<f64> {
        self.0.get(owner).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(owner, area)| (owner.as_str(), *area))
    }

    /// Summe über alle Besitzer
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Absteigend nach Fläche, bei Gleichstand nach Besitzername.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranking: Vec<(&str, f64)> = self.iter().collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranking
    }
}

impl FromIterator<(String, f64)> for TerritoryTotals {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Misst geclippte Zellen und summiert die Flächen je Besitzer.
#[derive(Debug, Clone)]
pub struct AreaAggregator {
    miles_per_degree_lat: f64,
    totals: BTreeMap<String, f64>,
}

impl AreaAggregator {
    pub fn new(miles_per_degree_lat: f64) -> Self {
        Self {
            miles_per_degree_lat,
            totals: BTreeMap::new(),
        }
    }

    /// Fläche in Grad², Schwerpunkt und korrigierte Fläche. `None` für leere
    /// oder flächenlose Polygone.
    ///
    /// Die Korrektur nutzt nur die Breite des Schwerpunkts:
    /// `area_deg2 * miles² * cos(lat)`.
    pub fn measure(&self, polygon: &ClippedPolygon) -> Option<CellMeasurement> {
        if polygon.is_empty() {
            return None;
        }
        let shape = Polygon::new(LineString::from(polygon.vertices().to_vec()), vec![]);
        let area_deg2 = shape.unsigned_area();
        if area_deg2 <= 0.0 || !area_deg2.is_finite() {
            return None;
        }
        let centroid = shape.centroid()?.0;

        let conversion = self.miles_per_degree_lat.powi(2) * angles::deg_to_rad(centroid.y).cos();
        Some(CellMeasurement {
            area_deg2,
            centroid,
            area_sq_miles: area_deg2 * conversion,
        })
    }

    /// Misst `polygon` und addiert die Fläche auf den Besitzer.
    pub fn add(&mut self, owner: &str, polygon: &ClippedPolygon) -> Option<CellMeasurement> {
        let measurement = self.measure(polygon)?;
        *self.totals.entry(owner.to_string()).or_insert(0.0) += measurement.area_sq_miles;
        Some(measurement)
    }

    pub fn finish(self) -> TerritoryTotals {
        TerritoryTotals(self.totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{algorithms::BoundedClipper, types::Bounds2D};
    use approx::assert_relative_eq;
    use geo::coord;

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> ClippedPolygon {
        BoundedClipper::new(Bounds2D::world()).clip(&[
            coord! { x: min_x, y: min_y },
            coord! { x: max_x, y: min_y },
            coord! { x: max_x, y: max_y },
            coord! { x: min_x, y: max_y },
        ])
    }

    #[test]
    fn equator_cell_uses_full_factor() {
        let aggregator = AreaAggregator::new(69.0);
        let m = aggregator.measure(&rect(-1.0, -1.0, 1.0, 1.0)).unwrap();
        assert_relative_eq!(m.area_deg2, 4.0);
        assert_relative_eq!(m.centroid.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(m.area_sq_miles, 4.0 * 69.0 * 69.0);
    }

    #[test]
    fn latitude_shrinks_area() {
        let aggregator = AreaAggregator::new(69.0);
        let m = aggregator.measure(&rect(10.0, 59.0, 12.0, 61.0)).unwrap();
        assert_relative_eq!(m.centroid.y, 60.0, epsilon = 1e-9);
        assert_relative_eq!(m.area_sq_miles, 4.0 * 69.0 * 69.0 * 0.5, max_relative = 1e-9);
    }

    #[test]
    fn empty_polygon_is_skipped() {
        let mut aggregator = AreaAggregator::new(69.0);
        assert!(aggregator.add("bob", &ClippedPolygon::empty()).is_none());
        assert!(aggregator.finish().is_empty());
    }

    #[test]
    fn contributions_accumulate_per_owner() {
        let mut aggregator = AreaAggregator::new(1.0);
        let a = aggregator.add("alice", &rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        let b = aggregator.add("alice", &rect(5.0, 0.0, 7.0, 1.0)).unwrap();
        aggregator.add("bob", &rect(-3.0, 0.0, -2.0, 1.0)).unwrap();
        let totals = aggregator.finish();
        assert_eq!(totals.len(), 2);
        assert_relative_eq!(totals.get("alice").unwrap(), a.area_sq_miles + b.area_sq_miles);
        assert!(totals.get("carol").is_none());
    }

    #[test]
    fn ranking_is_descending_with_name_tiebreak() {
        let totals: TerritoryTotals = [
            ("carol".to_string(), 5.0),
            ("bob".to_string(), 10.0),
            ("alice".to_string(), 5.0),
        ]
        .into_iter()
        .collect();
        let ranked: Vec<&str> = totals.ranked().into_iter().map(|(o, _)| o).collect();
        assert_eq!(ranked, vec!["bob", "alice", "carol"]);
        assert_relative_eq!(totals.total(), 20.0);
    }
}
