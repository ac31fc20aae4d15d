// src/territory/points.rs

use crate::math::Point2D;
use crate::territory::error::SourceError;
use serde::{Deserialize, Serialize};

/// Ein Anspruchspunkt mit Besitzer. Mehrere Punkte dürfen denselben Besitzer haben.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedPoint {
    pub owner: String,
    /// x = Länge, y = Breite
    pub position: Point2D,
}

impl OwnedPoint {
    pub fn new(owner: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            owner: owner.into(),
            position: Point2D {
                x: longitude,
                y: latitude,
            },
        }
    }

    pub fn longitude(&self) -> f64 {
        self.position.x
    }

    pub fn latitude(&self) -> f64 {
        self.position.y
    }
}

/// Zeile, wie sie die Datenquelle liefert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRow {
    pub owner_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PointRow {
    pub fn into_owned_point(self, index: usize) -> Result<OwnedPoint, SourceError> {
        if self.owner_id.trim().is_empty() {
            return Err(SourceError::InvalidRow {
                index,
                reason: "owner_id is empty".to_string(),
            });
        }
        if !(self.latitude.is_finite() && self.longitude.is_finite()) {
            return Err(SourceError::InvalidRow {
                index,
                reason: format!(
                    "non-finite coordinate (lat {}, lon {})",
                    self.latitude, self.longitude
                ),
            });
        }
        Ok(OwnedPoint::new(self.owner_id, self.longitude, self.latitude))
    }
}

impl From<&OwnedPoint> for PointRow {
    fn from(point: &OwnedPoint) -> Self {
        Self {
            owner_id: point.owner.clone(),
            latitude: point.latitude(),
            longitude: point.longitude(),
        }
    }
}
