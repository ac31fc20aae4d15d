// src/math/voronoi/finite.rs

//! Schließt unbeschränkte Voronoi-Zellen zu endlichen Polygonen.
//!
//! Für jede offene Kante einer Randzelle wird ein weit entfernter Eckpunkt
//! synthetisiert: ausgehend vom bekannten endlichen Eckpunkt der Kante, senkrecht
//! zur Verbindung der beiden Generatorpunkte, um `radius` nach außen verschoben.
//! "Außen" wird am Schwerpunkt der gesamten Punktwolke festgemacht, die
//! anschließende Winkelsortierung dagegen am Mittelpunkt der Zelle selbst.
//!
//! Mit `covering(bounds)` wird `radius` je Region so weit vergrößert, dass der
//! Abschluss der Zelle außerhalb des Clip-Rechtecks liegt.

use crate::math::{
    error::{MathError, MathResult},
    types::{Bounds2D, Point2D, cross, dot, mean, normalize, perpendicular},
    utils::{angles, constants},
    voronoi::diagram::{VertexRef, VoronoiDiagram},
};
use thiserror::Error;
use tracing::{debug, warn};

/// Grund, warum ein einzelner Punkt kein Territorium erhält.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    #[error("point shares its coordinates with another point")]
    DuplicateSite,
    #[error("region could not be reconstructed to any vertex")]
    Discarded,
    #[error("region has only {count} vertices, at least 3 are needed")]
    TooFewVertices { count: usize },
    #[error("region lies completely outside the clip bounds")]
    EmptyClip,
    #[error("clipped region has zero area")]
    ZeroArea,
}

/// Endliche Regionen plus die erweiterte Eckpunkttabelle.
#[derive(Debug, Clone)]
pub struct FiniteVoronoi {
    /// Ursprüngliche Eckpunkte, gefolgt von allen synthetisierten Fernpunkten.
    pub vertices: Vec<Point2D>,
    /// Ein Eintrag je Eingabepunkt, in Eingabereihenfolge.
    pub regions: Vec<Result<Vec<usize>, RegionError>>,
}

impl FiniteVoronoi {
    /// Koordinaten der Region von `point`.
    pub fn polygon(&self, point: usize) -> Result<Vec<Point2D>, RegionError> {
        match self.regions.get(point) {
            Some(Ok(indices)) => Ok(indices.iter().map(|&i| self.vertices[i]).collect()),
            Some(Err(e)) => Err(*e),
            None => Err(RegionError::Discarded),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FiniteRegionReconstructor {
    radius: f64,
    coverage: Option<Bounds2D>,
}

impl FiniteRegionReconstructor {
    pub fn new(radius: f64) -> MathResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(MathError::InvalidConfiguration {
                message: format!("Ray radius must be positive and finite, got {radius}."),
            });
        }
        Ok(Self {
            radius,
            coverage: None,
        })
    }

    /// Offene Zellen werden so weit verlängert, dass ihr Abschluss jenseits von
    /// `bounds` liegt. `radius` ist dann nur noch die Untergrenze.
    pub fn covering(mut self, bounds: Bounds2D) -> Self {
        self.coverage = Some(bounds);
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn reconstruct(&self, diagram: &VoronoiDiagram) -> FiniteVoronoi {
        let mut vertices = diagram.vertices.clone();
        let center = mean(diagram.points.iter().copied()).unwrap_or_default();
        let ridges = diagram.ridges_by_point();

        let mut regions = Vec::with_capacity(diagram.num_points());
        for p1 in 0..diagram.num_points() {
            let Some(region) = diagram.region_of(p1) else {
                regions.push(Err(RegionError::DuplicateSite));
                continue;
            };

            let mut new_region: Vec<usize> =
                region.iter().filter_map(|v| v.finite()).collect();

            // (Startpunkt, Richtung) je offener Kante
            let mut rays: Vec<(Point2D, Point2D)> = Vec::new();
            if region.iter().any(|v| v.is_unbounded()) {
                for &(p2, pair) in &ridges[p1] {
                    let finite = match pair {
                        [VertexRef::Finite(_), VertexRef::Finite(_)] => continue,
                        [VertexRef::Finite(v), VertexRef::Unbounded]
                        | [VertexRef::Unbounded, VertexRef::Finite(v)] => v,
                        [VertexRef::Unbounded, VertexRef::Unbounded] => {
                            debug!(
                                "FiniteRegionReconstructor: ridge {}-{} has no finite vertex, skipping",
                                p1, p2
                            );
                            continue;
                        }
                    };
                    rays.push((vertices[finite], ray_direction(diagram, center, p1, p2)));
                }
            }

            if !rays.is_empty() {
                let radius = self.region_radius(p1, &new_region, &rays, &vertices);
                for (start, direction) in rays {
                    new_region.push(vertices.len());
                    vertices.push(start + direction * radius);
                }
            }

            if new_region.is_empty() {
                regions.push(Err(RegionError::Discarded));
                continue;
            }

            sort_by_angle(&mut new_region, &vertices);
            regions.push(Ok(new_region));
        }

        FiniteVoronoi { vertices, regions }
    }

    /// Strahllänge für eine offene Region. Ohne `coverage` immer `radius`,
    /// sonst wird verdoppelt, bis jede Sehne zwischen zwei Fernpunkten das
    /// Clip-Rechteck vollständig auf der Innenseite lässt.
    fn region_radius(
        &self,
        point: usize,
        finite: &[usize],
        rays: &[(Point2D, Point2D)],
        vertices: &[Point2D],
    ) -> f64 {
        let Some(bounds) = self.coverage else {
            return self.radius;
        };
        let reach = finite
            .iter()
            .map(|&i| bounds.distance_to(vertices[i]))
            .fold(0.0, f64::max);
        let mut radius = self.radius.max(bounds.diagonal() + reach);

        let finite_points: Vec<Point2D> = finite.iter().map(|&i| vertices[i]).collect();
        for _ in 0..constants::MAX_RAY_DOUBLINGS {
            if chords_clear(&bounds, &finite_points, rays, radius) {
                return radius;
            }
            radius *= 2.0;
        }
        warn!(
            "FiniteRegionReconstructor: region of point #{} still cuts into {} at radius {:e}",
            point, bounds, radius
        );
        radius
    }
}

/// Einheitsnormale der offenen Kante zwischen `p1` und `p2`, weg vom Schwerpunkt
/// der gesamten Punktwolke.
fn ray_direction(diagram: &VoronoiDiagram, center: Point2D, p1: usize, p2: usize) -> Point2D {
    let a = diagram.points[p1];
    let b = diagram.points[p2];
    // Verschiedene Sites haben verschiedene Koordinaten, daher ist t nie Null.
    let t = normalize(b - a).unwrap_or_default();
    let n = perpendicular(t);

    let midpoint = (a + b) * 0.5;
    if dot(midpoint - center, n) < 0.0 { -n } else { n }
}

/// Liegt das ganze Rechteck auf der Innenseite aller Kanten, die zwei
/// Fernpunkte verbinden?
fn chords_clear(
    bounds: &Bounds2D,
    finite: &[Point2D],
    rays: &[(Point2D, Point2D)],
    radius: f64,
) -> bool {
    let mut ring: Vec<(Point2D, bool)> = finite.iter().map(|&p| (p, false)).collect();
    ring.extend(rays.iter().map(|&(start, dir)| (start + dir * radius, true)));
    let Some(c) = mean(ring.iter().map(|&(p, _)| p)) else {
        return true;
    };
    ring.sort_by(|a, b| {
        angles::polar_angle(c, a.0).total_cmp(&angles::polar_angle(c, b.0))
    });

    let corners = bounds.corners();
    (0..ring.len()).all(|i| {
        let (a, a_far) = ring[i];
        let (b, b_far) = ring[(i + 1) % ring.len()];
        if !(a_far && b_far) {
            return true;
        }
        let inside = cross(b - a, c - a);
        inside != 0.0
            && corners
                .iter()
                .all(|&corner| cross(b - a, corner - a) * inside >= 0.0)
    })
}

/// Sortiert Eckpunktindizes aufsteigend nach Polarwinkel um ihren eigenen Mittelpunkt.
pub fn sort_by_angle(region: &mut [usize], vertices: &[Point2D]) {
    let Some(c) = mean(region.iter().map(|&i| vertices[i])) else {
        return;
    };
    region.sort_by(|&a, &b| {
        angles::polar_angle(c, vertices[a]).total_cmp(&angles::polar_angle(c, vertices[b]))
    });
}
