// src/math/voronoi/diagram.rs

use crate::math::{
    error::{MathError, MathResult},
    types::{Point2D, SpadePoint, from_spade_point, to_spade_point},
    utils::constants,
};
use spade::handles::{FaceHandle, PossiblyOuterTag};
use spade::{DelaunayTriangulation, Triangulation};
use std::collections::HashMap;
use tracing::debug;

/// Verweis auf einen Voronoi-Eckpunkt: entweder ein Index in die gemeinsame
/// Eckpunkttabelle oder ein Ende, das ins Unendliche läuft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexRef {
    Finite(usize),
    Unbounded,
}

impl VertexRef {
    pub fn finite(self) -> Option<usize> {
        match self {
            VertexRef::Finite(index) => Some(index),
            VertexRef::Unbounded => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, VertexRef::Unbounded)
    }
}

/// Gemeinsame Kante zweier Nachbarzellen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ridge {
    /// Die beiden Eingabepunkte, deren Zellen sich diese Kante teilen.
    pub points: [usize; 2],
    /// Endpunkte der Kante. Höchstens einer davon ist bei gültiger Eingabe `Unbounded`.
    pub vertices: [VertexRef; 2],
}

/// Voronoi-Diagramm im Stil von qhull: geteilte Eckpunkttabelle, Regionen als
/// Indexlisten, Kanten als Punktpaar plus Eckpunktpaar.
#[derive(Debug, Clone, Default)]
pub struct VoronoiDiagram {
    /// Eingabepunkte in Eingabereihenfolge.
    pub points: Vec<Point2D>,
    /// Gemeinsame Eckpunkttabelle (Umkreismittelpunkte der Delaunay-Dreiecke).
    pub vertices: Vec<Point2D>,
    /// Regionen, jeweils gegen den Uhrzeigersinn um ihren Punkt.
    pub regions: Vec<Vec<VertexRef>>,
    /// Region je Eingabepunkt; `None` für Punkte mit doppelten Koordinaten.
    pub point_region: Vec<Option<usize>>,
    pub ridges: Vec<Ridge>,
}

impl VoronoiDiagram {
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Region des Eingabepunkts `point`, falls vorhanden.
    pub fn region_of(&self, point: usize) -> Option<&[VertexRef]> {
        let region = (*self.point_region.get(point)?)?;
        self.regions.get(region).map(Vec::as_slice)
    }

    /// Alle Kanten je Punkt: (Nachbar, Eckpunktpaar). Jede Kante taucht bei beiden Punkten auf.
    pub fn ridges_by_point(&self) -> Vec<Vec<(usize, [VertexRef; 2])>> {
        let mut adjacency = vec![Vec::new(); self.points.len()];
        for ridge in &self.ridges {
            let [p1, p2] = ridge.points;
            adjacency[p1].push((p2, ridge.vertices));
            adjacency[p2].push((p1, ridge.vertices));
        }
        adjacency
    }
}

/// Baut das (möglicherweise unbeschränkte) Voronoi-Diagramm als Dual einer
/// `spade`-Delaunay-Triangulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarVoronoiBuilder;

impl PlanarVoronoiBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, points: &[Point2D]) -> MathResult<VoronoiDiagram> {
        for (index, p) in points.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(MathError::InvalidCoordinate {
                    index,
                    x: p.x,
                    y: p.y,
                });
            }
        }

        // Erstes Vorkommen einer Koordinate besitzt den Site, alle weiteren verweisen darauf.
        let mut first_index: HashMap<(u64, u64), usize> = HashMap::with_capacity(points.len());
        let mut site_of_point = Vec::with_capacity(points.len());
        let mut duplicated = vec![false; points.len()];
        for (index, p) in points.iter().enumerate() {
            let owner = *first_index.entry(coordinate_key(*p)).or_insert(index);
            if owner != index {
                duplicated[owner] = true;
                duplicated[index] = true;
            }
            site_of_point.push(owner);
        }

        let unique = first_index.len();
        if unique < constants::MIN_VORONOI_POINTS {
            return Err(MathError::InsufficientPoints {
                expected: constants::MIN_VORONOI_POINTS,
                actual: unique,
            });
        }

        let mut triangulation: DelaunayTriangulation<SpadePoint> = DelaunayTriangulation::new();
        // Spade-Vertexindex -> Eingabeindex
        let mut point_of_vertex: HashMap<usize, usize> = HashMap::with_capacity(unique);
        let mut vertex_of_point: Vec<Option<usize>> = vec![None; points.len()];
        for (index, p) in points.iter().enumerate() {
            if site_of_point[index] != index {
                continue;
            }
            let handle = triangulation.insert(to_spade_point(*p)).map_err(|e| {
                MathError::TriangulationFailed {
                    reason: format!("spade rejected point #{index} {p:?}: {e:?}"),
                }
            })?;
            point_of_vertex.insert(handle.index(), index);
            vertex_of_point[index] = Some(handle.index());
        }

        if triangulation.num_inner_faces() == 0 {
            return Err(MathError::DegenerateInput {
                reason: format!("all {unique} distinct points are collinear"),
            });
        }

        // Umkreismittelpunkte; bitgleiche Mittelpunkte (kozirkuläre Punkte) werden zusammengelegt.
        let mut vertices: Vec<Point2D> = Vec::with_capacity(triangulation.num_inner_faces());
        let mut vertex_by_key: HashMap<(u64, u64), usize> = HashMap::new();
        let mut vertex_of_face: Vec<Option<usize>> = vec![None; triangulation.num_all_faces()];
        for face in triangulation.inner_faces() {
            let center = from_spade_point(face.circumcenter());
            let index = *vertex_by_key.entry(coordinate_key(center)).or_insert_with(|| {
                vertices.push(center);
                vertices.len() - 1
            });
            vertex_of_face[face.fix().index()] = Some(index);
        }

        let mut regions = Vec::with_capacity(unique);
        let mut region_of_vertex: HashMap<usize, usize> = HashMap::with_capacity(unique);
        for vertex in triangulation.vertices() {
            let mut region: Vec<VertexRef> = Vec::new();
            for edge in vertex.out_edges() {
                let r = vertex_ref(edge.face(), &vertex_of_face);
                if region.last() != Some(&r) {
                    region.push(r);
                }
            }
            while region.len() > 1 && region.first() == region.last() {
                region.pop();
            }
            region_of_vertex.insert(vertex.fix().index(), regions.len());
            regions.push(region);
        }

        let point_region = (0..points.len())
            .map(|index| {
                if duplicated[index] {
                    None
                } else {
                    vertex_of_point[index].and_then(|v| region_of_vertex.get(&v).copied())
                }
            })
            .collect();

        let mut ridges = Vec::with_capacity(triangulation.num_undirected_edges());
        for edge in triangulation.undirected_edges() {
            let [a, b] = edge.vertices();
            let (Some(&p1), Some(&p2)) = (
                point_of_vertex.get(&a.fix().index()),
                point_of_vertex.get(&b.fix().index()),
            ) else {
                continue;
            };
            let directed = edge.as_directed();
            ridges.push(Ridge {
                points: [p1, p2],
                vertices: [
                    vertex_ref(directed.face(), &vertex_of_face),
                    vertex_ref(directed.rev().face(), &vertex_of_face),
                ],
            });
        }

        debug!(
            "PlanarVoronoiBuilder: {} points ({} distinct) -> {} vertices, {} regions, {} ridges",
            points.len(),
            unique,
            vertices.len(),
            regions.len(),
            ridges.len()
        );

        Ok(VoronoiDiagram {
            points: points.to_vec(),
            vertices,
            regions,
            point_region,
            ridges,
        })
    }
}

fn vertex_ref(
    face: FaceHandle<'_, PossiblyOuterTag, SpadePoint, (), (), ()>,
    vertex_of_face: &[Option<usize>],
) -> VertexRef {
    face.as_inner()
        .and_then(|inner| vertex_of_face[inner.fix().index()])
        .map_or(VertexRef::Unbounded, VertexRef::Finite)
}

/// Bitgenauer Schlüssel; -0.0 und 0.0 fallen zusammen.
fn coordinate_key(p: Point2D) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}
