// src/math/algorithms/clipping.rs

//! # Polygon Clipping Module
//!
//! Clips reconstructed Voronoi polygons against an axis-aligned rectangle using
//! the Sutherland-Hodgman algorithm. The rectangle is convex, so a convex or
//! star-shaped subject yields a single simple polygon (or nothing).

use crate::math::{
    types::{Bounds2D, Point2D},
    utils::constants,
};

/// A polygon confined to the clip bounds. Empty when nothing of the subject
/// survived clipping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClippedPolygon {
    vertices: Vec<Point2D>,
}

impl ClippedPolygon {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }
}

/// The four half-planes of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top];
}

/// Intersects polygons with a fixed rectangle.
#[derive(Debug, Clone, Copy)]
pub struct BoundedClipper {
    bounds: Bounds2D,
}

impl BoundedClipper {
    /// Creates a clipper for the given rectangle.
    ///
    /// # Arguments
    /// * `bounds` - The axis-aligned bounding box to clip against.
    pub fn new(bounds: Bounds2D) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &Bounds2D {
        &self.bounds
    }

    /// Clips a subject polygon (represented by its vertices) against the rectangle.
    ///
    /// Vertices exactly on the rectangle's border count as inside. Returns an
    /// empty polygon if the subject has fewer than 3 vertices or lies completely
    /// outside the rectangle.
    pub fn clip(&self, subject: &[Point2D]) -> ClippedPolygon {
        if subject.len() < 3 {
            return ClippedPolygon::empty();
        }

        let mut current = subject.to_vec();
        for edge in Edge::ALL {
            // If at any stage the polygon degenerates or vanishes, stop.
            if current.len() < 3 {
                return ClippedPolygon::empty();
            }
            current = self.clip_against_edge(&current, edge);
        }

        let vertices = dedup_ring(current);
        if vertices.len() < 3 {
            return ClippedPolygon::empty();
        }
        ClippedPolygon { vertices }
    }

    fn clip_against_edge(&self, input: &[Point2D], edge: Edge) -> Vec<Point2D> {
        let mut output = Vec::with_capacity(input.len() + 2);
        let mut previous = input[input.len() - 1];

        for &current in input {
            let current_inside = self.is_inside(current, edge);
            let previous_inside = self.is_inside(previous, edge);

            if current_inside {
                if !previous_inside {
                    output.push(self.intersect(previous, current, edge));
                }
                output.push(current);
            } else if previous_inside {
                output.push(self.intersect(previous, current, edge));
            }
            previous = current;
        }
        output
    }

    fn is_inside(&self, p: Point2D, edge: Edge) -> bool {
        match edge {
            Edge::Left => p.x >= self.bounds.min.x,
            Edge::Right => p.x <= self.bounds.max.x,
            Edge::Bottom => p.y >= self.bounds.min.y,
            Edge::Top => p.y <= self.bounds.max.y,
        }
    }

    /// Intersection of segment `a`-`b` with the border line of `edge`. Only called
    /// when `a` and `b` lie on different sides, so the denominator is non-zero.
    fn intersect(&self, a: Point2D, b: Point2D, edge: Edge) -> Point2D {
        match edge {
            Edge::Left | Edge::Right => {
                let x = if edge == Edge::Left {
                    self.bounds.min.x
                } else {
                    self.bounds.max.x
                };
                let t = (x - a.x) / (b.x - a.x);
                Point2D {
                    x,
                    y: a.y + t * (b.y - a.y),
                }
            }
            Edge::Bottom | Edge::Top => {
                let y = if edge == Edge::Bottom {
                    self.bounds.min.y
                } else {
                    self.bounds.max.y
                };
                let t = (y - a.y) / (b.y - a.y);
                Point2D {
                    x: a.x + t * (b.x - a.x),
                    y,
                }
            }
        }
    }
}

/// Removes consecutive (and wrap-around) near-duplicate vertices.
fn dedup_ring(mut ring: Vec<Point2D>) -> Vec<Point2D> {
    let same = |a: Point2D, b: Point2D| {
        (a.x - b.x).abs() <= constants::EPSILON && (a.y - b.y).abs() <= constants::EPSILON
    };
    ring.dedup_by(|a, b| same(*a, *b));
    while ring.len() > 1 && same(ring[0], ring[ring.len() - 1]) {
        ring.pop();
    }
    ring
}
