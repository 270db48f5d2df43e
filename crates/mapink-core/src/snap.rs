//! Snap functionality for latching new points onto existing path vertices.

use crate::element::SceneSnapshot;
use crate::geometry::distance_sq;
use kurbo::Point;

/// Distance threshold for vertex snapping (in canvas units).
pub const SNAP_RADIUS: f64 = 10.0;

/// Find the candidate nearest to `cursor`, if it lies strictly within `radius`.
///
/// On equal distances the first candidate in iteration order wins.
pub fn nearest_vertex(cursor: Point, candidates: &[Point], radius: f64) -> Option<Point> {
    let mut best: Option<Point> = None;
    let mut best_dist_sq = radius * radius;

    for &candidate in candidates {
        let dist_sq = distance_sq(cursor, candidate);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(candidate);
        }
    }

    best
}

/// Snap resolver bound to the vertex set of one snapshot.
///
/// Rebuilt whenever a new snapshot arrives; resolving is purely local and
/// never touches the network.
#[derive(Debug, Clone)]
pub struct VertexSnapper {
    radius: f64,
    candidates: Vec<Point>,
}

impl Default for VertexSnapper {
    fn default() -> Self {
        Self::new(SNAP_RADIUS)
    }
}

impl VertexSnapper {
    /// Create a snapper with no candidates.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            candidates: Vec::new(),
        }
    }

    /// Create a snapper over every committed path vertex of `snapshot`.
    pub fn from_snapshot(snapshot: &SceneSnapshot, radius: f64) -> Self {
        Self {
            radius,
            candidates: snapshot.snap_candidates(),
        }
    }

    /// Replace the candidate set with the vertices of a fresh snapshot.
    pub fn rebuild(&mut self, snapshot: &SceneSnapshot) {
        self.candidates = snapshot.snap_candidates();
    }

    /// The vertex the cursor would snap to, if any.
    pub fn resolve(&self, cursor: Point) -> Option<Point> {
        nearest_vertex(cursor, &self.candidates, self.radius)
    }

    pub fn candidates(&self) -> &[Point] {
        &self.candidates
    }
}
