//! Element model and the authoritative scene snapshot.

use crate::catalog::ToolId;
use crate::geometry::centered_rect;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A fixed-footprint icon centered at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointElement {
    #[serde(rename = "type")]
    pub type_id: ToolId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Display name.
    pub name: String,
    /// Icon reference.
    pub data: String,
}

impl PointElement {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Footprint rectangle centered on the element position.
    pub fn footprint(&self) -> Rect {
        centered_rect(self.center(), self.width, self.height)
    }
}

/// An ordered polyline. Vertex order is the drawing order and is kept
/// exactly as accumulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    #[serde(rename = "type")]
    pub type_id: ToolId,
    pub path: Vec<Point>,
    /// Stroke color or asset reference.
    pub data: String,
    /// Stroke thickness.
    #[serde(default = "PathElement::default_thickness")]
    pub thickness: f64,
}

impl PathElement {
    fn default_thickness() -> f64 {
        4.0
    }
}

/// A committed map element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Point(PointElement),
    Path(PathElement),
}

impl Element {
    pub fn type_id(&self) -> &ToolId {
        match self {
            Element::Point(p) => &p.type_id,
            Element::Path(p) => &p.type_id,
        }
    }

    /// Vertices that new path points may snap to. Point elements have none.
    pub fn vertices(&self) -> &[Point] {
        match self {
            Element::Point(_) => &[],
            Element::Path(p) => &p.path,
        }
    }

    pub fn as_point(&self) -> Option<&PointElement> {
        match self {
            Element::Point(p) => Some(p),
            Element::Path(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathElement> {
        match self {
            Element::Path(p) => Some(p),
            Element::Point(_) => None,
        }
    }
}

/// The authoritative scene as returned by the store after each action.
///
/// The client only ever replaces its copy wholesale; it never edits one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub elements: Vec<Element>,
    /// Path vertices the store has accepted but not yet committed.
    #[serde(default)]
    pub temp_path: Vec<Point>,
}

impl SceneSnapshot {
    pub fn new(elements: Vec<Element>, temp_path: Vec<Point>) -> Self {
        Self { elements, temp_path }
    }

    /// All committed path vertices, in element order then path order.
    pub fn snap_candidates(&self) -> Vec<Point> {
        self.elements.iter().flat_map(|e| e.vertices().iter().copied()).collect()
    }

    pub fn point_elements(&self) -> impl Iterator<Item = &PointElement> {
        self.elements.iter().filter_map(Element::as_point)
    }

    pub fn path_elements(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter().filter_map(Element::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.temp_path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}
