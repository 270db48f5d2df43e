//! Scene projection.
//!
//! [`project`] turns a [`SceneSnapshot`] into freshly built layers. Nothing is
//! patched in place: callers replace their previous [`SceneLayers`] with the
//! returned value, so geometry removed by an undo can never linger.

use kurbo::{BezPath, Cap, Circle, Join, Point, Rect, Stroke};
use mapink_core::{PathElement, PointElement, SceneSnapshot, ToolId};
use peniko::Color;

/// Radius of the marker drawn on every path vertex.
pub const VERTEX_MARKER_RADIUS: f64 = 3.0;

/// Dash pattern of the in-progress path.
pub const PREVIEW_DASH: [f64; 2] = [6.0, 4.0];

/// Stroke color of the in-progress path.
pub const PREVIEW_COLOR: Color = Color::from_rgb8(239, 68, 68);

/// Used when a path's color cannot be parsed.
pub const FALLBACK_PATH_COLOR: Color = Color::from_rgb8(107, 114, 128);

const PREVIEW_WIDTH: f64 = 2.0;

/// One placed icon.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMark {
    pub type_id: ToolId,
    pub name: String,
    pub icon: String,
    /// Placement rectangle centered on the element position.
    pub rect: Rect,
}

/// One committed polyline.
#[derive(Debug, Clone)]
pub struct PathStroke {
    pub type_id: ToolId,
    pub polyline: BezPath,
    pub color: Color,
    pub stroke: Stroke,
}

/// Point elements, in scene order.
#[derive(Debug, Clone, Default)]
pub struct PointLayer {
    pub marks: Vec<PointMark>,
}

/// Committed path geometry plus a marker on every vertex.
#[derive(Debug, Clone, Default)]
pub struct PathLayer {
    pub strokes: Vec<PathStroke>,
    pub markers: Vec<Circle>,
}

/// Dashed preview of the store's in-progress path.
#[derive(Debug, Clone)]
pub struct PreviewOverlay {
    pub polyline: BezPath,
    pub markers: Vec<Circle>,
    pub color: Color,
    pub stroke: Stroke,
}

/// Everything needed to draw one scene.
#[derive(Debug, Clone, Default)]
pub struct SceneLayers {
    pub points: PointLayer,
    pub paths: PathLayer,
    /// Present only while the in-progress path is non-empty.
    pub preview: Option<PreviewOverlay>,
}

impl SceneLayers {
    pub fn is_empty(&self) -> bool {
        self.points.marks.is_empty() && self.paths.strokes.is_empty() && self.preview.is_none()
    }
}

/// Build all layers for `snapshot`.
pub fn project(snapshot: &SceneSnapshot) -> SceneLayers {
    let points = PointLayer {
        marks: snapshot.point_elements().map(point_mark).collect(),
    };

    let mut paths = PathLayer::default();
    for element in snapshot.path_elements() {
        paths.strokes.push(path_stroke(element));
        paths.markers.extend(vertex_markers(&element.path));
    }

    let preview = (!snapshot.temp_path.is_empty()).then(|| PreviewOverlay {
        polyline: polyline(&snapshot.temp_path),
        markers: vertex_markers(&snapshot.temp_path).collect(),
        color: PREVIEW_COLOR,
        stroke: Stroke::new(PREVIEW_WIDTH)
            .with_caps(Cap::Round)
            .with_dashes(0.0, PREVIEW_DASH),
    });

    SceneLayers { points, paths, preview }
}

fn point_mark(element: &PointElement) -> PointMark {
    PointMark {
        type_id: element.type_id.clone(),
        name: element.name.clone(),
        icon: element.data.clone(),
        rect: element.footprint(),
    }
}

fn path_stroke(element: &PathElement) -> PathStroke {
    PathStroke {
        type_id: element.type_id.clone(),
        polyline: polyline(&element.path),
        color: parse_hex_color(&element.data).unwrap_or(FALLBACK_PATH_COLOR),
        stroke: Stroke::new(element.thickness)
            .with_caps(Cap::Round)
            .with_join(Join::Round),
    }
}

fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

fn vertex_markers(points: &[Point]) -> impl Iterator<Item = Circle> + '_ {
    points.iter().map(|p| Circle::new(*p, VERTEX_MARKER_RADIUS))
}

/// Parse `#rrggbb` or `#rgb`.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    let channel = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    match hex.len() {
        6 => Some(Color::from_rgb8(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
        3 => {
            let r = channel(0, 1)?;
            let g = channel(1, 1)?;
            let b = channel(2, 1)?;
            Some(Color::from_rgb8(r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}
