//! MapInk Render Library
//!
//! Projects an authoritative scene snapshot into independent visual layers
//! and draws them. The bundled renderer produces SVG.

mod projector;
mod renderer;
mod svg;

pub use projector::{
    FALLBACK_PATH_COLOR, PREVIEW_COLOR, PREVIEW_DASH, PathLayer, PathStroke, PointLayer, PointMark, PreviewOverlay,
    SceneLayers, VERTEX_MARKER_RADIUS, parse_hex_color, project,
};
pub use renderer::{RenderContext, RenderError, RenderResult, Renderer};
pub use svg::SvgRenderer;
