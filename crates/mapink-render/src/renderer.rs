//! Renderer trait abstraction.

use crate::projector::SceneLayers;
use kurbo::{Point, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Write failed: {0}")]
    Write(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Projected layers to draw.
    pub layers: &'a SceneLayers,
    /// Viewport size in map units.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Vertex the cursor would snap to, drawn as a highlight ring.
    pub snap_point: Option<Point>,
    /// Snap highlight color.
    pub snap_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(layers: &'a SceneLayers, viewport_size: Size) -> Self {
        Self {
            layers,
            viewport_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            snap_point: None,
            snap_color: Color::from_rgba8(59, 130, 246, 255), // Blue
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the snap point for rendering the highlight.
    pub fn with_snap_point(mut self, point: Option<Point>) -> Self {
        self.snap_point = point;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Draw one frame. Any output of the previous frame is discarded.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
