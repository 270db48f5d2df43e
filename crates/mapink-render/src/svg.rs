//! SVG renderer.

use crate::projector::{PathStroke, PreviewOverlay};
use crate::renderer::{RenderContext, RenderResult, Renderer};
use kurbo::{Circle, Stroke};
use peniko::Color;
use std::fmt::Write;

const MARKER_FILL: &str = "#ffffff";
const MARKER_STROKE: &str = "#374151";

/// Renders a frame to an SVG document string.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    output: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The document produced by the last [`Renderer::build_scene`] call.
    pub fn svg(&self) -> &str {
        &self.output
    }

    pub fn into_svg(self) -> String {
        self.output
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let mut out = String::new();
        let (w, h) = (ctx.viewport_size.width, ctx.viewport_size.height);
        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        )?;
        let bg = color_attrs("fill", self.background_color(ctx));
        writeln!(out, "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\"{bg}/>")?;

        // Paths below icons.
        writeln!(out, "<g id=\"paths\">")?;
        for stroke in &ctx.layers.paths.strokes {
            write_stroke(&mut out, stroke)?;
        }
        for marker in &ctx.layers.paths.markers {
            write_marker(&mut out, marker)?;
        }
        writeln!(out, "</g>")?;

        writeln!(out, "<g id=\"points\">")?;
        for mark in &ctx.layers.points.marks {
            let r = mark.rect;
            writeln!(
                out,
                "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"><title>{}</title></image>",
                escape(&mark.icon),
                r.x0,
                r.y0,
                r.width(),
                r.height(),
                escape(&mark.name)
            )?;
        }
        writeln!(out, "</g>")?;

        if let Some(preview) = &ctx.layers.preview {
            write_preview(&mut out, preview)?;
        }

        if let Some(p) = ctx.snap_point {
            writeln!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"6\" fill=\"none\" stroke-width=\"2\"{}/>",
                p.x,
                p.y,
                color_attrs("stroke", ctx.snap_color)
            )?;
        }

        out.push_str("</svg>\n");
        self.output = out;
        Ok(())
    }
}

fn write_stroke(out: &mut String, stroke: &PathStroke) -> std::fmt::Result {
    writeln!(
        out,
        "<path d=\"{}\" fill=\"none\"{}{}/>",
        stroke.polyline.to_svg(),
        color_attrs("stroke", stroke.color),
        stroke_attrs(&stroke.stroke)
    )
}

fn write_preview(out: &mut String, preview: &PreviewOverlay) -> std::fmt::Result {
    writeln!(out, "<g id=\"preview\">")?;
    writeln!(
        out,
        "<path d=\"{}\" fill=\"none\"{}{}/>",
        preview.polyline.to_svg(),
        color_attrs("stroke", preview.color),
        stroke_attrs(&preview.stroke)
    )?;
    for marker in &preview.markers {
        write_marker(out, marker)?;
    }
    writeln!(out, "</g>")
}

fn write_marker(out: &mut String, marker: &Circle) -> std::fmt::Result {
    writeln!(
        out,
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{MARKER_FILL}\" stroke=\"{MARKER_STROKE}\" stroke-width=\"1\"/>",
        marker.center.x, marker.center.y, marker.radius
    )
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(
        " stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"",
        stroke.width
    );
    if !stroke.dash_pattern.is_empty() {
        let dashes: Vec<String> = stroke.dash_pattern.iter().map(|d| d.to_string()).collect();
        attrs.push_str(&format!(" stroke-dasharray=\"{}\"", dashes.join(" ")));
    }
    attrs
}

/// `name="#rrggbb"`, plus `name-opacity` when translucent.
fn color_attrs(name: &str, color: Color) -> String {
    let c = color.to_rgba8();
    let mut attrs = format!(" {name}=\"#{:02x}{:02x}{:02x}\"", c.r, c.g, c.b);
    if c.a < 255 {
        attrs.push_str(&format!(" {name}-opacity=\"{}\"", c.a as f64 / 255.0));
    }
    attrs
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::project;
    use kurbo::{Point, Size};
    use mapink_core::{Element, PathElement, PointElement, SceneSnapshot};

    fn render(snapshot: &SceneSnapshot, snap: Option<Point>) -> String {
        let layers = project(snapshot);
        let ctx = RenderContext::new(&layers, Size::new(500.0, 300.0)).with_snap_point(snap);
        let mut renderer = SvgRenderer::new();
        renderer.build_scene(&ctx).unwrap();
        renderer.into_svg()
    }

    fn scene() -> SceneSnapshot {
        SceneSnapshot::new(
            vec![
                Element::Point(PointElement {
                    type_id: "building".into(),
                    x: 100.0,
                    y: 100.0,
                    width: 50.0,
                    height: 50.0,
                    name: "Shop & Co".to_string(),
                    data: "https://example.com/b.png?a=1&b=2".to_string(),
                }),
                Element::Path(PathElement {
                    type_id: "road".into(),
                    path: vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)],
                    data: "#6b7280".to_string(),
                    thickness: 10.0,
                }),
            ],
            vec![],
        )
    }

    #[test]
    fn test_document_structure() {
        let svg = render(&scene(), None);
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("viewBox=\"0 0 500 300\""));
        assert!(svg.contains("x=\"75\" y=\"75\" width=\"50\" height=\"50\""));
        assert!(svg.contains("stroke=\"#6b7280\""));
        assert_eq!(svg.matches("<path d=\"M").count(), 1);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(!svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_text_is_escaped() {
        let svg = render(&scene(), None);
        assert!(svg.contains("<title>Shop &amp; Co</title>"));
        assert!(svg.contains("?a=1&amp;b=2"));
    }

    #[test]
    fn test_preview_and_snap_highlight() {
        let snapshot = SceneSnapshot::new(vec![], vec![Point::new(1.0, 1.0), Point::new(4.0, 5.0)]);
        let svg = render(&snapshot, Some(Point::new(4.0, 5.0)));
        assert!(svg.contains("<g id=\"preview\">"));
        assert!(svg.contains("stroke-dasharray=\"6 4\""));
        assert!(svg.contains("r=\"6\" fill=\"none\""));
    }

    #[test]
    fn test_rerender_replaces_output() {
        let mut renderer = SvgRenderer::new();
        let full = project(&scene());
        renderer
            .build_scene(&RenderContext::new(&full, Size::new(500.0, 300.0)))
            .unwrap();
        assert!(renderer.svg().contains("<image"));

        let empty = project(&SceneSnapshot::default());
        renderer
            .build_scene(&RenderContext::new(&empty, Size::new(500.0, 300.0)))
            .unwrap();
        assert!(!renderer.svg().contains("<image"));
        assert!(!renderer.svg().contains("<path"));
    }
}
