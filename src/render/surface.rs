//! Drawing targets.
//!
//! The compositor emits [`Stroke`]s in painter's order into any
//! [`Surface`]. [`DrawList`] records them (for capture and tests) and
//! [`SvgSurface`] writes them out as a standalone SVG document.

use glam::Vec2;
use svg::node::element;
use svg::{Document, Node};

use crate::color::{to_hex, Rgb};

/// Stroke end style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCap {
    /// Semicircular caps; consecutive segments read as one line.
    Round,
    /// Flat caps ending exactly at the endpoints.
    Butt,
}

impl LineCap {
    fn svg_name(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Butt => "butt",
        }
    }
}

/// One straight line in pixel space (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Start point.
    pub from: Vec2,
    /// End point.
    pub to: Vec2,
    /// Final shaded color.
    pub color: Rgb,
    /// Width in pixels.
    pub width: f32,
    /// End style.
    pub cap: LineCap,
}

/// Something strokes can be drawn onto.
pub trait Surface {
    /// Start a new drawing of the given size, filled with `background`.
    fn clear(&mut self, width: u32, height: u32, background: Rgb);

    /// Draw one stroke over everything drawn so far.
    fn stroke(&mut self, stroke: &Stroke);
}

/// Recorded drawing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    width: u32,
    height: u32,
    background: Rgb,
    strokes: Vec<Stroke>,
}

impl DrawList {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strokes in draw order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Drawing width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Drawing height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Background color.
    #[must_use]
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Draw the recorded strokes onto another surface.
    pub fn replay(&self, surface: &mut dyn Surface) {
        surface.clear(self.width, self.height, self.background);
        for stroke in &self.strokes {
            surface.stroke(stroke);
        }
    }

    /// Render as an SVG document.
    #[must_use]
    pub fn to_document(&self) -> Document {
        let mut svg = SvgSurface::new();
        self.replay(&mut svg);
        svg.into_document()
    }

    /// Render as SVG text.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.to_document().to_string()
    }
}

impl Surface for DrawList {
    fn clear(&mut self, width: u32, height: u32, background: Rgb) {
        self.width = width;
        self.height = height;
        self.background = background;
        self.strokes.clear();
    }

    fn stroke(&mut self, stroke: &Stroke) {
        self.strokes.push(*stroke);
    }
}

/// Builds an SVG document, one `<line>` element per stroke.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    document: Document,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self {
            document: Document::new(),
        }
    }
}

/// Two decimals are plenty at pixel scale and keep files small.
fn px(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

impl SvgSurface {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The document built so far.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take the finished document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Close the document and return its text.
    #[must_use]
    pub fn finish(self) -> String {
        self.document.to_string()
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, width: u32, height: u32, background: Rgb) {
        let backdrop = element::Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", to_hex(background));
        self.document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .add(backdrop);
    }

    fn stroke(&mut self, stroke: &Stroke) {
        let line = element::Line::new()
            .set("x1", px(stroke.from.x))
            .set("y1", px(stroke.from.y))
            .set("x2", px(stroke.to.x))
            .set("y2", px(stroke.to.y))
            .set("stroke", to_hex(stroke.color))
            .set("stroke-width", px(stroke.width))
            .set("stroke-linecap", stroke.cap.svg_name());
        self.document.append(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(x: f32) -> Stroke {
        Stroke {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, 10.0),
            color: [1.0, 0.0, 0.0],
            width: 2.0,
            cap: LineCap::Round,
        }
    }

    #[test]
    fn draw_list_records_in_order_and_clears() {
        let mut list = DrawList::new();
        list.clear(10, 20, [1.0; 3]);
        list.stroke(&stroke(1.0));
        list.stroke(&stroke(2.0));
        assert_eq!(list.strokes().len(), 2);
        assert_eq!(list.strokes()[1].from.x, 2.0);
        list.clear(10, 20, [1.0; 3]);
        assert!(list.strokes().is_empty());
    }

    #[test]
    fn svg_output() {
        let mut list = DrawList::new();
        list.clear(40, 30, [1.0, 1.0, 1.0]);
        list.stroke(&stroke(5.0));
        let svg = list.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 40 30""#));
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert_eq!(svg.matches("<line").count(), 1);
        for attr in [
            r#"x1="5""#,
            r#"y2="10""#,
            r##"stroke="#ff0000""##,
            r#"stroke-width="2""#,
            r#"stroke-linecap="round""#,
        ] {
            assert!(svg.contains(attr), "missing {attr} in {svg}");
        }
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn svg_coordinates_are_rounded() {
        let mut svg = SvgSurface::new();
        svg.clear(10, 10, [0.0; 3]);
        svg.stroke(&Stroke {
            from: Vec2::new(1.23456, 0.0),
            ..stroke(0.0)
        });
        svg.stroke(&stroke(3.0));
        let text = svg.finish();
        assert!(text.contains(r#"x1="1.23""#));
        assert_eq!(text.matches("<line").count(), 2);
    }
}
