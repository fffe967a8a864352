//! Depth-cued compositing of segments onto a 2-D surface.
//!
//! Segments are drawn far to near (painter's algorithm). Each stroke's
//! color is its base color faded toward the background by depth, lightened
//! by a screen-space tint term, and darkened by a shadow term accumulated
//! from nearby farther segments. Cost is quadratic in segment count.

pub mod shading;
pub mod surface;

use glam::{Vec2, Vec3};

pub use shading::{compute_shading, draw_order, normalize_depth, shade, Shade};
pub use surface::{DrawList, LineCap, Stroke, Surface, SvgSurface};

use crate::options::{DisplayOptions, Options, OutlineMode, RenderingOptions};
use crate::segments::{Segment, SegmentKind};

/// Extra outline width on each side of a stroke, in pixels.
const OUTLINE_MARGIN: f32 = 1.0;
/// Outline color as a fraction of the stroke color.
const OUTLINE_DARKEN: f32 = 0.6;

/// Pixel mapping for one drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Pixels per view-space unit.
    pub scale: f32,
}

impl Viewport {
    /// Fit a sphere of radius `extent` (times `padding`) into the surface,
    /// then multiply by `zoom`. The base scale depends only on the surface
    /// size and extent.
    #[must_use]
    pub fn fit(width: u32, height: u32, extent: f32, padding: f32, zoom: f32) -> Self {
        let half = width.min(height) as f32 * 0.5;
        let radius = (extent * padding).max(f32::EPSILON);
        Self {
            width,
            height,
            scale: half / radius * zoom,
        }
    }

    /// View-space point to pixel coordinates (y down, origin top-left).
    #[must_use]
    pub fn project(&self, v: Vec3) -> Vec2 {
        Vec2::new(
            self.width as f32 * 0.5 + v.x * self.scale,
            self.height as f32 * 0.5 - v.y * self.scale,
        )
    }
}

/// Strokes segments onto a surface with depth cueing.
#[derive(Debug, Clone, Copy)]
pub struct DepthCompositor<'a> {
    display: &'a DisplayOptions,
    rendering: &'a RenderingOptions,
}

impl<'a> DepthCompositor<'a> {
    /// Compositor using the display and rendering sections of `options`.
    #[must_use]
    pub fn new(options: &'a Options) -> Self {
        Self {
            display: &options.display,
            rendering: &options.rendering,
        }
    }

    /// Clear `surface` and draw `segments` far to near.
    ///
    /// `depth_radius` is the extent used to normalize view-space Z; a
    /// non-positive value disables depth fading.
    pub fn render(
        &self,
        segments: &[Segment],
        viewport: &Viewport,
        depth_radius: f32,
        surface: &mut dyn Surface,
    ) {
        surface.clear(viewport.width, viewport.height, self.display.background);
        let order = draw_order(segments);
        let shades = compute_shading(segments, &order, self.rendering);
        let outline_cap = match self.display.outline {
            OutlineMode::None => None,
            OutlineMode::Partial => Some(LineCap::Butt),
            OutlineMode::Full => Some(LineCap::Round),
        };

        for &i in &order {
            let seg = &segments[i];
            let depth = normalize_depth(seg.depth(), depth_radius);
            let color = shade(seg.color, depth, shades[i], self.rendering, self.display.background);
            let width = self.stroke_width(seg);
            let from = viewport.project(seg.start);
            let to = viewport.project(seg.end);

            let outline = outline_cap.filter(|_| seg.kind != SegmentKind::Contact);
            if let Some(cap) = outline {
                surface.stroke(&Stroke {
                    from,
                    to,
                    color: color.map(|c| c * OUTLINE_DARKEN),
                    width: width + 2.0 * OUTLINE_MARGIN,
                    cap,
                });
            }
            surface.stroke(&Stroke {
                from,
                to,
                color,
                width,
                cap: LineCap::Round,
            });
        }
        log::trace!("composited {} segments", segments.len());
    }

    fn stroke_width(&self, seg: &Segment) -> f32 {
        (self.display.line_width * seg.width).max(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(z: f32, kind: SegmentKind) -> Segment {
        let start = Vec3::new(-1.0, z, z);
        let end = Vec3::new(1.0, z, z);
        Segment {
            start,
            end,
            mid: (start + end) * 0.5,
            length: 2.0,
            i: 0,
            j: 1,
            chain: None,
            color: [0.0, 0.0, 1.0],
            kind,
            width: if kind == SegmentKind::Ligand { 0.5 } else { 1.0 },
        }
    }

    fn options(outline: OutlineMode) -> Options {
        let mut options = Options::default();
        options.display.outline = outline;
        options
    }

    #[test]
    fn viewport_fit_and_project() {
        let vp = Viewport::fit(400, 200, 10.0, 1.0, 1.0);
        assert_eq!(vp.scale, 10.0);
        assert_eq!(vp.project(Vec3::ZERO), Vec2::new(200.0, 100.0));
        assert_eq!(vp.project(Vec3::new(1.0, 1.0, 5.0)), Vec2::new(210.0, 90.0));
        let zoomed = Viewport::fit(400, 200, 10.0, 1.0, 2.0);
        assert_eq!(zoomed.scale, 20.0);
    }

    #[test]
    fn strokes_follow_depth_order() {
        let opts = options(OutlineMode::None);
        let segments = vec![
            seg(3.0, SegmentKind::Backbone),
            seg(-2.0, SegmentKind::Backbone),
            seg(0.5, SegmentKind::Backbone),
        ];
        let vp = Viewport::fit(100, 100, 5.0, 1.0, 1.0);
        let mut list = DrawList::new();
        DepthCompositor::new(&opts).render(&segments, &vp, 5.0, &mut list);

        let ys: Vec<f32> = list.strokes().iter().map(|s| s.from.y).collect();
        assert_eq!(ys.len(), 3);
        // Larger view y projects higher on screen, so far-to-near is
        // descending pixel y here.
        assert!(ys[0] > ys[1] && ys[1] > ys[2]);
        assert!(list.strokes().iter().all(|s| s.cap == LineCap::Round));
    }

    #[test]
    fn ligands_are_half_width() {
        let opts = options(OutlineMode::None);
        let segments = vec![seg(0.0, SegmentKind::Backbone), seg(1.0, SegmentKind::Ligand)];
        let vp = Viewport::fit(100, 100, 5.0, 1.0, 1.0);
        let mut list = DrawList::new();
        DepthCompositor::new(&opts).render(&segments, &vp, 5.0, &mut list);
        assert_eq!(list.strokes()[0].width, 3.0);
        assert_eq!(list.strokes()[1].width, 1.5);
    }

    #[test]
    fn outline_underlays_each_stroke() {
        let segments = vec![seg(0.0, SegmentKind::Backbone), seg(1.0, SegmentKind::Contact)];
        let vp = Viewport::fit(100, 100, 5.0, 1.0, 1.0);

        let mut list = DrawList::new();
        DepthCompositor::new(&options(OutlineMode::Full)).render(&segments, &vp, 5.0, &mut list);
        assert_eq!(list.strokes().len(), 3);
        assert_eq!(list.strokes()[0].cap, LineCap::Round);
        assert!(list.strokes()[0].width > list.strokes()[1].width);

        DepthCompositor::new(&options(OutlineMode::Partial)).render(&segments, &vp, 5.0, &mut list);
        assert_eq!(list.strokes()[0].cap, LineCap::Butt);
    }

    #[test]
    fn empty_input_only_clears() {
        let opts = Options::default();
        let mut list = DrawList::new();
        let vp = Viewport::fit(64, 48, 0.0, 1.1, 1.0);
        DepthCompositor::new(&opts).render(&[], &vp, 0.0, &mut list);
        assert!(list.strokes().is_empty());
        assert_eq!((list.width(), list.height()), (64, 48));
    }
}
