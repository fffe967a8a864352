//! Segment building and depth compositing over helices of growing length.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flatmol::color::{resolve_colors, ColorMode, ColorScheme};
use flatmol::geometry::{best_view, centroid};
use flatmol::options::Options;
use flatmol::render::{DepthCompositor, DrawList, Viewport};
use flatmol::segments::SegmentBuilder;
use flatmol::trajectory::Frame;
use glam::Vec3;

fn helix(n: usize) -> Frame {
    Frame::from_coords(
        (0..n)
            .map(|i| {
                let t = i as f32 * 100f32.to_radians();
                Vec3::new(2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f32)
            })
            .collect(),
    )
}

fn segment_benchmark(c: &mut Criterion) {
    let options = Options::default();
    let mut group = c.benchmark_group("build_segments");

    for count in [100, 500, 2000] {
        let frame = helix(count);
        let view = best_view(frame.coords());
        let scheme = ColorScheme {
            global: ColorMode::Rainbow,
            colorblind: false,
            object: None,
            frame: None,
        };
        let colors = resolve_colors(&frame, &scheme);
        let builder = SegmentBuilder::new(&options.rendering);

        group.bench_function(format!("{count}_positions"), |b| {
            b.iter(|| {
                black_box(builder.build(
                    black_box(&frame),
                    view.center,
                    view.rotation,
                    &colors,
                ))
            });
        });
    }
    group.finish();
}

fn composite_benchmark(c: &mut Criterion) {
    let options = Options::default();
    let mut group = c.benchmark_group("composite");

    for count in [100, 500, 2000] {
        let frame = helix(count);
        let view = best_view(frame.coords());
        let center = centroid(frame.coords());
        let extent = frame
            .coords()
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0, f32::max);
        let scheme = ColorScheme {
            global: ColorMode::Rainbow,
            colorblind: false,
            object: None,
            frame: None,
        };
        let colors = resolve_colors(&frame, &scheme);
        let segments = SegmentBuilder::new(&options.rendering).build(
            &frame,
            center,
            view.rotation,
            &colors,
        );
        let [width, height] = options.display.size;
        let viewport = Viewport::fit(width, height, extent, options.rendering.padding, 1.0);
        let compositor = DepthCompositor::new(&options);

        group.bench_function(format!("{count}_positions"), |b| {
            b.iter(|| {
                let mut drawing = DrawList::new();
                compositor.render(black_box(&segments), &viewport, extent, &mut drawing);
                black_box(drawing)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, segment_benchmark, composite_benchmark);
criterion_main!(benches);
