//! Canvas benchmark: Measure stroke rasterization, backup/restore and export.
//!
//! Target: < 50µs per 10px stroke on a 500×780 canvas

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sketchflow::canvas::encode_png;
use sketchflow::{Brush, Canvas, Point, Rect, Rgba};

fn draw_line(c: &mut Criterion) {
    let brush = Brush::default();
    let mut group = c.benchmark_group("draw_line");

    for length in [8.0f32, 64.0, 400.0] {
        let mut canvas = Canvas::new(500, 780, Rgba::WHITE);
        group.bench_with_input(BenchmarkId::from_parameter(length as u32), &length, |b, &length| {
            b.iter(|| {
                canvas.draw_line(
                    black_box(Point::new(50.0, 300.0)),
                    black_box(Point::new(50.0 + length, 320.0)),
                    &brush,
                );
            })
        });
    }

    group.finish();
}

fn backup_restore(c: &mut Criterion) {
    let mut canvas = Canvas::new(500, 780, Rgba::WHITE);
    canvas.draw_line(Point::new(10.0, 10.0), Point::new(490.0, 770.0), &Brush::default());
    let backup = canvas.backup();

    c.bench_function("canvas_500x780_restore", |b| {
        b.iter(|| canvas.restore(black_box(&backup)))
    });
}

fn crop_and_encode(c: &mut Criterion) {
    let mut canvas = Canvas::new(500, 780, Rgba::WHITE);
    canvas.draw_line(Point::new(250.0, 300.0), Point::new(350.0, 420.0), &Brush::default());
    let rect = Rect::new(240, 290, 130, 130);

    c.bench_function("crop_130x130_png", |b| {
        b.iter(|| {
            let cropped = canvas.crop(black_box(rect));
            cropped.map(|cropped| encode_png(&cropped))
        })
    });
}

criterion_group!(benches, draw_line, backup_restore, crop_and_encode);
criterion_main!(benches);
