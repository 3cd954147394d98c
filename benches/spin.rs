//! Criterion benchmarks for the spin engine.
//!
//! Run with:
//!   cargo bench
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use wheelspin::prelude::*;

fn labels(n: usize) -> Vec<WheelEntry> {
    entries_from_labels((0..n).map(|i| format!("entry {i}")))
}

/// Curve integration per frame with growing point counts.
fn bench_curve_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalized_position");

    for extra in [0usize, 8, 32, 128].iter() {
        let mut curve = SpeedCurve::default();
        let mut rng = Prng::new(9);
        for _ in 0..*extra {
            curve.insert(ControlPoint::new(rng.next_f64_01(), rng.next_f64_01()));
        }
        group.bench_with_input(BenchmarkId::new("points", curve.len()), &curve, |b, curve| {
            let mut t = 0.0;
            b.iter(|| {
                t = (t + 0.013) % 1.0;
                black_box(curve.normalized_position_at(t))
            });
        });
    }

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    c.bench_function("read_pointer", |b| {
        let mut rot = 0.0;
        b.iter(|| {
            rot += 7.31;
            black_box(read_pointer(rot, 37))
        });
    });
}

/// Frame pass only; the cache is warmed before measuring. Cost should be flat in N.
fn bench_frame_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_pass");

    for n in [4usize, 64, 1024].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("entries", n), n, |b, &n| {
            let mut renderer: WheelRenderer<RecordingSurface> = WheelRenderer::new(800.0, 500.0);
            renderer.set_entries(&labels(n));
            let mut target = RecordingSurface::new(800.0, 500.0);
            let _ = renderer.render(&mut target, 0.0);
            let mut rot = 0.0;
            b.iter(|| {
                rot += 3.7;
                target.take_commands();
                black_box(renderer.render(&mut target, rot).map(|s| s.rows.len()))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_curve_position, bench_selection, bench_frame_pass);
criterion_main!(benches);
