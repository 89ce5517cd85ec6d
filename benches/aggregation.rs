use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hexglobe::aggregate::aggregate;
use hexglobe::types::{Coordinates, GeoPoint};
use std::hint::black_box;

/// Deterministic point cloud spread over the sphere.
fn make_points(count: usize) -> Vec<GeoPoint> {
    (0..count)
        .map(|i| {
            let lat = -85.0 + (i as f64 * 37.0) % 170.0;
            let lon = -180.0 + (i as f64 * 73.0) % 360.0;
            GeoPoint {
                city: format!("city_{i}"),
                country: None,
                coordinates: Coordinates { lat, lon },
                value: 1.0 + (i % 100) as f64,
            }
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for num_points in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*num_points as u64));
        let points = make_points(*num_points);

        for resolution in [1u8, 3, 5] {
            group.bench_with_input(
                BenchmarkId::new(format!("res_{resolution}"), num_points),
                &points,
                |b, points| {
                    b.iter(|| aggregate(black_box(points), resolution, 100.0, 0.5).unwrap());
                },
            );
        }
    }

    group.finish();
}

fn bench_cell_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_lookup");
    let points = make_points(1_000);

    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("to_cell", |b| {
        b.iter(|| {
            for point in &points {
                black_box(
                    hexglobe::cells::to_cell(
                        point.coordinates.lat,
                        point.coordinates.lon,
                        3,
                    )
                    .unwrap(),
                );
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_aggregation, bench_cell_lookup);
criterion_main!(benches);
