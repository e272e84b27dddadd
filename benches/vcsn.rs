use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vcsn::{DistanceMetric, GridStation, GridTable, StationLocator};

/// A 0.05 degree grid roughly covering New Zealand.
fn synthetic_grid() -> GridTable {
    let mut stations = Vec::new();
    let mut id = 0;
    for i in 0..280 {
        for j in 0..220 {
            id += 1;
            stations.push(GridStation {
                id,
                latitude: -47.3 + i as f64 * 0.05,
                longitude: 166.4 + j as f64 * 0.05,
            });
        }
    }
    GridTable::from_stations(stations)
}

fn bench_nearest_station(c: &mut Criterion) {
    let grid = synthetic_grid();
    c.bench_function("build_locator", |b| b.iter(|| StationLocator::new(black_box(&grid))));

    let locator = StationLocator::new(&grid);
    c.bench_function("nearest_station_planar", |b| {
        b.iter(|| {
            locator.nearest_station(
                black_box(-41.2865),
                black_box(174.7762),
                0.05,
                DistanceMetric::Planar,
            )
        })
    });
    c.bench_function("nearest_station_haversine", |b| {
        b.iter(|| {
            locator.nearest_station(
                black_box(-41.2865),
                black_box(174.7762),
                0.05,
                DistanceMetric::Haversine,
            )
        })
    });
}

criterion_group!(benches, bench_nearest_station);
criterion_main!(benches);
