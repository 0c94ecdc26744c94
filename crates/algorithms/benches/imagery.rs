//! Benchmarks for the NDVI overlay path

use agrisentinel_algorithms::imagery::{ndvi, render_tile, BandSelection, NdviShader};
use agrisentinel_core::{BandSet, GeoTransform, Raster};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_band(size: usize, base: f64) -> Raster<f64> {
    let mut r = Raster::new(size, size);
    r.set_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));
    for row in 0..size {
        for col in 0..size {
            let v = base + ((row * 7 + col * 13) % 200) as f64;
            r.set(row, col, v).unwrap();
        }
    }
    r
}

fn bench_ndvi(c: &mut Criterion) {
    let mut group = c.benchmark_group("imagery/ndvi");
    for size in [256, 512, 1024, 2048] {
        let nir = create_band(size, 300.0);
        let red = create_band(size, 100.0);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| ndvi(black_box(&nir), black_box(&red)).unwrap())
        });
    }
    group.finish();
}

fn bench_render_tile(c: &mut Criterion) {
    let mut group = c.benchmark_group("imagery/render_tile");
    let size = 1024;
    let bands = BandSet::new(vec![create_band(size, 100.0), create_band(size, 300.0)]).unwrap();
    let shader = NdviShader::new(BandSelection { red: 0, nir: 1 });
    let extent = bands.bounds();
    for resolution in [16, 64, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(resolution),
            &resolution,
            |b, &res| b.iter(|| render_tile(black_box(&bands), &shader, &extent, res)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_ndvi, bench_render_tile);
criterion_main!(benches);
