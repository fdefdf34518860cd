//! Benchmarks for the subdivision pipeline.

use criterion::{criterion_group, criterion_main, Criterion};
use quilt::algo::subdivide::compute_points;
use quilt::mesh::{build_topology, weld, WeldMode};
use quilt::prelude::*;
use nalgebra::{Point2, Point3};

/// De-indexed `n x n` grid in the XY plane, UVs following position.
fn create_grid_mesh(n: usize) -> RawMesh {
    let mut positions = Vec::with_capacity(n * n * 6);
    let mut texcoords = Vec::with_capacity(n * n * 6);

    let corner = |i: usize, j: usize| {
        let (x, y) = (i as f32, j as f32);
        (Point3::new(x, y, 0.0), Point2::new(x / n as f32, y / n as f32))
    };

    for j in 0..n {
        for i in 0..n {
            for (ci, cj) in [(i, j), (i + 1, j), (i + 1, j + 1), (i, j), (i + 1, j + 1), (i, j + 1)] {
                let (p, t) = corner(ci, cj);
                positions.push(p);
                texcoords.push(t);
            }
        }
    }

    let indices = (0..positions.len() as u32).collect();
    RawMesh::new(positions, texcoords, indices)
}

fn bench_stages(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);

    c.bench_function("weld_exact_100x100", |b| {
        b.iter(|| weld(&mesh.positions, WeldMode::Exact))
    });

    c.bench_function("weld_tolerance_100x100", |b| {
        b.iter(|| weld(&mesh.positions, WeldMode::Tolerance(1e-4)))
    });

    let welding = weld(&mesh.positions, WeldMode::Exact);
    c.bench_function("topology_100x100", |b| {
        b.iter(|| build_topology(&mesh, &welding).unwrap())
    });

    let topology = build_topology(&mesh, &welding).unwrap();
    c.bench_function("points_100x100", |b| {
        b.iter(|| compute_points(&mesh, &topology, 1e-6).unwrap())
    });
}

fn bench_subdivide(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);

    c.bench_function("subdivide_100x100", |b| {
        b.iter(|| subdivide(&mesh, &SubdivideOptions::default()).unwrap())
    });

    c.bench_function("subdivide_2x_30x30", |b| {
        let small = create_grid_mesh(30);
        b.iter(|| subdivide(&small, &SubdivideOptions::new(2)).unwrap())
    });

    let batch: Vec<RawMesh> = (0..8).map(|_| create_grid_mesh(40)).collect();
    c.bench_function("batch_parallel_8x40x40", |b| {
        b.iter(|| subdivide_batch(&batch, &SubdivideOptions::default()))
    });
    c.bench_function("batch_sequential_8x40x40", |b| {
        b.iter(|| subdivide_batch(&batch, &SubdivideOptions::default().sequential()))
    });
}

criterion_group!(benches, bench_stages, bench_subdivide);
criterion_main!(benches);
