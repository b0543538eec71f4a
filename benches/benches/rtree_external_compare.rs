// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use geomap_index::{Aabb2D, KdTree, QuadTree, SpatialIndex};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<(Aabb2D<f64>, u32)> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push((Aabb2D::<f64>::from_xywh(x0, y0, cell, cell), (y * n + x) as u32));
        }
    }
    out
}

fn to_rstar_rects(v: &[(Aabb2D<f64>, u32)]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|(r, _)| Rectangle::from_corners([r.min_x, r.min_y], [r.max_x, r.max_y]))
        .collect()
}

fn bench_external_compare_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_f64");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let space = Aabb2D::<f64>::from_xywh(0.0, 0.0, n as f64 * 10.0, n as f64 * 10.0);
        let aabb_query = Aabb2D::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("kd_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || rects.clone(),
                |entries| {
                    let mut idx = KdTree::new(space);
                    let _ = idx.build(entries);
                    let hits: usize = idx.query_rect(aabb_query).len();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("quad_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || rects.clone(),
                |entries| {
                    let mut idx = QuadTree::new(space);
                    let _ = idx.build(entries);
                    let hits: usize = idx.query_rect(aabb_query).len();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(
                        [aabb_query.min_x, aabb_query.min_y],
                        [aabb_query.max_x, aabb_query.max_y],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_external_compare_f64);
criterion_main!(benches);
