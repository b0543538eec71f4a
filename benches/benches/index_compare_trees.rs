// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use geomap_index::{Aabb2D, FlatVec, KdTree, QuadTree, SpatialIndex, TreeParams};

type Tagged<T> = (Aabb2D<T>, u32);

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Tagged<f64>> {
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

fn gen_grid_rects_i64(n: usize, cell: i64) -> Vec<Tagged<i64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as i64 * cell;
            let y0 = y as i64 * cell;
            out.push((Aabb2D::<i64>::from_xywh(x0, y0, cell, cell), (y * n + x) as u32));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, extent: f64, rect_w: f64, rect_h: f64) -> Vec<Tagged<f64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for i in 0..count {
        let x0 = rng.next_f64() * (extent - rect_w);
        let y0 = rng.next_f64() * (extent - rect_h);
        out.push((Aabb2D::<f64>::from_xywh(x0, y0, rect_w, rect_h), i as u32));
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Tagged<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((
            spread + rng.next_f64() * (2000.0 - 2.0 * spread),
            spread + rng.next_f64() * (2000.0 - 2.0 * spread),
        ));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            let tag = out.len() as u32;
            out.push((Aabb2D::<f64>::from_xywh(cx + dx, cy + dy, 12.0, 12.0), tag));
        }
    }
    out
}

fn space_f64() -> Aabb2D<f64> {
    Aabb2D::new(0.0, 0.0, 2048.0, 2048.0)
}

fn insert_then_query<I: SpatialIndex<f64, Tagged<f64>>>(
    mut idx: I,
    rects: &[Tagged<f64>],
    query: Aabb2D<f64>,
) {
    for r in rects {
        let _ = idx.insert(*r);
    }
    let hits = idx.query_rect(query).len();
    black_box(hits);
}

fn build_then_query<I: SpatialIndex<f64, Tagged<f64>>>(
    mut idx: I,
    rects: Vec<Tagged<f64>>,
    query: Aabb2D<f64>,
) {
    let _ = idx.build(rects);
    let hits = idx.query_rect(query).len();
    black_box(hits);
}

fn bench_insert_grid(c: &mut Criterion) {
    let query = Aabb2D::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0);
    for &n in &[32usize, 64, 128] {
        let mut group = c.benchmark_group(format!("insert_grid_n{n}"));
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function("kd", |b| {
            b.iter_batched(
                || KdTree::new(space_f64()),
                |idx| insert_then_query(idx, &rects, query),
                BatchSize::SmallInput,
            );
        });
        group.bench_function("quad", |b| {
            b.iter_batched(
                || QuadTree::new(space_f64()),
                |idx| insert_then_query(idx, &rects, query),
                BatchSize::SmallInput,
            );
        });
        if n <= 64 {
            group.bench_function("flatvec", |b| {
                b.iter_batched(
                    || FlatVec::new(space_f64()),
                    |idx| insert_then_query(idx, &rects, query),
                    BatchSize::SmallInput,
                );
            });
        }
        group.finish();
    }
}

fn bench_build_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_random_f64");
    let rects = gen_random_rects(4096, 2000.0, 12.0, 12.0);
    let query = Aabb2D::<f64>::from_xywh(800.0, 800.0, 400.0, 400.0);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("kd", |b| {
        b.iter_batched(
            || (KdTree::new(space_f64()), rects.clone()),
            |(idx, rects)| build_then_query(idx, rects, query),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("quad", |b| {
        b.iter_batched(
            || (QuadTree::new(space_f64()), rects.clone()),
            |(idx, rects)| build_then_query(idx, rects, query),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_build_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_clustered_f64");
    let rects = gen_clustered_rects(16, 256, 200.0);
    let query = Aabb2D::<f64>::from_xywh(500.0, 500.0, 600.0, 600.0);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("kd", |b| {
        b.iter_batched(
            || (KdTree::new(space_f64()), rects.clone()),
            |(idx, rects)| build_then_query(idx, rects, query),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("quad_small_leaves", |b| {
        b.iter_batched(
            || {
                let params = TreeParams::quad_default().with_min_object_count(16);
                (QuadTree::with_params(space_f64(), params), rects.clone())
            },
            |(idx, rects)| build_then_query(idx, rects, query),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_query_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_heavy_f64");
    let rects = gen_random_rects(8192, 2000.0, 8.0, 8.0);
    let mut queries = Vec::with_capacity(256);
    let mut rng = Rng::new(0xDEAD_BEEF_F00D_CAFE);
    for _ in 0..256 {
        let x0 = rng.next_f64() * 1800.0;
        let y0 = rng.next_f64() * 1800.0;
        queries.push(Aabb2D::<f64>::from_xywh(x0, y0, 200.0, 200.0));
    }
    let mut kd = KdTree::new(space_f64());
    let _ = kd.build(rects.iter().copied());
    let mut quad = QuadTree::new(space_f64());
    let _ = quad.build(rects.iter().copied());
    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("kd", |b| {
        b.iter(|| {
            let mut total = 0_usize;
            for q in &queries {
                kd.visit_rect(*q, |_| total += 1);
            }
            black_box(total);
        });
    });
    group.bench_function("quad", |b| {
        b.iter(|| {
            let mut total = 0_usize;
            for q in &queries {
                quad.visit_rect(*q, |_| total += 1);
            }
            black_box(total);
        });
    });
    group.bench_function("kd_point", |b| {
        b.iter(|| {
            let mut total = 0_usize;
            for q in &queries {
                total += kd.query_point(q.min_x, q.min_y).len();
            }
            black_box(total);
        });
    });
    group.finish();
}

fn bench_update_heavy_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_heavy_i64");
    let rects = gen_grid_rects_i64(64, 10);
    let space = Aabb2D::new(0_i64, 0, 1024, 1024);
    group.throughput(Throughput::Elements(rects.len() as u64));
    let mut kd = KdTree::new(space);
    let mut quad = QuadTree::new(space);
    for r in &rects {
        let _ = kd.insert(*r);
        let _ = quad.insert(*r);
    }
    group.bench_function("kd_remove_reinsert", |b| {
        b.iter_batched(
            || kd.clone(),
            |mut idx| {
                for r in &rects {
                    let (bounds, tag) = *r;
                    idx.remove(r);
                    let moved = Aabb2D::new(
                        bounds.min_x + 1,
                        bounds.min_y,
                        (bounds.max_x + 1).min(1024),
                        bounds.max_y,
                    );
                    let _ = idx.insert((moved, tag));
                }
                black_box(idx.len());
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("quad_remove_reinsert", |b| {
        b.iter_batched(
            || quad.clone(),
            |mut idx| {
                for r in &rects {
                    let (bounds, tag) = *r;
                    idx.remove(r);
                    let moved = Aabb2D::new(
                        bounds.min_x + 1,
                        bounds.min_y,
                        (bounds.max_x + 1).min(1024),
                        bounds.max_y,
                    );
                    let _ = idx.insert((moved, tag));
                }
                black_box(idx.len());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_grid,
    bench_build_random,
    bench_build_clustered,
    bench_query_heavy,
    bench_update_heavy_i64,
);
criterion_main!(benches);
