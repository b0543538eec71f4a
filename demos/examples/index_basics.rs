// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index basics.
//!
//! Fill both tree variants with the same boxes, compare their shape, and query them.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p geomap_demos --example index_basics`

use geomap_index::{Aabb2D, KdTree, QuadTree, SpatialIndex, TreeParams};

fn main() {
    env_logger::init();

    let space = Aabb2D::new(0.0, 0.0, 1000.0, 1000.0);
    let boxes: Vec<(Aabb2D<f64>, usize)> = (0..400)
        .map(|i| {
            let x = (i % 20) as f64 * 50.0;
            let y = (i / 20) as f64 * 50.0;
            (Aabb2D::<f64>::from_xywh(x + 5.0, y + 5.0, 30.0, 30.0), i)
        })
        .collect();

    let mut kd = KdTree::new(space);
    kd.build(boxes.iter().copied()).unwrap();

    let params = TreeParams::quad_default().with_min_object_count(8);
    let mut quad = QuadTree::with_params(space, params);
    for b in &boxes {
        quad.insert(*b).unwrap();
    }

    println!("kd:   depth {}, {} nodes", kd.depth(), kd.node_count());
    println!("quad: depth {}, {} nodes", quad.depth(), quad.node_count());

    let window = Aabb2D::new(100.0, 100.0, 240.0, 240.0);
    let mut kd_hits: Vec<usize> = kd.query_rect(window).into_iter().map(|(_, i)| *i).collect();
    let mut quad_hits: Vec<usize> = quad
        .query_rect(window)
        .into_iter()
        .map(|(_, i)| *i)
        .collect();
    kd_hits.sort_unstable();
    quad_hits.sort_unstable();
    println!("hits in {window:?}: {kd_hits:?}");
    assert_eq!(kd_hits, quad_hits, "both variants must agree");

    // Snapshots are independent.
    let snapshot = kd.clone();
    kd.clear();
    println!("after clear: {} vs snapshot {}", kd.len(), snapshot.len());

    match quad.insert((Aabb2D::new(990.0, 990.0, 1010.0, 1010.0), 9999)) {
        Ok(()) => println!("unexpectedly accepted"),
        Err(err) => println!("rejected: {err}"),
    }
}
