// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Geomap Index: insert, bulk build, query, and remove.

use geomap_index::{Aabb2D, KdTree, QuadTree, SpatialIndex};

fn main() {
    let space = Aabb2D::new(0, 0, 100, 100);
    let r1 = (Aabb2D::new(10, 10, 20, 20), "r1");
    let r2 = (Aabb2D::new(80, 80, 90, 90), "r2");
    let r3 = (Aabb2D::new(45, 45, 55, 55), "r3");

    let mut kd = KdTree::new(space);
    for r in [r1, r2, r3] {
        kd.insert(r).expect("inside the indexed space");
    }
    let hits: Vec<_> = kd.query_rect(Aabb2D::new(0, 0, 50, 50));
    println!("kd hits in [0,0]-[50,50]: {:?}", hits);

    let mut quad = QuadTree::new(space);
    quad.build([r1, r2, r3]).expect("inside the indexed space");
    println!("quad hits at (50,50): {:?}", quad.query_point(50, 50));

    // Removal matches by equality.
    quad.remove(&r3);
    println!("quad hits at (50,50) after removal: {:?}", quad.query_point(50, 50));

    // Out-of-space objects are rejected with the offending bounds.
    if let Err(err) = kd.insert((Aabb2D::new(95, 95, 105, 105), "r4")) {
        println!("{err}");
    }
    println!("{kd:?}");
}
