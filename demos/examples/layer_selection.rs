// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer selection.
//!
//! Build a small map layer, then run rubber-band and click selections.
//!
//! Run:
//! - `RUST_LOG=geomap_layer=debug cargo run -p geomap_demos --example layer_selection`

use geomap_layer::{Feature, FeatureFlags, Geometry, Layer, QueryFilter};
use kurbo::{Circle, Line, Point, Rect};

fn main() {
    env_logger::init();

    let mut layer = Layer::with_kd_tree(Rect::new(0.0, 0.0, 500.0, 500.0));
    let river = layer
        .insert(Feature::new(
            Geometry::polyline([
                Point::new(0.0, 250.0),
                Point::new(150.0, 200.0),
                Point::new(300.0, 260.0),
                Point::new(500.0, 220.0),
            ]),
            "river",
        ))
        .unwrap();
    let road = layer
        .insert(Feature::new(
            Geometry::Line(Line::new((0.0, 0.0), (500.0, 500.0))),
            "road",
        ))
        .unwrap();
    let lake = layer
        .insert(Feature::new(
            Geometry::Circle(Circle::new((380.0, 120.0), 40.0)),
            "lake",
        ))
        .unwrap();
    let district = layer
        .insert(Feature::new(
            Geometry::polygon([
                Point::new(50.0, 350.0),
                Point::new(200.0, 330.0),
                Point::new(180.0, 480.0),
            ]),
            "district",
        ))
        .unwrap();
    let label = layer
        .insert(
            Feature::new(Geometry::Point(Point::new(120.0, 400.0)), "label")
                .with_flags(FeatureFlags::VISIBLE),
        )
        .unwrap();

    let name = |id| layer.get(id).map(|f| f.data).unwrap_or("?");
    let pick = QueryFilter {
        visible_only: true,
        selectable_only: true,
    };
    let all = QueryFilter::default();

    let band = Rect::new(320.0, 60.0, 480.0, 200.0);
    let selected: Vec<_> = layer.features_in_rect(band, pick).into_iter().map(name).collect();
    println!("rubber band {band:?}: {selected:?}");

    for (pt, tolerance) in [
        (Point::new(151.0, 203.0), 4.0),
        (Point::new(250.0, 251.0), 2.0),
        (Point::new(120.0, 400.0), 1.0),
    ] {
        let picked: Vec<_> = layer
            .features_at_point(pt, tolerance, pick)
            .into_iter()
            .map(name)
            .collect();
        let everything: Vec<_> = layer
            .features_at_point(pt, tolerance, all)
            .into_iter()
            .map(name)
            .collect();
        println!("click {pt:?} ±{tolerance}: selectable {picked:?}, all {everything:?}");
    }

    println!("ids: river {river:?}, district {district:?}, label {label:?}");
    layer
        .set_geometry(lake, Geometry::Circle(Circle::new((100.0, 100.0), 30.0)))
        .unwrap();
    if let Err(err) = layer.set_geometry(road, Geometry::Point(Point::new(600.0, 0.0))) {
        println!("road stays put: {err}");
    }
    layer.rebuild().unwrap();
    println!("{layer:?}");
}
