// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=geomap_layer --heading-base-level=0

//! Geomap Layer: Kurbo-native map features over a Geomap spatial index.
//!
//! Geomap Layer is the consumer side of [`geomap_index`]: it stores map features
//! (points, segments, polylines, rectangles, circles, polygons) with flags and user
//! data, keeps their bounding boxes in a [`SpatialIndex`], and answers selection
//! queries.
//!
//! - Queries prune candidates through the index, then apply an exact geometric test,
//!   so a diagonal segment is not reported for a rectangle that only overlaps its
//!   bounding box.
//! - Features are addressed by generational [`FeatureId`]s; stale ids never alias.
//! - The index is a type parameter: [`Layer::with_kd_tree`], [`Layer::with_quad_tree`],
//!   or any [`SpatialIndex`] through [`Layer::with_index`].
//! - Cloning a layer takes an independent snapshot.
//!
//! The layer's extent is fixed at construction. Geometry whose bounding box leaves it
//! is rejected with [`LayerError::Index`].
//!
//! ## API overview
//!
//! - [`Layer`]: container managing features and the index synchronization.
//! - [`Feature`]: geometry, [`FeatureFlags`], and user data.
//! - [`Geometry`]: the supported shapes, with their exact predicates.
//! - [`QueryFilter`]: restricts query results (visible/selectable).
//!
//! Key operations:
//! - [`Layer::insert`] → [`FeatureId`]
//! - [`Layer::set_geometry`] / [`Layer::set_flags`] / [`Layer::remove`]
//! - [`Layer::features_in_rect`] and [`Layer::features_at_point`]
//! - [`Layer::rebuild`]: bulk-build the index from the live features.
//!
//! # Example
//!
//! ```rust
//! use geomap_layer::{Feature, Geometry, Layer, QueryFilter};
//! use kurbo::{Line, Point, Rect};
//!
//! let mut layer = Layer::with_quad_tree(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let road = layer
//!     .insert(Feature::new(
//!         Geometry::Line(Line::new((0.0, 0.0), (100.0, 100.0))),
//!         "road",
//!     ))
//!     .unwrap();
//! let park = layer
//!     .insert(Feature::new(
//!         Geometry::Rect(Rect::new(60.0, 0.0, 90.0, 30.0)),
//!         "park",
//!     ))
//!     .unwrap();
//!
//! // The road's bounding box covers the corner, the road itself does not.
//! let filter = QueryFilter { visible_only: true, selectable_only: false };
//! let hits = layer.features_in_rect(Rect::new(70.0, 0.0, 100.0, 20.0), filter);
//! assert_eq!(hits, [park]);
//!
//! // Pick with a tolerance.
//! let picked = layer.features_at_point(Point::new(40.0, 41.0), 1.0, filter);
//! assert_eq!(picked, [road]);
//! assert_eq!(layer.get(road).map(|f| f.data), Some("road"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod geometry;
mod layer;
mod types;
mod util;

pub use geometry::Geometry;
pub use layer::{Layer, LayerError};
pub use types::{Feature, FeatureFlags, FeatureId, IndexedFeature, QueryFilter};

pub use geomap_index::SpatialIndex;
