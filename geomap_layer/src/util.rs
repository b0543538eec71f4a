// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between Kurbo rectangles and index boxes, and closed-interval rect tests.

use geomap_index::Aabb2D;
use kurbo::{Point, Rect};

/// Convert a (possibly non-normalized) rectangle to an index box.
pub(crate) fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    let r = r.abs();
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn aabb_to_rect(a: Aabb2D<f64>) -> Rect {
    Rect::new(a.min_x, a.min_y, a.max_x, a.max_y)
}

/// Point-in-rect with the boundary included. `r` must be normalized.
///
/// Kurbo's `Rect::contains` excludes the max edges.
pub(crate) fn contains_closed(r: Rect, p: Point) -> bool {
    r.x0 <= p.x && p.x <= r.x1 && r.y0 <= p.y && p.y <= r.y1
}

/// Whether two normalized rectangles share at least one point.
pub(crate) fn overlaps_closed(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}
