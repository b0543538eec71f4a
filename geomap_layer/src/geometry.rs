// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature geometry and the exact predicates applied after index pruning.

use kurbo::{
    BezPath, Circle, Line, ParamCurve, ParamCurveNearest, PathSeg, Point, Rect, Shape,
};

use crate::util::{contains_closed, overlaps_closed};

/// Accuracy passed to Kurbo's nearest-point solvers for curved segments.
const NEAREST_ACCURACY: f64 = 1e-9;

/// Geometry of a map feature, in layer coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A single location.
    Point(Point),
    /// A straight segment.
    Line(Line),
    /// An open path. Only its stroke is hit; the enclosed area is not.
    Polyline(BezPath),
    /// A filled axis-aligned rectangle.
    Rect(Rect),
    /// A filled circle.
    Circle(Circle),
    /// A filled closed path, using the non-zero winding rule.
    Polygon(BezPath),
}

impl Geometry {
    /// An open polyline through `points`.
    pub fn polyline(points: impl IntoIterator<Item = Point>) -> Self {
        Self::Polyline(path_through(points, false))
    }

    /// A closed polygon through `points`.
    pub fn polygon(points: impl IntoIterator<Item = Point>) -> Self {
        Self::Polygon(path_through(points, true))
    }

    /// The smallest axis-aligned rectangle enclosing the geometry.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Point(p) => Rect::from_points(*p, *p),
            Self::Line(l) => l.bounding_box(),
            Self::Polyline(path) | Self::Polygon(path) => path.bounding_box(),
            Self::Rect(r) => r.abs(),
            Self::Circle(c) => c.bounding_box(),
        }
    }

    /// Whether the geometry shares at least one point with `rect`.
    ///
    /// Boundaries count: a point on the rectangle's edge intersects it.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        let rect = rect.abs();
        match self {
            Self::Point(p) => contains_closed(rect, *p),
            Self::Line(l) => line_hits_rect(*l, rect),
            Self::Polyline(path) => path.segments().any(|seg| segment_hits_rect(seg, rect)),
            Self::Rect(r) => overlaps_closed(r.abs(), rect),
            Self::Circle(c) => {
                let nearest = Point::new(
                    c.center.x.clamp(rect.x0, rect.x1),
                    c.center.y.clamp(rect.y0, rect.y1),
                );
                (nearest - c.center).hypot2() <= c.radius * c.radius
            }
            Self::Polygon(path) => {
                path.segments().any(|seg| segment_hits_rect(seg, rect))
                    || path.contains(rect.origin())
            }
        }
    }

    /// Whether `pt` lies on the geometry or within `tolerance` of it.
    pub fn hit_by_point(&self, pt: Point, tolerance: f64) -> bool {
        let tolerance = tolerance.max(0.0);
        let tol_sq = tolerance * tolerance;
        match self {
            Self::Point(p) => (pt - *p).hypot2() <= tol_sq,
            Self::Line(l) => l.nearest(pt, NEAREST_ACCURACY).distance_sq <= tol_sq,
            Self::Polyline(path) => near_stroke(path, pt, tol_sq),
            Self::Rect(r) => contains_closed(r.abs().inflate(tolerance, tolerance), pt),
            Self::Circle(c) => {
                let reach = c.radius + tolerance;
                (pt - c.center).hypot2() <= reach * reach
            }
            Self::Polygon(path) => path.contains(pt) || near_stroke(path, pt, tol_sq),
        }
    }
}

fn path_through(points: impl IntoIterator<Item = Point>, close: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut points = points.into_iter();
    if let Some(first) = points.next() {
        path.move_to(first);
        for p in points {
            path.line_to(p);
        }
        if close {
            path.close_path();
        }
    }
    path
}

fn near_stroke(path: &BezPath, pt: Point, tol_sq: f64) -> bool {
    path.segments()
        .any(|seg| seg.nearest(pt, NEAREST_ACCURACY).distance_sq <= tol_sq)
}

/// Segment against a normalized rectangle, boundary included (Liang-Barsky clipping).
fn line_hits_rect(line: Line, rect: Rect) -> bool {
    let d = line.p1 - line.p0;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, line.p0.x - rect.x0),
        (d.x, rect.x1 - line.p0.x),
        (-d.y, line.p0.y - rect.y0),
        (d.y, rect.y1 - line.p0.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return false;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return false;
            }
            t1 = t1.min(t);
        }
    }
    true
}

fn segment_hits_rect(seg: PathSeg, rect: Rect) -> bool {
    match seg {
        PathSeg::Line(line) => line_hits_rect(line, rect),
        curve => {
            if !overlaps_closed(curve.bounding_box(), rect) {
                return false;
            }
            if contains_closed(rect, curve.start()) {
                return true;
            }
            let (a, b, c, d) = (
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
                Point::new(rect.x0, rect.y1),
            );
            [Line::new(a, b), Line::new(b, c), Line::new(c, d), Line::new(d, a)]
                .into_iter()
                .any(|edge| !curve.intersect_line(edge).is_empty())
        }
    }
}
