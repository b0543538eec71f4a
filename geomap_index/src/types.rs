// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// Intervals are closed: a box whose edge touches another box's edge intersects it,
/// and a point on the boundary is contained.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (bottom)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (top)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether this AABB contains the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether `other` lies entirely within this AABB.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
    }

    /// Whether the two AABBs share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// The intersection of two AABBs.
    pub fn intersect(&self, other: &Self) -> Self {
        let min_x = max_t(self.min_x, other.min_x);
        let min_y = max_t(self.min_y, other.min_y);
        let max_x = min_t(self.max_x, other.max_x);
        let max_y = min_t(self.max_y, other.max_y);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The smallest AABB covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }

    /// Return true if the AABB is empty or inverted (no area). Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }

    /// Whether any edge of `inner` lies on the matching edge of this AABB.
    pub(crate) fn touches_edge(&self, inner: &Self) -> bool {
        !lt(self.min_x, inner.min_x)
            || !lt(self.min_y, inner.min_y)
            || !lt(inner.max_x, self.max_x)
            || !lt(inner.max_y, self.max_y)
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// Width of the box (zero for inverted boxes).
    pub fn width(&self) -> T {
        T::max_zero(T::sub(self.max_x, self.min_x))
    }

    /// Height of the box (zero for inverted boxes).
    pub fn height(&self) -> T {
        T::max_zero(T::sub(self.max_y, self.min_y))
    }

    /// Center point `(x, y)`.
    pub fn center(&self) -> (T, T) {
        (
            T::mid(self.min_x, self.max_x),
            T::mid(self.min_y, self.max_y),
        )
    }
}

impl Aabb2D<f32> {
    /// Create an AABB from origin and size in f32.
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

impl Aabb2D<f64> {
    /// Create an AABB from origin and size in f64.
    pub const fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

impl Aabb2D<i64> {
    /// Create an AABB from origin and size in i64.
    pub const fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

/// Numeric scalar abstraction for 2D AABBs used by the trees.
///
/// This trait provides the minimal set of operations needed for cell bisection,
/// split-cost metrics and area thresholds, and an associated widened accumulator
/// type for area (e.g., f32→f64, i64→i128).
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for area/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Midpoint between a and b (used for bisection and centers).
    fn mid(a: Self, b: Self) -> Self;

    /// The point `num / den` of the way from `a` to `b`.
    ///
    /// `den` must be non-zero.
    fn lerp(a: Self, b: Self, num: u32, den: u32) -> Self;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert a `usize` to the accumulator type (for cost weighting and thresholds).
    fn acc_from_usize(n: usize) -> Self::Acc;

    /// Multiply two accumulator values, saturating for integer accumulators.
    fn acc_mul(a: Self::Acc, b: Self::Acc) -> Self::Acc;

    /// Add two accumulator values, saturating for integer accumulators.
    fn acc_add(a: Self::Acc, b: Self::Acc) -> Self::Acc;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Grid fractions are computed in f64 and narrowed back to the coordinate type."
    )]
    fn lerp(a: Self, b: Self, num: u32, den: u32) -> Self {
        let t = f64::from(num) / f64::from(den);
        (f64::from(a) + (f64::from(b) - f64::from(a)) * t) as Self
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as f64
    }

    #[inline]
    fn acc_mul(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a * b
    }

    #[inline]
    fn acc_add(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a + b
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn lerp(a: Self, b: Self, num: u32, den: u32) -> Self {
        a + (b - a) * (Self::from(num) / Self::from(den))
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as Self::Acc
    }

    #[inline]
    fn acc_mul(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a * b
    }

    #[inline]
    fn acc_add(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a + b
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The result lies between a and b, so it always fits back into i64."
    )]
    fn lerp(a: Self, b: Self, num: u32, den: u32) -> Self {
        let a_w = a as i128;
        let span = b as i128 - a_w;
        (a_w + span * i128::from(num) / i128::from(den)) as Self
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as i128
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as i128
    }

    #[inline]
    fn acc_mul(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a.saturating_mul(b)
    }

    #[inline]
    fn acc_add(a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a.saturating_add(b)
    }
}

/// Compute the area of an AABB using the scalar's widened accumulator type.
#[inline]
pub fn area<T: Scalar>(a: &Aabb2D<T>) -> T::Acc {
    let w = T::max_zero(T::sub(a.max_x, a.min_x));
    let h = T::max_zero(T::sub(a.max_y, a.min_y));
    T::acc_mul(T::widen(w), T::widen(h))
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb2D<T>, b: Aabb2D<T>) -> Aabb2D<T> {
    Aabb2D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_interval_predicates() {
        let a = Aabb2D::new(0, 0, 10, 10);
        assert!(a.contains_point(10, 10));
        assert!(a.intersects(&Aabb2D::new(10, 10, 20, 20)));
        assert!(!a.intersects(&Aabb2D::new(11, 0, 20, 10)));
        assert!(a.contains(&Aabb2D::new(0, 0, 10, 5)));
        assert!(!a.contains(&Aabb2D::new(0, 0, 11, 5)));
    }

    #[test]
    fn union_center_and_extent() {
        let a = Aabb2D::new(0.0, 0.0, 4.0, 2.0);
        let b = Aabb2D::new(-2.0, 1.0, 1.0, 6.0);
        let u = a.union(&b);
        assert_eq!(u, Aabb2D::new(-2.0, 0.0, 4.0, 6.0));
        assert_eq!(u.center(), (1.0, 3.0));
        assert_eq!(u.width(), 6.0);
        assert_eq!(u.height(), 6.0);
        assert_eq!(area(&u), 36.0);
    }

    #[test]
    fn lerp_places_grid_lines() {
        assert_eq!(<i64 as Scalar>::lerp(0, 60, 1, 6), 10);
        assert_eq!(<i64 as Scalar>::lerp(-60, 0, 5, 6), -10);
        assert_eq!(<f64 as Scalar>::lerp(0.0, 12.0, 3, 6), 6.0);
        assert_eq!(<f32 as Scalar>::lerp(0.0, 12.0, 2, 6), 4.0);
    }

    #[test]
    fn integer_accumulators_saturate() {
        let wide = Aabb2D::new(i64::MIN, i64::MIN, i64::MAX, i64::MAX);
        let a = area(&wide);
        assert!(a > 0);
        assert_eq!(<i64 as Scalar>::acc_mul(a, 4), i128::MAX);
        assert_eq!(<i64 as Scalar>::acc_add(a, <i64 as Scalar>::acc_mul(a, 4)), i128::MAX);
        assert_eq!(<f64 as Scalar>::acc_mul(3.0, 4.0), 12.0);
    }

    #[test]
    fn touches_edge_detects_shared_boundary() {
        let tight = Aabb2D::new(0, 0, 10, 10);
        assert!(tight.touches_edge(&Aabb2D::new(0, 2, 5, 5)));
        assert!(tight.touches_edge(&Aabb2D::new(2, 2, 5, 10)));
        assert!(!tight.touches_edge(&Aabb2D::new(1, 1, 9, 9)));
    }
}
