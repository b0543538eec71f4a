// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=geomap_index --heading-base-level=0

//! Geomap Index: hierarchical 2D spatial indexes over a fixed indexed space.
//!
//! Geomap Index stores objects by their axis-aligned bounding boxes (AABBs) and answers
//! point and rectangle queries without scanning every object.
//!
//! - Two tree variants behind one contract, [`SpatialIndex`]:
//!   - [`KdTree`]: a binary split tree. Nodes split along one axis; bulk builds choose
//!     the split line with a cost heuristic.
//!   - [`QuadTree`]: a quadrant tree. Nodes split at their center into four quadrants.
//! - Objects only need to report a bounding box ([`Indexable`]); bare [`Aabb2D`] values
//!   and `(Aabb2D, payload)` tuples work out of the box.
//! - Every stored object must fit inside the indexed space fixed at construction.
//!   Inserts and builds that would break this fail with [`IndexError::OutOfBounds`].
//! - Cloning an index is a deep copy.
//!
//! It is generic over the scalar type `T` (`f32`, `f64`, `i64`) and does not depend on any
//! geometry crate. Area metrics use widened accumulators (f32→f64, f64→f64, i64→i128).
//!
//! # Example
//!
//! ```rust
//! use geomap_index::{Aabb2D, KdTree, SpatialIndex};
//!
//! let mut tree: KdTree<i64, (Aabb2D<i64>, &str)> = KdTree::new(Aabb2D::new(0, 0, 100, 100));
//! tree.insert((Aabb2D::new(10, 10, 20, 20), "a")).unwrap();
//! tree.insert((Aabb2D::new(80, 80, 90, 90), "b")).unwrap();
//! tree.insert((Aabb2D::new(45, 45, 55, 55), "c")).unwrap();
//!
//! let mut hits: Vec<_> = tree
//!     .query_rect(Aabb2D::new(0, 0, 50, 50))
//!     .into_iter()
//!     .map(|(_, name)| *name)
//!     .collect();
//! hits.sort();
//! assert_eq!(hits, ["a", "c"]);
//!
//! // Objects outside the indexed space are rejected.
//! assert!(tree.insert((Aabb2D::new(90, 90, 110, 110), "d")).is_err());
//! ```
//!
//! Both trees implement the same trait, so code can be written once against it:
//!
//! ```rust
//! use geomap_index::{Aabb2D, QuadTree, SpatialIndex};
//!
//! fn hits_at<I: SpatialIndex<f64, Aabb2D<f64>>>(index: &I, x: f64, y: f64) -> usize {
//!     index.query_point(x, y).len()
//! }
//!
//! let mut quad = QuadTree::new(Aabb2D::new(0.0, 0.0, 10.0, 10.0));
//! quad.build([Aabb2D::new(1.0, 1.0, 2.0, 2.0), Aabb2D::new(2.0, 2.0, 3.0, 3.0)])
//!     .unwrap();
//! assert_eq!(hits_at(&quad, 2.0, 2.0), 2);
//! ```
//!
//! ## Choosing a variant
//!
//! - [`KdTree`]: adapts its splits to the data on bulk build; a good general choice
//!   when objects vary in size or cluster unevenly.
//! - [`QuadTree`]: fixed center splits and large leaves; suits many small, uniformly
//!   distributed objects. Nodes track the tight box of their own objects, so range
//!   queries can accept or skip a node's objects without testing each one.
//! - [`FlatVec`]: linear scans. Smallest and simplest, for very small sets.
//!
//! See the [`backends`] docs for the split-cost heuristic.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates.
//! Intervals are closed: touching edges intersect and boundary points are contained.

#![no_std]

extern crate alloc;

pub mod backends;
pub mod error;
pub mod index;
pub mod indexable;
pub mod params;
pub mod types;

pub use backends::flatvec::FlatVec;
pub use backends::kdtree::{KdTree, KdTreeF32, KdTreeF64, KdTreeI64};
pub use backends::quadtree::{QuadTree, QuadTreeF32, QuadTreeF64, QuadTreeI64};
pub use error::IndexError;
pub use index::SpatialIndex;
pub use indexable::Indexable;
pub use params::TreeParams;
pub use types::{Aabb2D, Scalar, area};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    type Tagged = (Aabb2D<f64>, u32);

    fn fill<I: SpatialIndex<f64, Tagged>>(index: &mut I) {
        for i in 0..40_u32 {
            let x = f64::from(i % 8) * 12.0;
            let y = f64::from(i / 8) * 19.0;
            index.insert((Aabb2D::new(x, y, x + 6.0, y + 6.0), i)).unwrap();
        }
    }

    fn sorted_tags(hits: Vec<&Tagged>) -> Vec<u32> {
        let mut tags: Vec<u32> = hits.into_iter().map(|(_, t)| *t).collect();
        tags.sort_unstable();
        tags
    }

    #[test]
    fn variants_agree_through_the_trait() {
        let space = Aabb2D::new(0.0, 0.0, 100.0, 100.0);
        let mut kd = KdTreeF64::new(space);
        let mut quad =
            QuadTreeF64::with_params(space, TreeParams::quad_default().with_min_object_count(3));
        let mut flat = FlatVec::new(space);
        fill(&mut kd);
        fill(&mut quad);
        fill(&mut flat);

        for rect in [
            Aabb2D::new(0.0, 0.0, 30.0, 30.0),
            Aabb2D::new(6.0, 19.0, 12.0, 25.0),
            Aabb2D::new(50.0, 50.0, 51.0, 51.0),
            space,
        ] {
            let expected = sorted_tags(flat.query_rect(rect));
            assert_eq!(sorted_tags(kd.query_rect(rect)), expected);
            assert_eq!(sorted_tags(quad.query_rect(rect)), expected);
        }
        assert_eq!(sorted_tags(kd.query_point(12.0, 19.0)), vec![9]);
        assert_eq!(sorted_tags(quad.query_point(12.0, 19.0)), vec![9]);
        assert!(kd.query_point(9.0, 9.0).is_empty());
    }

    #[test]
    fn out_of_bounds_error_reports_both_boxes() {
        let space = Aabb2D::new(0, 0, 10, 10);
        let mut quad: QuadTreeI64<Aabb2D<i64>> = QuadTree::new(space);
        let err = quad.insert(Aabb2D::new(5, 5, 11, 6)).unwrap_err();
        assert_eq!(
            err,
            IndexError::OutOfBounds {
                bounds: Aabb2D::new(5, 5, 11, 6),
                space,
            }
        );
        assert_eq!(quad.len(), 0);
    }
}
