// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning parameters shared by the tree variants.

use crate::types::Scalar;

/// Tuning parameters for [`KdTree`](crate::KdTree) and [`QuadTree`](crate::QuadTree).
///
/// Parameters may be changed at any time through
/// [`SpatialIndex::params_mut`](crate::SpatialIndex::params_mut); they affect
/// subsequent inserts and builds but never restructure existing nodes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TreeParams<T: Scalar> {
    /// Deepest level at which nodes may be materialized. The root is at depth 0.
    pub max_depth: usize,
    /// Cells whose area is at or below this value are never split.
    pub box_area_threshold: T::Acc,
    /// Node population at or below which a node is not split.
    ///
    /// The binary split tree only consults this during [`build`](crate::SpatialIndex::build);
    /// the quadrant tree also uses it to decide when a leaf subdivides on insert.
    pub min_object_count: usize,
}

impl<T: Scalar> TreeParams<T> {
    /// Defaults for the binary split tree: depth 12, area threshold 10, 4 objects per leaf.
    pub fn kd_default() -> Self {
        Self {
            max_depth: 12,
            box_area_threshold: T::acc_from_usize(10),
            min_object_count: 4,
        }
    }

    /// Defaults for the quadrant tree: depth 10, area threshold 10, 200 objects per leaf.
    ///
    /// The large leaf population reflects the quadrant tree's target workload of many
    /// small, uniformly distributed objects.
    pub fn quad_default() -> Self {
        Self {
            max_depth: 10,
            box_area_threshold: T::acc_from_usize(10),
            min_object_count: 200,
        }
    }

    /// Replace `max_depth`.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace `box_area_threshold`.
    #[must_use]
    pub fn with_box_area_threshold(mut self, threshold: T::Acc) -> Self {
        self.box_area_threshold = threshold;
        self
    }

    /// Replace `min_object_count`.
    #[must_use]
    pub fn with_min_object_count(mut self, count: usize) -> Self {
        self.min_object_count = count;
        self
    }
}

/// Structural counters maintained by a tree and threaded through recursive calls.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TreeStats {
    pub(crate) depth: usize,
    pub(crate) node_count: usize,
}

impl TreeStats {
    pub(crate) const fn root() -> Self {
        Self {
            depth: 0,
            node_count: 1,
        }
    }

    /// Record a newly materialized node at `depth`.
    pub(crate) fn materialized(&mut self, depth: usize) {
        self.node_count += 1;
        if depth > self.depth {
            self.depth = depth;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_differ_per_variant() {
        let kd = TreeParams::<f64>::kd_default();
        let quad = TreeParams::<f64>::quad_default();
        assert_eq!(kd.min_object_count, 4);
        assert_eq!(quad.min_object_count, 200);
        assert_eq!(kd.box_area_threshold, 10.0);
        assert_eq!(TreeParams::<i64>::kd_default().box_area_threshold, 10_i128);
    }

    #[test]
    fn builders_replace_fields() {
        let p = TreeParams::<i64>::kd_default()
            .with_max_depth(3)
            .with_box_area_threshold(0)
            .with_min_object_count(1);
        assert_eq!(p.max_depth, 3);
        assert_eq!(p.box_area_threshold, 0);
        assert_eq!(p.min_object_count, 1);
    }

    #[test]
    fn stats_track_deepest_node() {
        let mut s = TreeStats::root();
        s.materialized(2);
        s.materialized(1);
        assert_eq!(s, TreeStats { depth: 2, node_count: 3 });
    }
}
