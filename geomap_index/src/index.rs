// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The spatial-index contract shared by every backend.

use alloc::vec::Vec;

use crate::error::IndexError;
use crate::indexable::Indexable;
use crate::params::TreeParams;
use crate::types::{Aabb2D, Scalar};

/// Uniform operation set over a fixed indexed space.
///
/// Implementations store objects by value. Every stored object's bounds lie within
/// [`indexed_space`](SpatialIndex::indexed_space); operations that would break this
/// fail with [`IndexError::OutOfBounds`] and leave the index unchanged.
///
/// [`Clone`] is a deep copy: the clone owns its own node graph and its own copies of
/// every stored object, so mutating one never changes the other's query results.
///
/// Objects with inverted bounds (`max < min` on either axis) are accepted when their
/// corners lie in the indexed space, but they intersect nothing and contain no point, so
/// queries never report them. They still count toward [`len`](SpatialIndex::len) and can
/// be removed.
///
/// Indexes are not internally synchronized. Queries take `&self` and may run
/// concurrently; mutation requires exclusive access.
pub trait SpatialIndex<T: Scalar, O: Indexable<T>>: Clone {
    /// The outer rectangle fixed at construction.
    fn indexed_space(&self) -> Aabb2D<T>;

    /// Current tuning parameters.
    fn params(&self) -> &TreeParams<T>;

    /// Mutable access to the tuning parameters.
    ///
    /// Changes apply to subsequent inserts and builds.
    fn params_mut(&mut self) -> &mut TreeParams<T>;

    /// Deepest materialized node depth (the root is at depth 0).
    fn depth(&self) -> usize;

    /// Number of materialized nodes, including the root.
    fn node_count(&self) -> usize;

    /// Number of stored objects.
    fn len(&self) -> usize;

    /// Whether no objects are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole contents with `objects`.
    ///
    /// The batch is validated before anything is discarded: if any object lies outside
    /// the indexed space the error is returned and the previous contents are kept.
    ///
    /// # Errors
    ///
    /// [`IndexError::OutOfBounds`] for the first object not contained in the indexed space.
    fn build<I: IntoIterator<Item = O>>(&mut self, objects: I) -> Result<(), IndexError<T>>;

    /// Insert a single object.
    ///
    /// # Errors
    ///
    /// [`IndexError::OutOfBounds`] if the object's bounds are not contained in the indexed space.
    fn insert(&mut self, object: O) -> Result<(), IndexError<T>>;

    /// Remove one occurrence of `object`. Returns whether anything was removed.
    fn remove(&mut self, object: &O) -> bool
    where
        O: PartialEq;

    /// Drop every stored object and node. The indexed space and parameters are kept.
    fn clear(&mut self);

    /// Visit every stored object whose bounds intersect `rect`.
    fn visit_rect<'a, F: FnMut(&'a O)>(&'a self, rect: Aabb2D<T>, f: F)
    where
        O: 'a;

    /// Visit every stored object whose bounds contain the point.
    fn visit_point<'a, F: FnMut(&'a O)>(&'a self, x: T, y: T, f: F)
    where
        O: 'a;

    /// Collect every stored object whose bounds intersect `rect`.
    ///
    /// The default implementation collects [`visit_rect`](SpatialIndex::visit_rect).
    fn query_rect(&self, rect: Aabb2D<T>) -> Vec<&O> {
        let mut out = Vec::new();
        self.visit_rect(rect, |o| out.push(o));
        out
    }

    /// Collect every stored object whose bounds contain the point.
    ///
    /// The default implementation collects [`visit_point`](SpatialIndex::visit_point).
    fn query_point(&self, x: T, y: T) -> Vec<&O> {
        let mut out = Vec::new();
        self.visit_point(x, y, |o| out.push(o));
        out
    }
}

/// Reject `bounds` unless `space` contains it.
pub(crate) fn check_bounds<T: Scalar>(
    space: &Aabb2D<T>,
    bounds: &Aabb2D<T>,
) -> Result<(), IndexError<T>> {
    if space.contains(bounds) {
        Ok(())
    } else {
        log::debug!("rejecting {bounds:?}: outside indexed space {space:?}");
        Err(IndexError::OutOfBounds {
            bounds: *bounds,
            space: *space,
        })
    }
}

/// Validate a whole batch, returning it collected when every object fits.
pub(crate) fn checked_batch<T, O, I>(space: &Aabb2D<T>, objects: I) -> Result<Vec<O>, IndexError<T>>
where
    T: Scalar,
    O: Indexable<T>,
    I: IntoIterator<Item = O>,
{
    let objects: Vec<O> = objects.into_iter().collect();
    for object in &objects {
        check_bounds(space, &object.bounds())?;
    }
    Ok(objects)
}
