// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability an object needs to be stored in a spatial index.

use crate::types::{Aabb2D, Scalar};

/// An object that can be stored in a [`SpatialIndex`](crate::SpatialIndex).
///
/// The index only reads [`bounds`](Indexable::bounds); it never mutates the object.
/// `Clone` must produce a deep duplicate: cloning an index clones every stored object,
/// and the copies must not share mutable state with the originals.
pub trait Indexable<T: Scalar>: Clone {
    /// Snapshot of the object's bounding box.
    ///
    /// The value must not change while the object is stored in an index.
    fn bounds(&self) -> Aabb2D<T>;
}

impl<T: Scalar> Indexable<T> for Aabb2D<T> {
    #[inline]
    fn bounds(&self) -> Self {
        *self
    }
}

/// A bounding box tagged with a payload.
impl<T: Scalar, P: Clone> Indexable<T> for (Aabb2D<T>, P) {
    #[inline]
    fn bounds(&self) -> Aabb2D<T> {
        self.0
    }
}
