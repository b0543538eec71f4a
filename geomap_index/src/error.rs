// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by spatial indexes.

use core::fmt::Debug;

use crate::types::Aabb2D;

/// Error returned by [`SpatialIndex::insert`](crate::SpatialIndex::insert) and
/// [`SpatialIndex::build`](crate::SpatialIndex::build).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IndexError<T: Debug> {
    /// The object's bounding box is not contained in the indexed space.
    #[error("bounds {bounds:?} are not contained in the indexed space {space:?}")]
    OutOfBounds {
        /// Bounding box of the rejected object.
        bounds: Aabb2D<T>,
        /// Indexed space of the index that rejected it.
        space: Aabb2D<T>,
    },
}
