// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector with linear scans. Small and simple; good for tiny sets and as a
//! reference for the trees.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::IndexError;
use crate::index::{SpatialIndex, check_bounds, checked_batch};
use crate::indexable::Indexable;
use crate::params::TreeParams;
use crate::types::{Aabb2D, Scalar};

/// Flat vector with linear scans.
///
/// Implements the same contract as the trees with a single node: [`depth`] is always 0
/// and [`node_count`] is always 1. Parameters are stored but never consulted.
///
/// [`depth`]: SpatialIndex::depth
/// [`node_count`]: SpatialIndex::node_count
#[derive(Clone)]
pub struct FlatVec<T: Scalar, O> {
    space: Aabb2D<T>,
    params: TreeParams<T>,
    objects: Vec<O>,
}

impl<T: Scalar, O: Indexable<T>> FlatVec<T, O> {
    /// Create an empty index over `space`.
    pub fn new(space: Aabb2D<T>) -> Self {
        Self {
            space,
            params: TreeParams::kd_default(),
            objects: Vec::new(),
        }
    }

    /// Iterate over every stored object in insertion order.
    ///
    /// Removal swaps the last object into the vacated position.
    pub fn iter(&self) -> core::slice::Iter<'_, O> {
        self.objects.iter()
    }
}

impl<T: Scalar, O: Indexable<T>> SpatialIndex<T, O> for FlatVec<T, O> {
    fn indexed_space(&self) -> Aabb2D<T> {
        self.space
    }

    fn params(&self) -> &TreeParams<T> {
        &self.params
    }

    fn params_mut(&mut self) -> &mut TreeParams<T> {
        &mut self.params
    }

    fn depth(&self) -> usize {
        0
    }

    fn node_count(&self) -> usize {
        1
    }

    fn len(&self) -> usize {
        self.objects.len()
    }

    fn build<I: IntoIterator<Item = O>>(&mut self, objects: I) -> Result<(), IndexError<T>> {
        self.objects = checked_batch(&self.space, objects)?;
        Ok(())
    }

    fn insert(&mut self, object: O) -> Result<(), IndexError<T>> {
        check_bounds(&self.space, &object.bounds())?;
        self.objects.push(object);
        Ok(())
    }

    fn remove(&mut self, object: &O) -> bool
    where
        O: PartialEq,
    {
        match self.objects.iter().position(|o| o == object) {
            Some(pos) => {
                let _ = self.objects.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.objects.clear();
    }

    fn visit_rect<'a, F: FnMut(&'a O)>(&'a self, rect: Aabb2D<T>, mut f: F)
    where
        O: 'a,
    {
        for o in &self.objects {
            if o.bounds().intersects(&rect) {
                f(o);
            }
        }
    }

    fn visit_point<'a, F: FnMut(&'a O)>(&'a self, x: T, y: T, mut f: F)
    where
        O: 'a,
    {
        for o in &self.objects {
            if o.bounds().contains_point(x, y) {
                f(o);
            }
        }
    }
}

impl<T: Scalar, O> Debug for FlatVec<T, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatVec")
            .field("space", &self.space)
            .field("len", &self.objects.len())
            .finish_non_exhaustive()
    }
}
