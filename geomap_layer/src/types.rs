// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layer: feature identifiers, flags, and features.

use geomap_index::{Aabb2D, Indexable};

use crate::geometry::Geometry;

/// Identifier for a feature in a [`Layer`](crate::Layer).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the feature is removed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `FeatureId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `FeatureId`.
///
/// Stale `FeatureId`s never alias a different live feature because the generation must match.
/// Use [`Layer::is_alive`](crate::Layer::is_alive) to check liveness.
///
/// `FeatureId`s order by slot, then generation. Query results are returned in this order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FeatureId(pub(crate) u32, pub(crate) u32);

impl FeatureId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Feature flags controlling visibility and selection.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FeatureFlags: u8 {
        /// Feature is visible (participates in rendering and rectangle queries).
        const VISIBLE    = 0b0000_0001;
        /// Feature can be selected (participates in picking).
        const SELECTABLE = 0b0000_0010;
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::SELECTABLE
    }
}

/// A map feature: geometry, flags, and user data.
#[derive(Clone, Debug)]
pub struct Feature<D> {
    /// Geometry in layer coordinates.
    pub geometry: Geometry,
    /// Visibility and selection flags.
    pub flags: FeatureFlags,
    /// User data carried alongside the geometry.
    pub data: D,
}

impl<D> Feature<D> {
    /// Create a feature with default flags.
    pub fn new(geometry: Geometry, data: D) -> Self {
        Self {
            geometry,
            flags: FeatureFlags::default(),
            data,
        }
    }

    /// Replace the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: FeatureFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// The entry a layer stores in its spatial index: a feature's bounds and its id.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndexedFeature {
    /// Bounding box of the feature's geometry when it was indexed.
    pub bounds: Aabb2D<f64>,
    /// The feature this entry stands for.
    pub id: FeatureId,
}

impl Indexable<f64> for IndexedFeature {
    #[inline]
    fn bounds(&self) -> Aabb2D<f64> {
        self.bounds
    }
}

/// Filters applied during layer queries.
///
/// Used by [`Layer::features_in_rect`](crate::Layer::features_in_rect) and
/// [`Layer::features_at_point`](crate::Layer::features_at_point).
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, only consider features marked [`FeatureFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only consider features marked [`FeatureFlags::SELECTABLE`].
    pub selectable_only: bool,
}

impl QueryFilter {
    /// Whether a feature with `flags` passes this filter.
    pub fn accepts(&self, flags: FeatureFlags) -> bool {
        (!self.visible_only || flags.contains(FeatureFlags::VISIBLE))
            && (!self.selectable_only || flags.contains(FeatureFlags::SELECTABLE))
    }
}
