// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core layer implementation: feature storage, index synchronization, queries.

use alloc::vec::Vec;
use geomap_index::{IndexError, KdTree, QuadTree, SpatialIndex};
use kurbo::{Point, Rect};

use crate::geometry::Geometry;
use crate::types::{Feature, FeatureFlags, FeatureId, IndexedFeature, QueryFilter};
use crate::util::{aabb_to_rect, rect_to_aabb};

/// Error returned by fallible [`Layer`] operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayerError {
    /// The spatial index rejected the geometry's bounds.
    #[error(transparent)]
    Index(#[from] IndexError<f64>),
    /// The identifier refers to a removed feature.
    #[error("feature {0:?} is not alive")]
    StaleFeature(FeatureId),
}

#[derive(Clone, Debug)]
struct Slot<D> {
    generation: u32,
    feature: Feature<D>,
    entry: IndexedFeature,
}

/// A collection of map features kept in sync with a spatial index.
///
/// Every feature is indexed by the bounding box of its geometry. Queries prune
/// candidates through the index and then apply an exact geometric test.
///
/// `I` is the index; any [`SpatialIndex`] over `f64` works. The default is the
/// binary split tree.
#[derive(Clone)]
pub struct Layer<D, I = KdTree<f64, IndexedFeature>> {
    slots: Vec<Option<Slot<D>>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>, // never holds a slot whose generation is u32::MAX
    len: usize,
    index: I,
}

impl<D, I> core::fmt::Debug for Layer<D, I>
where
    I: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Layer")
            .field("slots_total", &self.slots.len())
            .field("features_alive", &self.len)
            .field("free_list", &self.free_list.len())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<D> Layer<D, KdTree<f64, IndexedFeature>> {
    /// Create an empty layer covering `extent`, indexed by a binary split tree.
    pub fn with_kd_tree(extent: Rect) -> Self {
        Self::with_index(KdTree::new(rect_to_aabb(extent)))
    }
}

impl<D> Layer<D, QuadTree<f64, IndexedFeature>> {
    /// Create an empty layer covering `extent`, indexed by a quadrant tree.
    pub fn with_quad_tree(extent: Rect) -> Self {
        Self::with_index(QuadTree::new(rect_to_aabb(extent)))
    }
}

impl<D, I: SpatialIndex<f64, IndexedFeature>> Layer<D, I> {
    /// Create an empty layer backed by `index`.
    ///
    /// Anything already stored in `index` is discarded.
    pub fn with_index(mut index: I) -> Self {
        index.clear();
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            index,
        }
    }

    /// The area features must lie within: the index's indexed space.
    pub fn extent(&self) -> Rect {
        aabb_to_rect(self.index.indexed_space())
    }

    /// The spatial index backing this layer.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Number of live features.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the layer holds no features.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a feature.
    ///
    /// # Errors
    ///
    /// [`LayerError::Index`] if the geometry's bounding box is not within the
    /// [extent](Layer::extent). Nothing is stored and no identifier is consumed.
    pub fn insert(&mut self, feature: Feature<D>) -> Result<FeatureId, LayerError> {
        let (idx, generation) = match self.free_list.last() {
            Some(&idx) => (idx, self.generations[idx] + 1),
            None => (self.slots.len(), 1),
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "FeatureId uses 32-bit indices by design."
        )]
        let id = FeatureId::new(idx as u32, generation);
        let entry = IndexedFeature {
            bounds: rect_to_aabb(feature.geometry.bounding_box()),
            id,
        };
        self.index.insert(entry)?;

        let slot = Slot {
            generation,
            feature,
            entry,
        };
        if idx < self.slots.len() {
            let _ = self.free_list.pop();
            self.generations[idx] = generation;
            self.slots[idx] = Some(slot);
        } else {
            self.slots.push(Some(slot));
            self.generations.push(generation);
        }
        self.len += 1;
        Ok(id)
    }

    /// Remove a feature, returning it. Stale identifiers return `None`.
    pub fn remove(&mut self, id: FeatureId) -> Option<Feature<D>> {
        if !self.is_alive(id) {
            return None;
        }
        let slot = self.slots[id.idx()].take()?;
        let removed = self.index.remove(&slot.entry);
        debug_assert!(removed, "live feature missing from the index");
        if id.generation() < u32::MAX {
            self.free_list.push(id.idx());
        } else {
            log::debug!("slot {} retired: generations exhausted", id.idx());
        }
        self.len -= 1;
        Some(slot.feature)
    }

    /// Replace a feature's geometry and re-index it.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleFeature`] if `id` is not alive, and [`LayerError::Index`] if the
    /// new geometry is not within the [extent](Layer::extent). On error the feature keeps
    /// its previous geometry.
    pub fn set_geometry(&mut self, id: FeatureId, geometry: Geometry) -> Result<(), LayerError> {
        let space = self.index.indexed_space();
        let slot = self
            .slot_mut(id)
            .ok_or(LayerError::StaleFeature(id))?;
        let bounds = rect_to_aabb(geometry.bounding_box());
        if !space.contains(&bounds) {
            log::debug!("feature {id:?} keeps its geometry: {bounds:?} leaves {space:?}");
            return Err(IndexError::OutOfBounds { bounds, space }.into());
        }
        let old = slot.entry;
        slot.entry.bounds = bounds;
        slot.feature.geometry = geometry;
        let new = slot.entry;
        let removed = self.index.remove(&old);
        debug_assert!(removed, "live feature missing from the index");
        self.index.insert(new)?;
        Ok(())
    }

    /// Replace a feature's flags.
    ///
    /// # Errors
    ///
    /// [`LayerError::StaleFeature`] if `id` is not alive.
    pub fn set_flags(&mut self, id: FeatureId, flags: FeatureFlags) -> Result<(), LayerError> {
        let slot = self
            .slot_mut(id)
            .ok_or(LayerError::StaleFeature(id))?;
        slot.feature.flags = flags;
        Ok(())
    }

    /// Access a live feature.
    pub fn get(&self, id: FeatureId) -> Option<&Feature<D>> {
        self.slot(id).map(|slot| &slot.feature)
    }

    /// Mutable access to a live feature's user data.
    ///
    /// Geometry and flags change through [`set_geometry`](Layer::set_geometry) and
    /// [`set_flags`](Layer::set_flags) so the index stays in sync.
    pub fn data_mut(&mut self, id: FeatureId) -> Option<&mut D> {
        self.slot_mut(id).map(|slot| &mut slot.feature.data)
    }

    /// Returns true if `id` refers to a live feature.
    ///
    /// See [`FeatureId`] docs for the generational semantics.
    pub fn is_alive(&self, id: FeatureId) -> bool {
        self.slot(id).is_some()
    }

    /// Iterate over live features in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, &Feature<D>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            let slot = slot.as_ref()?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "FeatureId uses 32-bit indices by design."
            )]
            Some((FeatureId::new(i as u32, slot.generation), &slot.feature))
        })
    }

    /// Rebuild the spatial index from every live feature in one bulk build.
    ///
    /// Useful after many incremental edits, or after changing the index parameters
    /// through [`index_params_mut`](Layer::index_params_mut).
    ///
    /// # Errors
    ///
    /// Propagates [`LayerError::Index`]; every live feature already lies within the
    /// extent, so this only fails if the index rejects its own previous contents.
    pub fn rebuild(&mut self) -> Result<(), LayerError> {
        let entries: Vec<IndexedFeature> = self
            .slots
            .iter()
            .flatten()
            .map(|slot| slot.entry)
            .collect();
        log::debug!("rebuilding layer index from {} features", entries.len());
        self.index.build(entries)?;
        Ok(())
    }

    /// Mutable access to the index parameters.
    ///
    /// Changes apply to later inserts; call [`rebuild`](Layer::rebuild) to apply them to
    /// existing features.
    pub fn index_params_mut(&mut self) -> &mut geomap_index::TreeParams<f64> {
        self.index.params_mut()
    }

    /// Features sharing at least one point with `rect`, in ascending id order.
    pub fn features_in_rect(&self, rect: Rect, filter: QueryFilter) -> Vec<FeatureId> {
        self.collect_hits(rect, filter, |geometry| geometry.intersects_rect(rect))
    }

    /// Features lying on `pt` or within `tolerance` of it, in ascending id order.
    pub fn features_at_point(
        &self,
        pt: Point,
        tolerance: f64,
        filter: QueryFilter,
    ) -> Vec<FeatureId> {
        let tolerance = tolerance.max(0.0);
        let probe = Rect::from_center_size(pt, (2.0 * tolerance, 2.0 * tolerance));
        self.collect_hits(probe, filter, |geometry| {
            geometry.hit_by_point(pt, tolerance)
        })
    }

    // --- internals ---

    fn collect_hits(
        &self,
        probe: Rect,
        filter: QueryFilter,
        mut exact: impl FnMut(&Geometry) -> bool,
    ) -> Vec<FeatureId> {
        let mut hits = Vec::new();
        self.index.visit_rect(rect_to_aabb(probe), |entry| {
            let Some(feature) = self.get(entry.id) else {
                return;
            };
            if filter.accepts(feature.flags) && exact(&feature.geometry) {
                hits.push(entry.id);
            }
        });
        hits.sort_unstable();
        hits
    }

    fn slot(&self, id: FeatureId) -> Option<&Slot<D>> {
        self.slots
            .get(id.idx())?
            .as_ref()
            .filter(|slot| slot.generation == id.generation())
    }

    fn slot_mut(&mut self, id: FeatureId) -> Option<&mut Slot<D>> {
        self.slots
            .get_mut(id.idx())?
            .as_mut()
            .filter(|slot| slot.generation == id.generation())
    }
}
