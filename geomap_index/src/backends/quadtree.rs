// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadrant tree generic over scalar `T: Scalar`.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::IndexError;
use crate::index::{SpatialIndex, check_bounds, checked_batch};
use crate::indexable::Indexable;
use crate::params::{TreeParams, TreeStats};
use crate::types::{Aabb2D, Scalar, area, le};

/// Quadrant tree.
///
/// The root cell is the square of side `max(width, height)` centered on the indexed
/// space, unioned with the indexed space itself. Each node splits its cell at its
/// center into four quadrants. Leaves hold up to
/// [`min_object_count`](TreeParams::min_object_count) objects before subdividing;
/// objects that straddle a node's center stay in that node.
///
/// Every node also tracks the tight bounding box of the objects it stores directly,
/// which lets range queries accept or reject a node's own objects wholesale.
///
/// Best suited to many small, uniformly distributed objects.
#[derive(Clone)]
pub struct QuadTree<T: Scalar, O> {
    space: Aabb2D<T>,
    params: TreeParams<T>,
    stats: TreeStats,
    len: usize,
    root: QuadNode<T, O>,
}

/// Cell of the root node for `space`.
///
/// For integer coordinates halving can round, so the union may not be exactly square.
pub(crate) fn root_cell<T: Scalar>(space: &Aabb2D<T>) -> Aabb2D<T> {
    let (cx, cy) = space.center();
    let side = if space.width() < space.height() {
        space.height()
    } else {
        space.width()
    };
    let half = T::mid(T::zero(), side);
    let square = Aabb2D::new(
        T::sub(cx, half),
        T::sub(cy, half),
        T::add(cx, half),
        T::add(cy, half),
    );
    square.union(space)
}

// Quadrant indices: bit 0 set = east of center, bit 1 set = north of center.
const EAST: usize = 0b01;
const NORTH: usize = 0b10;

#[derive(Clone)]
struct QuadNode<T: Scalar, O> {
    cell: Aabb2D<T>,
    center: (T, T),
    depth: usize,
    objects: Vec<O>,
    tight: Option<Aabb2D<T>>,
    subdivided: bool,
    children: [Option<Box<QuadNode<T, O>>>; 4],
}

impl<T: Scalar, O: Indexable<T>> QuadNode<T, O> {
    fn new(cell: Aabb2D<T>, depth: usize) -> Self {
        Self {
            cell,
            center: cell.center(),
            depth,
            objects: Vec::new(),
            tight: None,
            subdivided: false,
            children: [None, None, None, None],
        }
    }

    fn can_subdivide(&self, params: &TreeParams<T>) -> bool {
        self.depth < params.max_depth && area(&self.cell) > params.box_area_threshold
    }

    /// The quadrant wholly containing `bounds`, or `None` if it straddles the center.
    fn quadrant_of(&self, bounds: &Aabb2D<T>) -> Option<usize> {
        let (cx, cy) = self.center;
        let east = if le(bounds.max_x, cx) {
            false
        } else if le(cx, bounds.min_x) {
            true
        } else {
            return None;
        };
        let north = if le(bounds.max_y, cy) {
            false
        } else if le(cy, bounds.min_y) {
            true
        } else {
            return None;
        };
        Some(usize::from(east) * EAST | usize::from(north) * NORTH)
    }

    fn quadrant_cell(&self, quadrant: usize) -> Aabb2D<T> {
        let (cx, cy) = self.center;
        let (min_x, max_x) = if quadrant & EAST == 0 {
            (self.cell.min_x, cx)
        } else {
            (cx, self.cell.max_x)
        };
        let (min_y, max_y) = if quadrant & NORTH == 0 {
            (self.cell.min_y, cy)
        } else {
            (cy, self.cell.max_y)
        };
        Aabb2D::new(min_x, min_y, max_x, max_y)
    }

    fn child_or_insert(&mut self, quadrant: usize, stats: &mut TreeStats) -> &mut Self {
        let cell = self.quadrant_cell(quadrant);
        let depth = self.depth + 1;
        self.children[quadrant].get_or_insert_with(|| {
            stats.materialized(depth);
            Box::new(Self::new(cell, depth))
        })
    }

    /// Store `object` in this node and grow the tight box over it.
    fn force_insert(&mut self, object: O, bounds: &Aabb2D<T>) {
        self.tight = Some(match self.tight {
            Some(tight) => tight.union(bounds),
            None => *bounds,
        });
        self.objects.push(object);
    }

    fn refresh_tight(&mut self) {
        self.tight = self
            .objects
            .iter()
            .map(|o| o.bounds())
            .reduce(|acc, b| acc.union(&b));
    }

    fn insert(
        &mut self,
        object: O,
        bounds: &Aabb2D<T>,
        params: &TreeParams<T>,
        stats: &mut TreeStats,
    ) {
        if self.subdivided {
            match self.quadrant_of(bounds) {
                Some(quadrant) if self.depth < params.max_depth => {
                    self.child_or_insert(quadrant, stats)
                        .insert(object, bounds, params, stats);
                }
                _ => self.force_insert(object, bounds),
            }
            return;
        }
        self.force_insert(object, bounds);
        if self.objects.len() > params.min_object_count && self.can_subdivide(params) {
            self.subdivide(params, stats);
        }
    }

    /// Push every cleanly assignable object down into its quadrant.
    fn subdivide(&mut self, params: &TreeParams<T>, stats: &mut TreeStats) {
        log::trace!(
            "quad node at depth {} subdivides with {} objects",
            self.depth,
            self.objects.len()
        );
        self.subdivided = true;
        let objects = core::mem::take(&mut self.objects);
        self.tight = None;
        for object in objects {
            let bounds = object.bounds();
            match self.quadrant_of(&bounds) {
                Some(quadrant) => {
                    self.child_or_insert(quadrant, stats)
                        .insert(object, &bounds, params, stats);
                }
                None => self.force_insert(object, &bounds),
            }
        }
    }

    fn build(
        cell: Aabb2D<T>,
        depth: usize,
        objects: Vec<O>,
        params: &TreeParams<T>,
        stats: &mut TreeStats,
    ) -> Self {
        let mut node = Self::new(cell, depth);
        if objects.len() <= params.min_object_count || !node.can_subdivide(params) {
            for object in objects {
                let bounds = object.bounds();
                node.force_insert(object, &bounds);
            }
            return node;
        }

        node.subdivided = true;
        let mut groups: [Vec<O>; 4] = [Vec::new(), Vec::new(), Vec::new(), Vec::new()];
        for object in objects {
            let bounds = object.bounds();
            match node.quadrant_of(&bounds) {
                Some(quadrant) => groups[quadrant].push(object),
                None => node.force_insert(object, &bounds),
            }
        }
        for (quadrant, group) in groups.into_iter().enumerate() {
            if group.is_empty() {
                continue;
            }
            stats.materialized(depth + 1);
            let child = Self::build(
                node.quadrant_cell(quadrant),
                depth + 1,
                group,
                params,
                stats,
            );
            node.children[quadrant] = Some(Box::new(child));
        }
        node
    }

    fn remove(&mut self, object: &O, bounds: &Aabb2D<T>) -> bool
    where
        O: PartialEq,
    {
        if let Some(pos) = self.objects.iter().position(|o| o == object) {
            let _ = self.objects.swap_remove(pos);
            if self.tight.is_some_and(|tight| tight.touches_edge(bounds)) {
                self.refresh_tight();
            }
            return true;
        }
        self.children
            .iter_mut()
            .flatten()
            .filter(|child| child.cell.contains(bounds))
            .any(|child| child.remove(object, bounds))
    }

    /// Every stored object under this node except inverted ones, which intersect nothing.
    fn visit_non_empty<'a, F: FnMut(&'a O)>(&'a self, f: &mut F) {
        for o in self.objects.iter().filter(|o| !o.bounds().is_empty()) {
            f(o);
        }
        for child in self.children.iter().flatten() {
            child.visit_non_empty(f);
        }
    }

    fn visit_rect<'a, F: FnMut(&'a O)>(&'a self, rect: &Aabb2D<T>, f: &mut F) {
        if !rect.intersects(&self.cell) {
            return;
        }
        if rect.contains(&self.cell) {
            self.visit_non_empty(f);
            return;
        }
        if let Some(tight) = self.tight {
            if rect.contains(&tight) {
                for o in self.objects.iter().filter(|o| !o.bounds().is_empty()) {
                    f(o);
                }
            } else if rect.intersects(&tight) {
                for o in &self.objects {
                    if o.bounds().intersects(rect) {
                        f(o);
                    }
                }
            }
        }
        for child in self.children.iter().flatten() {
            child.visit_rect(rect, f);
        }
    }

    fn visit_point<'a, F: FnMut(&'a O)>(&'a self, x: T, y: T, f: &mut F) {
        if !self.cell.contains_point(x, y) {
            return;
        }
        if self.tight.is_some_and(|tight| tight.contains_point(x, y)) {
            for o in &self.objects {
                if o.bounds().contains_point(x, y) {
                    f(o);
                }
            }
        }
        for child in self.children.iter().flatten() {
            child.visit_point(x, y, f);
        }
    }
}

impl<T: Scalar, O: Indexable<T>> QuadTree<T, O> {
    /// Create an empty tree over `space` with [`TreeParams::quad_default`].
    pub fn new(space: Aabb2D<T>) -> Self {
        Self::with_params(space, TreeParams::quad_default())
    }

    /// Create an empty tree over `space` with explicit parameters.
    pub fn with_params(space: Aabb2D<T>, params: TreeParams<T>) -> Self {
        Self {
            space,
            params,
            stats: TreeStats::root(),
            len: 0,
            root: QuadNode::new(root_cell(&space), 0),
        }
    }

    /// The root node's cell: a square covering the indexed space.
    pub fn root_cell(&self) -> Aabb2D<T> {
        self.root.cell
    }

    /// Iterate over every stored object, in unspecified order.
    pub fn iter(&self) -> Iter<'_, T, O> {
        Iter {
            stack: vec![&self.root],
            current: core::slice::Iter::default(),
        }
    }
}

impl<T: Scalar, O: Indexable<T>> SpatialIndex<T, O> for QuadTree<T, O> {
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
        self.stats.depth
    }

    fn node_count(&self) -> usize {
        self.stats.node_count
    }

    fn len(&self) -> usize {
        self.len
    }

    fn build<I: IntoIterator<Item = O>>(&mut self, objects: I) -> Result<(), IndexError<T>> {
        let objects = checked_batch(&self.space, objects)?;
        let len = objects.len();
        let mut stats = TreeStats::root();
        self.root = QuadNode::build(self.root.cell, 0, objects, &self.params, &mut stats);
        self.stats = stats;
        self.len = len;
        log::debug!(
            "quad-tree built from {len} objects: {} nodes, depth {}",
            stats.node_count,
            stats.depth
        );
        Ok(())
    }

    fn insert(&mut self, object: O) -> Result<(), IndexError<T>> {
        let bounds = object.bounds();
        check_bounds(&self.space, &bounds)?;
        self.root.insert(object, &bounds, &self.params, &mut self.stats);
        self.len += 1;
        Ok(())
    }

    fn remove(&mut self, object: &O) -> bool
    where
        O: PartialEq,
    {
        let bounds = object.bounds();
        if !self.space.contains(&bounds) {
            return false;
        }
        let removed = self.root.remove(object, &bounds);
        if removed {
            self.len -= 1;
        }
        removed
    }

    fn clear(&mut self) {
        self.root = QuadNode::new(self.root.cell, 0);
        self.stats = TreeStats::root();
        self.len = 0;
    }

    fn visit_rect<'a, F: FnMut(&'a O)>(&'a self, rect: Aabb2D<T>, mut f: F)
    where
        O: 'a,
    {
        self.root.visit_rect(&rect, &mut f);
    }

    fn visit_point<'a, F: FnMut(&'a O)>(&'a self, x: T, y: T, mut f: F)
    where
        O: 'a,
    {
        self.root.visit_point(x, y, &mut f);
    }
}

/// Iterator over every object stored in a [`QuadTree`].
pub struct Iter<'a, T: Scalar, O> {
    stack: Vec<&'a QuadNode<T, O>>,
    current: core::slice::Iter<'a, O>,
}

impl<'a, T: Scalar, O> Iterator for Iter<'a, T, O> {
    type Item = &'a O;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(o) = self.current.next() {
                return Some(o);
            }
            let node = self.stack.pop()?;
            self.stack
                .extend(node.children.iter().flatten().map(|child| &**child));
            self.current = node.objects.iter();
        }
    }
}

impl<T: Scalar, O> Debug for Iter<'_, T, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("pending_nodes", &self.stack.len())
            .field("pending_objects", &self.current.len())
            .finish()
    }
}

impl<T: Scalar, O> Debug for QuadTree<T, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("space", &self.space)
            .field("root_cell", &self.root.cell)
            .field("params", &self.params)
            .field("len", &self.len)
            .field("depth", &self.stats.depth)
            .field("node_count", &self.stats.node_count)
            .finish_non_exhaustive()
    }
}

/// Quadrant tree with f64 coordinates and f64 metrics.
pub type QuadTreeF64<O> = QuadTree<f64, O>;

/// Quadrant tree with f32 coordinates and f64 metrics.
pub type QuadTreeF32<O> = QuadTree<f32, O>;

/// Quadrant tree with i64 coordinates and i128 metrics.
pub type QuadTreeI64<O> = QuadTree<i64, O>;
