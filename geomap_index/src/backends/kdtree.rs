// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary axis-split tree generic over scalar `T: Scalar`.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::IndexError;
use crate::index::{SpatialIndex, check_bounds, checked_batch};
use crate::indexable::Indexable;
use crate::params::{TreeParams, TreeStats};
use crate::types::{Aabb2D, Scalar, area};

/// Number of grid divisions per axis evaluated by the bulk builder.
///
/// The interior lines `min + extent * i / SPLIT_GRID` for `i in 1..SPLIT_GRID` are tried
/// on both axes.
pub const SPLIT_GRID: u32 = 6;

/// Binary split tree.
///
/// Each node owns a fixed cell. Incremental inserts split a node lazily by bisecting
/// its longer dimension (falling back to the other axis when the object straddles);
/// [`build`](SpatialIndex::build) instead picks, per node, the grid line minimizing
/// `area(half0) * n0 + area(half1) * n1`, where `n0`/`n1` count objects wholly inside
/// each half. Objects that straddle the split stay in the node.
///
/// Once a node has fixed its split, the axis and position never change.
#[derive(Clone)]
pub struct KdTree<T: Scalar, O> {
    space: Aabb2D<T>,
    params: TreeParams<T>,
    stats: TreeStats,
    len: usize,
    root: KdNode<T, O>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    fn longer<T: Scalar>(cell: &Aabb2D<T>) -> Self {
        if cell.height() > cell.width() {
            Self::Y
        } else {
            Self::X
        }
    }

    fn range<T: Copy>(self, cell: &Aabb2D<T>) -> (T, T) {
        match self {
            Self::X => (cell.min_x, cell.max_x),
            Self::Y => (cell.min_y, cell.max_y),
        }
    }
}

/// A fixed split of a node cell into two halves.
#[derive(Copy, Clone, Debug)]
struct Split<T> {
    axis: Axis,
    cells: [Aabb2D<T>; 2],
}

impl<T: Scalar> Split<T> {
    fn at(cell: &Aabb2D<T>, axis: Axis, at: T) -> Self {
        let cells = match axis {
            Axis::X => [
                Aabb2D::new(cell.min_x, cell.min_y, at, cell.max_y),
                Aabb2D::new(at, cell.min_y, cell.max_x, cell.max_y),
            ],
            Axis::Y => [
                Aabb2D::new(cell.min_x, cell.min_y, cell.max_x, at),
                Aabb2D::new(cell.min_x, at, cell.max_x, cell.max_y),
            ],
        };
        Self { axis, cells }
    }

    fn bisect(cell: &Aabb2D<T>, axis: Axis) -> Self {
        let (lo, hi) = axis.range(cell);
        Self::at(cell, axis, T::mid(lo, hi))
    }

    /// The half `bounds` intersects, or `None` when it touches both (or neither).
    fn side_of(&self, bounds: &Aabb2D<T>) -> Option<usize> {
        match (
            self.cells[0].intersects(bounds),
            self.cells[1].intersects(bounds),
        ) {
            (true, false) => Some(0),
            (false, true) => Some(1),
            _ => None,
        }
    }

    /// The half wholly containing `bounds`, preferring half 0.
    fn containing(&self, bounds: &Aabb2D<T>) -> Option<usize> {
        if self.cells[0].contains(bounds) {
            Some(0)
        } else if self.cells[1].contains(bounds) {
            Some(1)
        } else {
            None
        }
    }

    fn cost(&self, bounds: &[Aabb2D<T>]) -> T::Acc {
        let mut counts = [0_usize; 2];
        for b in bounds {
            if let Some(side) = self.containing(b) {
                counts[side] += 1;
            }
        }
        T::acc_add(
            T::acc_mul(area(&self.cells[0]), T::acc_from_usize(counts[0])),
            T::acc_mul(area(&self.cells[1]), T::acc_from_usize(counts[1])),
        )
    }

    /// Cheapest grid line over both axes; ties keep the first candidate (x before y).
    fn cheapest(cell: &Aabb2D<T>, bounds: &[Aabb2D<T>]) -> Option<Self> {
        let mut best: Option<(T::Acc, Self)> = None;
        for axis in [Axis::X, Axis::Y] {
            let (lo, hi) = axis.range(cell);
            for i in 1..SPLIT_GRID {
                let split = Self::at(cell, axis, T::lerp(lo, hi, i, SPLIT_GRID));
                let cost = split.cost(bounds);
                if best.as_ref().map(|(c, _)| cost < *c).unwrap_or(true) {
                    best = Some((cost, split));
                }
            }
        }
        best.map(|(_, split)| split)
    }
}

#[derive(Clone)]
struct KdNode<T: Scalar, O> {
    cell: Aabb2D<T>,
    depth: usize,
    objects: Vec<O>,
    split: Option<Split<T>>,
    children: [Option<Box<KdNode<T, O>>>; 2],
}

impl<T: Scalar, O: Indexable<T>> KdNode<T, O> {
    fn new(cell: Aabb2D<T>, depth: usize) -> Self {
        Self {
            cell,
            depth,
            objects: Vec::new(),
            split: None,
            children: [None, None],
        }
    }

    /// Whether this node must keep everything routed to it.
    fn is_terminal(&self, params: &TreeParams<T>) -> bool {
        self.depth >= params.max_depth || area(&self.cell) <= params.box_area_threshold
    }

    fn child_or_insert(
        &mut self,
        side: usize,
        cell: Aabb2D<T>,
        stats: &mut TreeStats,
    ) -> &mut Self {
        let depth = self.depth + 1;
        self.children[side].get_or_insert_with(|| {
            stats.materialized(depth);
            Box::new(Self::new(cell, depth))
        })
    }

    fn insert(
        &mut self,
        object: O,
        bounds: &Aabb2D<T>,
        params: &TreeParams<T>,
        stats: &mut TreeStats,
    ) {
        if self.is_terminal(params) {
            self.objects.push(object);
            return;
        }
        let routed = match self.split {
            Some(split) => split.side_of(bounds).map(|side| (split, side)),
            None => {
                let primary = Split::bisect(&self.cell, Axis::longer(&self.cell));
                let chosen = primary
                    .side_of(bounds)
                    .map(|side| (primary, side))
                    .or_else(|| {
                        let alternate = Split::bisect(&self.cell, primary.axis.other());
                        alternate.side_of(bounds).map(|side| (alternate, side))
                    });
                if let Some((split, _)) = chosen {
                    log::trace!(
                        "kd node at depth {} splits on {:?} axis",
                        self.depth,
                        split.axis
                    );
                    self.split = Some(split);
                }
                chosen
            }
        };
        match routed {
            Some((split, side)) => {
                self.child_or_insert(side, split.cells[side], stats)
                    .insert(object, bounds, params, stats);
            }
            None => self.objects.push(object),
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
        if node.is_terminal(params) || objects.len() <= params.min_object_count {
            node.objects = objects;
            return node;
        }
        let bounds: Vec<Aabb2D<T>> = objects.iter().map(|o| o.bounds()).collect();
        let Some(split) = Split::cheapest(&cell, &bounds) else {
            node.objects = objects;
            return node;
        };

        let mut halves: [Vec<O>; 2] = [Vec::new(), Vec::new()];
        for (object, b) in objects.into_iter().zip(&bounds) {
            match split.containing(b) {
                Some(side) => halves[side].push(object),
                None => node.objects.push(object),
            }
        }
        if halves.iter().all(Vec::is_empty) {
            return node;
        }

        node.split = Some(split);
        for (side, group) in halves.into_iter().enumerate() {
            if group.is_empty() {
                continue;
            }
            stats.materialized(depth + 1);
            node.children[side] = Some(Box::new(Self::build(
                split.cells[side],
                depth + 1,
                group,
                params,
                stats,
            )));
        }
        node
    }

    fn remove(&mut self, object: &O, bounds: &Aabb2D<T>) -> bool
    where
        O: PartialEq,
    {
        if let Some(pos) = self.objects.iter().position(|o| o == object) {
            let _ = self.objects.swap_remove(pos);
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
        for o in &self.objects {
            if o.bounds().intersects(rect) {
                f(o);
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
        for o in &self.objects {
            if o.bounds().contains_point(x, y) {
                f(o);
            }
        }
        for child in self.children.iter().flatten() {
            child.visit_point(x, y, f);
        }
    }
}

impl<T: Scalar, O: Indexable<T>> KdTree<T, O> {
    /// Create an empty tree over `space` with [`TreeParams::kd_default`].
    pub fn new(space: Aabb2D<T>) -> Self {
        Self::with_params(space, TreeParams::kd_default())
    }

    /// Create an empty tree over `space` with explicit parameters.
    pub fn with_params(space: Aabb2D<T>, params: TreeParams<T>) -> Self {
        Self {
            space,
            params,
            stats: TreeStats::root(),
            len: 0,
            root: KdNode::new(space, 0),
        }
    }

    /// Iterate over every stored object, in unspecified order.
    pub fn iter(&self) -> Iter<'_, T, O> {
        Iter {
            stack: vec![&self.root],
            current: core::slice::Iter::default(),
        }
    }
}

impl<T: Scalar, O: Indexable<T>> SpatialIndex<T, O> for KdTree<T, O> {
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
        self.root = KdNode::build(self.space, 0, objects, &self.params, &mut stats);
        self.stats = stats;
        self.len = len;
        log::debug!(
            "kd-tree built from {len} objects: {} nodes, depth {}",
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
        self.root = KdNode::new(self.space, 0);
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

/// Iterator over every object stored in a [`KdTree`].
pub struct Iter<'a, T: Scalar, O> {
    stack: Vec<&'a KdNode<T, O>>,
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

impl<T: Scalar, O> Debug for KdTree<T, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KdTree")
            .field("space", &self.space)
            .field("params", &self.params)
            .field("len", &self.len)
            .field("depth", &self.stats.depth)
            .field("node_count", &self.stats.node_count)
            .finish_non_exhaustive()
    }
}

/// Binary split tree with f64 coordinates and f64 metrics.
pub type KdTreeF64<O> = KdTree<f64, O>;

/// Binary split tree with f32 coordinates and f64 metrics.
pub type KdTreeF32<O> = KdTree<f32, O>;

/// Binary split tree with i64 coordinates and i128 metrics.
pub type KdTreeI64<O> = KdTree<i64, O>;
