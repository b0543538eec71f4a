// Copyright 2025 the Geomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index implementations for different spatial strategies.
//!
//! - `kdtree`: binary split tree (aliases: `KdTreeF32`, `KdTreeF64`, `KdTreeI64`).
//! - `quadtree`: quadrant tree (aliases: `QuadTreeF32`, `QuadTreeF64`, `QuadTreeI64`).
//! - `flatvec`: flat vector with linear scans (small, simple, and the reference for tests).
//!
//! Split-cost note
//! ---------------
//! The binary split tree's bulk builder evaluates [`kdtree::SPLIT_GRID`]` - 1` evenly
//! spaced lines per axis and keeps the one minimizing:
//!
//! `cost = area(H0) * n0 + area(H1) * n1`
//!
//! where `H0` and `H1` are the two halves of the node's cell and `n0`/`n1` count the
//! objects wholly contained in each. Objects straddling the line count toward neither
//! half and stay in the node.
//! Accumulators are widened (`f32`→`f64`, `f64`→`f64`, `i64`→`i128`) for robust comparisons.
//!
//! The quadrant tree always splits at the cell center and needs no cost model.

pub mod flatvec;
pub mod kdtree;
pub mod quadtree;
