// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Balanced-bundle decomposition of bidirected variation graphs.
//!
//! `bungee` models double-stranded sequence graphs, where an edge attaches
//! to a *side* of each endpoint, and discovers their balanced bundles: pairs
//! of handle sets `(L, R)` in which every member of `L` sees exactly `R` on
//! its right and every member of `R` sees exactly `L` on its left. A
//! reduction engine collapses bundles and degree-one appendages until the
//! graph is irreducible, recording the rewrite history as a decomposition
//! tree whose leaves are the nodes of the input graph.
//!
//! # Examples
//!
//! Enumerate the bundles of a two-node graph:
//!
//! ```
//! use bungee::algo::bundles::find_all_bundles;
//! use bungee::{BidirectedGraph, BundleArena, Handle};
//!
//! let mut graph = BidirectedGraph::new();
//! graph.add_vertex(1);
//! graph.add_vertex(2);
//! // Connect the right side of node 1 to the left side of node 2.
//! graph.add_edge(1, 2, false, false)?;
//!
//! let mut arena = BundleArena::new();
//! let bundles = find_all_bundles(&graph, &mut arena);
//! assert_eq!(bundles.len(), 1);
//! assert!(bundles[0].is_trivial());
//! assert_eq!(bundles[0].left().members(), [Handle::forward(1)]);
//! assert_eq!(bundles[0].right().members(), [Handle::forward(2)]);
//! # Ok::<(), bungee::Error>(())
//! ```

#![warn(missing_docs)]

pub mod algo;
pub mod bundle;
pub mod decomposition;
pub mod errors;
pub mod graph;
mod handle;
pub(crate) mod sorted_set;
#[cfg(test)]
mod unit_tests;

pub use bundle::{Adjacency, Bundle, BundleArena, BundleSide};
pub use errors::Error;
pub use graph::BidirectedGraph;
pub use handle::{Edge, Handle, NodeId};
