// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reachability over the tips of a bidirected graph.
//!
//! Reduction preserves which tips can reach which other parts of the graph,
//! so this module provides the reference answer: the tip handles themselves
//! and a breadth-first sweep of everything readable onward from each.

use crate::graph::BidirectedGraph;
use crate::handle::Handle;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// The tip handles of a graph: orientations that read into the graph with
/// nothing behind them.
pub fn tips(graph: &BidirectedGraph) -> Vec<Handle> {
    let mut out = Vec::new();
    for nid in graph.node_ids() {
        for handle in [Handle::forward(nid), Handle::reverse(nid)] {
            if graph.get_degree(handle, true) == 0 && graph.get_degree(handle, false) > 0 {
                out.push(handle);
            }
        }
    }
    out
}

/// The set of handles reachable reading rightward from `start`.
///
/// `start` itself is included only if some cycle leads back onto it.
pub fn reachable_rightward(graph: &BidirectedGraph, start: Handle) -> BTreeSet<Handle> {
    let mut visited = BTreeSet::new();
    let mut queue: VecDeque<Handle> = graph.follow_edges(start, false).collect();
    while let Some(handle) = queue.pop_front() {
        if !visited.insert(handle) {
            continue;
        }
        for next in graph.follow_edges(handle, false) {
            if !visited.contains(&next) {
                queue.push_back(next);
            }
        }
    }
    visited
}

/// For every tip of the graph, the handles it can reach reading rightward.
pub fn tip_reachability(graph: &BidirectedGraph) -> BTreeMap<Handle, BTreeSet<Handle>> {
    tips(graph)
        .into_iter()
        .map(|tip| (tip, reachable_rightward(graph, tip)))
        .collect()
}
