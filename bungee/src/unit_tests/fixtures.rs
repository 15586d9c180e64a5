// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::graph::BidirectedGraph;
use crate::handle::{Handle, NodeId};
use once_cell::sync::Lazy;

/// Builds a graph from node ids and `(id1, id2, from_left, to_right)` edges.
pub(crate) fn build(nodes: &[NodeId], edges: &[(NodeId, NodeId, bool, bool)]) -> BidirectedGraph {
    let mut graph = BidirectedGraph::new();
    for &nid in nodes {
        graph.add_vertex(nid);
    }
    for &(id1, id2, from_left, to_right) in edges {
        graph
            .add_edge(id1, id2, from_left, to_right)
            .expect("fixture edges refer to fixture nodes");
    }
    graph
}

/// The neighbors seen from one side of a handle, sorted.
pub(crate) fn follow_sorted(graph: &BidirectedGraph, handle: Handle, go_left: bool) -> Vec<Handle> {
    let mut neighbors: Vec<Handle> = graph.follow_edges(handle, go_left).collect();
    neighbors.sort_unstable();
    neighbors
}

/// Two nodes joined right-to-left: the smallest possible bundle.
pub(crate) fn trivial_pair() -> BidirectedGraph {
    build(&[1, 2], &[(1, 2, false, false)])
}

/// Two nodes on the left all connected to two nodes on the right.
pub(crate) fn two_by_two() -> BidirectedGraph {
    build(
        &[1, 2, 3, 4],
        &[
            (1, 3, false, false),
            (1, 4, false, false),
            (2, 3, false, false),
            (2, 4, false, false),
        ],
    )
}

/// Node 3 enters its bundle from the right, so the bundle mixes
/// orientations.
pub(crate) fn reversed_member() -> BidirectedGraph {
    build(&[1, 2, 3], &[(1, 2, false, false), (1, 3, false, true)])
}

/// A near-miss: node 3 hangs off both 1 and 2, so no seed balances.
pub(crate) fn near_bundle() -> BidirectedGraph {
    build(
        &[1, 2, 3],
        &[(1, 2, false, false), (2, 3, false, false), (1, 3, false, false)],
    )
}

/// Three nodes forming one directed cycle through their forward strands.
pub(crate) fn directed_cycle() -> BidirectedGraph {
    build(
        &[1, 2, 3],
        &[(1, 2, false, false), (2, 3, false, false), (3, 1, false, false)],
    )
}

/// The reduction walk-through graph: a tip on node 2, parallel paths from
/// `{2, 3}` to `{5, 6}`, funneled by 1 and 7.
///
/// Kept as a JSON document so the loader is exercised along the way.
pub(crate) static EMAIL_GRAPH_JSON: &str = r#"{
    "nodes": [
        {"id": 1}, {"id": 2}, {"id": 3}, {"id": 4},
        {"id": 5}, {"id": 6}, {"id": 7}
    ],
    "edges": [
        {"id1": 1, "id2": 2},
        {"id1": 1, "id2": 3},
        {"id1": 2, "id2": 4},
        {"id1": 2, "id2": 5},
        {"id1": 2, "id2": 6},
        {"id1": 3, "id2": 5},
        {"id1": 3, "id2": 6},
        {"id1": 5, "id2": 7},
        {"id1": 6, "id2": 7}
    ]
}"#;

static EMAIL_GRAPH: Lazy<BidirectedGraph> =
    Lazy::new(|| BidirectedGraph::from_json(EMAIL_GRAPH_JSON).expect("fixture JSON parses"));

pub(crate) fn email_graph() -> BidirectedGraph {
    EMAIL_GRAPH.clone()
}
