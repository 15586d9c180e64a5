// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::fixtures::{build, directed_cycle, email_graph};
use crate::algo::scc::{condense, strongly_connected_components};
use crate::handle::{Handle, NodeId};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn sorted_components(graph: &crate::graph::BidirectedGraph) -> Vec<BTreeSet<NodeId>> {
    let mut components = strongly_connected_components(graph);
    components.sort();
    components
}

fn ids(component: &[NodeId]) -> BTreeSet<NodeId> {
    component.iter().copied().collect()
}

#[test]
fn cycle_is_one_component() {
    let graph = directed_cycle();
    let components = sorted_components(&graph);
    assert_eq!(components, vec![ids(&[1, 2, 3])]);
}

#[test]
fn path_is_all_singletons() {
    let graph = build(&[1, 2, 3], &[(1, 2, false, false), (2, 3, false, false)]);
    let components = sorted_components(&graph);
    assert_eq!(components, vec![ids(&[1]), ids(&[2]), ids(&[3])]);
}

#[test]
fn components_partition_the_node_set() {
    let graph = email_graph();
    let components = strongly_connected_components(&graph);
    let mut seen: BTreeSet<NodeId> = BTreeSet::new();
    for component in &components {
        for &nid in component {
            assert!(seen.insert(nid), "node {} appeared twice", nid);
        }
    }
    let all: BTreeSet<NodeId> = graph.node_ids().collect();
    assert_eq!(seen, all);
}

#[test]
fn orientation_duplicates_are_dropped() {
    // Both orientations of a cycle search as separate components over the
    // same ids; only one survives.
    let graph = directed_cycle();
    let components = strongly_connected_components(&graph);
    assert_eq!(components.len(), 1);
}

#[test]
fn cycle_with_tail_condenses_to_two_nodes() {
    let mut graph = directed_cycle();
    graph.add_vertex(4);
    graph.add_edge(3, 4, false, false).unwrap();
    let components = strongly_connected_components(&graph);
    let condensed = condense(&graph, &components).unwrap();
    assert_eq!(condensed.node_count(), 2);
    assert!(condensed.has_node(1), "components carry their smallest id");
    assert!(condensed.has_node(4));
    assert!(condensed.has_edge(Handle::forward(1), Handle::forward(4)));
    // The cycle's internal edges are gone.
    assert_eq!(condensed.edge_count(), 1);
}

#[test]
fn empty_graph_has_no_components() {
    let graph = build(&[], &[]);
    assert!(strongly_connected_components(&graph).is_empty());
}

#[test]
fn two_independent_cycles() {
    let graph = build(
        &[1, 2, 10, 11],
        &[
            (1, 2, false, false),
            (2, 1, false, false),
            (10, 11, false, false),
            (11, 10, false, false),
        ],
    );
    let components = sorted_components(&graph);
    assert_eq!(components, vec![ids(&[1, 2]), ids(&[10, 11])]);
}
