// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strongly connected components of a bidirected graph.
//!
//! This is Tarjan's algorithm, recursion-free, generalized to bidirected
//! graphs: every handle is a vertex of the search graph and a directed edge
//! `h -> h'` exists when `h'` is a right-neighbor of `h`. Both orientations
//! of a node double the search space, so after the search each component of
//! handles collapses to a set of node ids and the mirror-image duplicate
//! that the doubling produces is dropped.

use crate::errors::Error;
use crate::graph::BidirectedGraph;
use crate::handle::{Handle, NodeId};
use std::collections::{BTreeSet, HashMap, HashSet};

enum Visit {
    Discover(Handle),
    Finish(Handle),
}

/// Computes the strongly connected components of a bidirected graph.
///
/// Every node id appears in exactly one returned set and the union of all
/// sets is the node set of the graph. The order of the returned sets is
/// unspecified.
pub fn strongly_connected_components(graph: &BidirectedGraph) -> Vec<BTreeSet<NodeId>> {
    let mut next_index: u64 = 0;
    // The search root each handle was reached from.
    let mut roots: HashMap<Handle, Handle> = HashMap::new();
    // The visit step at which each handle was discovered.
    let mut discovered: HashMap<Handle, u64> = HashMap::new();
    // Explicit DFS stack of handles, and membership for it.
    let mut stack: Vec<Handle> = Vec::new();
    let mut on_stack: HashSet<Handle> = HashSet::new();
    // One node id per emitted component, used to drop the orientation
    // duplicates.
    let mut claimed: HashSet<NodeId> = HashSet::new();
    let mut components: Vec<BTreeSet<NodeId>> = Vec::new();

    let seeds: Vec<Handle> = graph
        .node_ids()
        .flat_map(|nid| [Handle::forward(nid), Handle::reverse(nid)])
        .collect();

    for seed in seeds {
        if discovered.contains_key(&seed) {
            continue;
        }
        let mut events = vec![Visit::Discover(seed)];
        while let Some(event) = events.pop() {
            match event {
                Visit::Discover(handle) => {
                    if discovered.contains_key(&handle) {
                        continue;
                    }
                    discovered.insert(handle, next_index);
                    next_index += 1;
                    roots.insert(handle, handle);
                    stack.push(handle);
                    on_stack.insert(handle);
                    // The finish event fires only after everything this
                    // discovery causes has finished.
                    events.push(Visit::Finish(handle));
                    for next in graph.follow_edges(handle, false) {
                        if !discovered.contains_key(&next) {
                            events.push(Visit::Discover(next));
                        }
                    }
                }
                Visit::Finish(handle) => {
                    for next in graph.follow_edges(handle, false) {
                        if on_stack.contains(&next) {
                            // Adopt whichever root was discovered first.
                            let handle_root = roots[&handle];
                            let next_root = roots[&next];
                            let earlier = if discovered[&handle_root] <= discovered[&next_root] {
                                handle_root
                            } else {
                                next_root
                            };
                            roots.insert(handle, earlier);
                        }
                    }
                    if roots[&handle] == handle {
                        let mut component = BTreeSet::new();
                        loop {
                            let other = stack.pop().expect("DFS stack underflow");
                            on_stack.remove(&other);
                            component.insert(other.id());
                            if other == handle {
                                break;
                            }
                        }
                        if component.iter().all(|nid| !claimed.contains(nid)) {
                            let sentinel = *component.iter().next().expect("empty component");
                            claimed.insert(sentinel);
                            components.push(component);
                        }
                    }
                }
            }
        }
    }

    components
}

/// Condenses a graph onto its strongly connected components.
///
/// Each component becomes a single node carrying the smallest member id;
/// edges between distinct components survive with their sides preserved,
/// edges inside a component are dropped. The components must cover the
/// graph, as [`strongly_connected_components`] guarantees.
pub fn condense(
    graph: &BidirectedGraph,
    components: &[BTreeSet<NodeId>],
) -> Result<BidirectedGraph, Error> {
    let mut representative: HashMap<NodeId, NodeId> = HashMap::new();
    let mut condensed = BidirectedGraph::new();
    for component in components {
        let rep = *component.iter().next().expect("empty component");
        condensed.add_vertex(rep);
        for &nid in component {
            representative.insert(nid, rep);
        }
    }
    for edge in graph.edges() {
        let (a, b) = (edge.left(), edge.right());
        let ra = representative[&a.id()];
        let rb = representative[&b.id()];
        if ra == rb {
            continue;
        }
        condensed.create_edge(Handle::new(ra, a.is_reverse()), Handle::new(rb, b.is_reverse()))?;
    }
    Ok(condensed)
}
