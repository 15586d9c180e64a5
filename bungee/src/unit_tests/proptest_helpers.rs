// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::algo::bundles::find_balanced_bundle;
use crate::algo::reduce::reduce;
use crate::algo::scc::strongly_connected_components;
use crate::bundle::BundleArena;
use crate::decomposition::{DecompIx, DecompKind, DecompositionTree};
use crate::graph::BidirectedGraph;
use crate::handle::{Handle, NodeId};
use proptest::prelude::*;
use std::collections::BTreeSet;

const MAX_NODES: NodeId = 10;

// A random bidirected graph: a node count plus arbitrary side-to-side
// connections (self-loops and self-inversions included).
fn arb_graph() -> impl Strategy<Value = BidirectedGraph> {
    (1..=MAX_NODES).prop_flat_map(|nodes| {
        proptest::collection::vec(
            (1..=nodes, any::<bool>(), 1..=nodes, any::<bool>()),
            0..40,
        )
        .prop_map(move |edges| {
            let mut graph = BidirectedGraph::new();
            for nid in 1..=nodes {
                graph.add_vertex(nid);
            }
            for (id1, from_left, id2, to_right) in edges {
                graph
                    .add_edge(id1, id2, from_left, to_right)
                    .expect("edges refer to added vertices");
            }
            graph
        })
    })
}

fn arb_handle() -> impl Strategy<Value = Handle> {
    ((1..=MAX_NODES), any::<bool>()).prop_map(|(nid, rev)| Handle::new(nid, rev))
}

proptest! {
    #[test]
    fn proptest_flip_involution(handle in arb_handle()) {
        prop_assert_eq!(handle.flip().flip(), handle);
        prop_assert_eq!(handle.flip().id(), handle.id());
        prop_assert_ne!(handle.flip().is_reverse(), handle.is_reverse());
    }

    #[test]
    fn proptest_edges_visible_from_both_endpoints(graph in arb_graph()) {
        for edge in graph.edges() {
            let (a, b) = (edge.left(), edge.right());
            prop_assert!(
                graph.follow_edges(a, false).any(|h| h == b),
                "edge {} invisible from its left handle", edge
            );
            prop_assert!(
                graph.follow_edges(b.flip(), false).any(|h| h == a.flip()),
                "edge {} invisible from its flipped right handle", edge
            );
        }
    }

    #[test]
    fn proptest_found_bundles_are_balanced(
        graph in arb_graph(),
        seed in arb_handle(),
    ) {
        if !graph.has_node(seed.id()) {
            return Ok(());
        }
        let mut arena = BundleArena::new();
        if let Some(bundle) = find_balanced_bundle(&graph, seed, &mut arena) {
            let left: BTreeSet<Handle> = bundle.left().iter().collect();
            let right: BTreeSet<Handle> = bundle.right().iter().collect();
            for &l in bundle.left().members() {
                let seen: BTreeSet<Handle> = graph.follow_edges(l, false).collect();
                prop_assert_eq!(&seen, &right, "left member {} disagrees", l);
            }
            for &r in bundle.right().members() {
                let seen: BTreeSet<Handle> = graph.follow_edges(r, true).collect();
                prop_assert_eq!(&seen, &left, "right member {} disagrees", r);
            }
        }
    }

    #[test]
    fn proptest_sccs_partition_the_nodes(graph in arb_graph()) {
        let components = strongly_connected_components(&graph);
        let mut seen: BTreeSet<NodeId> = BTreeSet::new();
        for component in &components {
            prop_assert!(!component.is_empty());
            for &nid in component {
                prop_assert!(seen.insert(nid), "node {} claimed twice", nid);
            }
        }
        let all: BTreeSet<NodeId> = graph.node_ids().collect();
        prop_assert_eq!(seen, all);
    }

    #[test]
    fn proptest_reduction_keeps_the_index_coherent(graph in arb_graph()) {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();
        let reduction = reduce(graph).expect("reduction runs to a fixed point");
        // Rewrites only ever shrink the graph.
        prop_assert!(reduction.graph.node_count() + reduction.graph.edge_count()
            <= node_count + edge_count);
        reduction.graph.verify().expect("reduced graph is well formed");
        // Every survivor carries a decomposition record.
        for nid in reduction.graph.node_ids() {
            prop_assert!(reduction.roots.contains_key(&nid));
        }
    }
}

// Random decomposition trees for the reversal involution.
#[derive(Clone, Debug)]
enum TreeShape {
    Leaf(NodeId),
    Epsilon(NodeId),
    Chain(Vec<TreeShape>),
    Split(Vec<TreeShape>),
}

fn arb_tree_shape() -> impl Strategy<Value = TreeShape> {
    let leaf = prop_oneof![
        (1..50u64).prop_map(TreeShape::Leaf),
        (1..50u64).prop_map(TreeShape::Epsilon),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 2..4).prop_map(TreeShape::Chain),
            proptest::collection::vec(inner, 2..4).prop_map(TreeShape::Split),
        ]
    })
}

fn materialize(tree: &mut DecompositionTree, shape: &TreeShape) -> DecompIx {
    match shape {
        TreeShape::Leaf(nid) => tree.make_source(*nid),
        TreeShape::Epsilon(nid) => tree.make_epsilon(*nid),
        TreeShape::Chain(children) => {
            let chain = {
                let first = materialize(tree, &children[0]);
                let second = materialize(tree, &children[1]);
                tree.make_chain(99, first, second)
            };
            for shape in &children[2..] {
                let child = materialize(tree, shape);
                tree.push_back(chain, child);
            }
            chain
        }
        TreeShape::Split(children) => {
            let built: Vec<DecompIx> = children
                .iter()
                .map(|child| materialize(tree, child))
                .collect();
            tree.make_split(99, built)
        }
    }
}

fn structure(tree: &DecompositionTree, ix: DecompIx, out: &mut Vec<(NodeId, u8, bool)>) {
    let node = tree.node(ix);
    match node.kind() {
        DecompKind::Source => out.push((node.nid, 0, node.is_reverse)),
        DecompKind::Epsilon => out.push((node.nid, 1, node.is_reverse)),
        DecompKind::Chain { .. } => {
            out.push((node.nid, 2, node.is_reverse));
            for child in tree.chain_children(ix) {
                structure(tree, child, out);
            }
        }
        DecompKind::Split { .. } => {
            out.push((node.nid, 3, node.is_reverse));
            for &child in tree.split_children(ix) {
                structure(tree, child, out);
            }
        }
    }
}

proptest! {
    #[test]
    fn proptest_reverse_involution(shape in arb_tree_shape()) {
        let mut tree = DecompositionTree::new();
        let root = materialize(&mut tree, &shape);
        let mut before = Vec::new();
        structure(&tree, root, &mut before);
        tree.reverse(root);
        tree.reverse(root);
        let mut after = Vec::new();
        structure(&tree, root, &mut after);
        prop_assert_eq!(before, after);
    }
}
