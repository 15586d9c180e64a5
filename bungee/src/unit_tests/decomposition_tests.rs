// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::decomposition::{DecompIx, DecompKind, DecompositionTree};
use pretty_assertions::assert_eq;

// Flattens a subtree into (nid, kind tag, is_reverse) tuples, chains in
// order, for structural comparisons.
fn snapshot(tree: &DecompositionTree, ix: DecompIx, out: &mut Vec<(u64, &'static str, bool)>) {
    let node = tree.node(ix);
    match node.kind() {
        DecompKind::Source => out.push((node.nid, "source", node.is_reverse)),
        DecompKind::Epsilon => out.push((node.nid, "epsilon", node.is_reverse)),
        DecompKind::Chain { .. } => {
            out.push((node.nid, "chain", node.is_reverse));
            for child in tree.chain_children(ix) {
                snapshot(tree, child, out);
            }
        }
        DecompKind::Split { .. } => {
            out.push((node.nid, "split", node.is_reverse));
            let mut children: Vec<DecompIx> = tree.split_children(ix).to_vec();
            children.sort_unstable();
            for child in children {
                snapshot(tree, child, out);
            }
        }
    }
}

fn snapshot_vec(tree: &DecompositionTree, ix: DecompIx) -> Vec<(u64, &'static str, bool)> {
    let mut out = Vec::new();
    snapshot(tree, ix, &mut out);
    out
}

#[test]
fn chain_construction_orders_children() {
    let mut tree = DecompositionTree::new();
    let s1 = tree.make_source(1);
    let s2 = tree.make_source(2);
    let chain = tree.make_chain(10, s1, s2);
    assert_eq!(
        tree.chain_children(chain).collect::<Vec<_>>(),
        vec![s1, s2]
    );
    assert_eq!(tree.node(s1).parent(), Some(chain));
    assert_eq!(tree.node(s1).sibling(), Some(s2));
    assert_eq!(tree.node(s2).sibling(), None);
}

#[test]
fn chain_arguments_splice_flat() {
    let mut tree = DecompositionTree::new();
    let s1 = tree.make_source(1);
    let s2 = tree.make_source(2);
    let s3 = tree.make_source(3);
    let inner = tree.make_chain(10, s1, s2);
    let outer = tree.make_chain(11, inner, s3);
    // The inner chain donated its children and its shell was released.
    assert_eq!(
        tree.chain_children(outer).collect::<Vec<_>>(),
        vec![s1, s2, s3]
    );
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.node(s2).parent(), Some(outer));
}

#[test]
fn released_shells_are_reused() {
    let mut tree = DecompositionTree::new();
    let s1 = tree.make_source(1);
    let s2 = tree.make_source(2);
    let inner = tree.make_chain(10, s1, s2);
    let s3 = tree.make_source(3);
    let _outer = tree.make_chain(11, inner, s3);
    let len_before = tree.len();
    // A fresh allocation slots into the released shell.
    let _s4 = tree.make_source(4);
    assert_eq!(tree.len(), len_before + 1);
}

#[test]
fn push_front_and_push_back() {
    let mut tree = DecompositionTree::new();
    let chain = {
        let s1 = tree.make_source(1);
        let s2 = tree.make_source(2);
        tree.make_chain(10, s1, s2)
    };
    let front = tree.make_source(0);
    let back = tree.make_source(3);
    tree.push_front(chain, front);
    tree.push_back(chain, back);
    let nids: Vec<u64> = tree
        .chain_children(chain)
        .map(|ix| tree.node(ix).nid)
        .collect();
    assert_eq!(nids, vec![0, 1, 2, 3]);
}

#[test]
fn reverse_reverses_chain_order_and_children() {
    let mut tree = DecompositionTree::new();
    let s1 = tree.make_source(1);
    let s2 = tree.make_source(2);
    let chain = tree.make_chain(10, s1, s2);
    tree.reverse(chain);
    assert_eq!(
        snapshot_vec(&tree, chain),
        vec![(10, "chain", true), (2, "source", true), (1, "source", true)]
    );
}

#[test]
fn reverse_is_an_involution() {
    let mut tree = DecompositionTree::new();
    let s1 = tree.make_source(1);
    let s2 = tree.make_source(2);
    let s3 = tree.make_source(3);
    let s4 = tree.make_source(4);
    let split = tree.make_split(20, vec![s2, s3]);
    let eps = tree.make_epsilon(5);
    let chain = tree.make_chain(10, s1, s4);
    tree.push_back(chain, split);
    tree.push_back(chain, eps);
    let before = snapshot_vec(&tree, chain);
    tree.reverse(chain);
    tree.reverse(chain);
    assert_eq!(snapshot_vec(&tree, chain), before);
}

#[test]
fn reverse_of_leaves_only_toggles_orientation() {
    let mut tree = DecompositionTree::new();
    let source = tree.make_source(1);
    let epsilon = tree.make_epsilon(2);
    tree.reverse(source);
    tree.reverse(epsilon);
    assert!(tree.node(source).is_reverse);
    assert!(tree.node(epsilon).is_reverse);
}

#[test]
fn self_relation_flags_survive_reversal() {
    let mut tree = DecompositionTree::new();
    let s1 = tree.make_source(1);
    let s2 = tree.make_source(2);
    let split = tree.make_split(20, vec![s1, s2]);
    tree.set_self_cycle(split);
    tree.set_self_inversion(split, true);
    tree.reverse(split);
    assert!(tree.node(split).scycle);
    assert_eq!(tree.node(split).sinv, [false, true]);
}

#[test]
fn find_lca() {
    let mut tree = DecompositionTree::new();
    let s1 = tree.make_source(1);
    let s2 = tree.make_source(2);
    let s3 = tree.make_source(3);
    let split = tree.make_split(20, vec![s1, s2]);
    let chain = tree.make_chain(10, split, s3);
    assert_eq!(tree.find_lca(s1, s2), Some(split));
    assert_eq!(tree.find_lca(s1, s3), Some(chain));
    assert_eq!(tree.find_lca(s1, s1), Some(s1));
    let stranger = tree.make_source(9);
    assert_eq!(tree.find_lca(s1, stranger), None);
}
