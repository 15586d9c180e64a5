// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reduction engine.
//!
//! A [`Reducer`] owns a mutable graph, a bundle index, and a decomposition
//! tree, and rewrites the graph to a fixed point with two rules: collapsing
//! a balanced bundle onto a fresh pair of nodes, and eliminating a
//! degree-one tip into its neighbor's chain. Every rewrite strictly shrinks
//! the graph, so the fixed point is always reached.
//!
//! The bundle index maps a handle to the bundle entered when following right
//! from it. Rewrites purge entries of destroyed nodes and re-probe the
//! affected neighborhoods, so the index stays coherent across mutations.

use crate::algo::bundles::{find_all_bundles, find_balanced_bundle};
use crate::bundle::{Adjacency, Bundle, BundleArena, BundleSide};
use crate::decomposition::{DecompIx, DecompositionTree};
use crate::errors::Error;
use crate::graph::BidirectedGraph;
use crate::handle::{Handle, NodeId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Identifier of a bundle held by a [`Reducer`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BundleId(u32);

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct StoredBundle {
    bundle: Bundle,
    // Live index entries pointing at this bundle. The bundle retires when
    // the last one goes away.
    refs: usize,
}

/// The result of running a reduction to its fixed point.
#[derive(Debug)]
pub struct Reduction {
    /// The irreducible graph.
    pub graph: BidirectedGraph,
    /// The arena holding every decomposition record of the run.
    pub tree: DecompositionTree,
    /// The decomposition subtree recorded for each surviving node.
    pub roots: BTreeMap<NodeId, DecompIx>,
}

/// Rewrites a bidirected graph until neither reduction rule applies.
#[derive(Debug)]
pub struct Reducer {
    graph: BidirectedGraph,
    tree: DecompositionTree,
    decomp: HashMap<NodeId, DecompIx>,
    store: BTreeMap<BundleId, StoredBundle>,
    index: HashMap<Handle, BundleId>,
    arena: BundleArena,
    next_bundle: u32,
}

impl Reducer {
    /// Builds a reducer over the graph: one decomposition leaf per node,
    /// and every balanced bundle found and indexed.
    pub fn new(graph: BidirectedGraph) -> Self {
        let mut reducer = Reducer {
            graph,
            tree: DecompositionTree::new(),
            decomp: HashMap::new(),
            store: BTreeMap::new(),
            index: HashMap::new(),
            arena: BundleArena::new(),
            next_bundle: 0,
        };
        let nids: Vec<NodeId> = reducer.graph.node_ids().collect();
        for nid in nids {
            let leaf = reducer.tree.make_source(nid);
            reducer.decomp.insert(nid, leaf);
        }
        let bundles = find_all_bundles(&reducer.graph, &mut reducer.arena);
        for bundle in bundles {
            reducer.mark(bundle);
        }
        reducer
    }

    /// The graph in its current state of reduction.
    pub fn graph(&self) -> &BidirectedGraph {
        &self.graph
    }

    /// The decomposition arena in its current state.
    pub fn tree(&self) -> &DecompositionTree {
        &self.tree
    }

    /// The decomposition subtree recorded for a live node.
    pub fn decomposition(&self, nid: NodeId) -> Option<DecompIx> {
        self.decomp.get(&nid).copied()
    }

    /// The bundle entered when following right from this handle, if any.
    pub fn bundle_at(&self, handle: Handle) -> Option<&Bundle> {
        let id = self.index.get(&handle)?;
        self.store.get(id).map(|stored| &stored.bundle)
    }

    /// Every handle with an index entry, in sorted order.
    pub fn indexed_handles(&self) -> Vec<Handle> {
        let mut handles: Vec<Handle> = self.index.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// The number of live bundles in the index.
    pub fn bundle_count(&self) -> usize {
        self.store.len()
    }

    /// Runs rewrites until neither rule applies and returns the result.
    pub fn run(mut self) -> Result<Reduction, Error> {
        loop {
            if let Some(id) = self.viable_bundle() {
                self.collapse_bundle(id)?;
                continue;
            }
            if let Some(nid) = self.find_tip() {
                self.reduce_degree_one_node(nid)?;
                continue;
            }
            break;
        }
        let roots = self.decomp.iter().map(|(&nid, &ix)| (nid, ix)).collect();
        Ok(Reduction {
            graph: self.graph,
            tree: self.tree,
            roots,
        })
    }

    /// Eliminates a degree-one tip, fusing its record into the neighbor's
    /// chain together with an epsilon for the collapsed edge.
    pub fn reduce_degree_one_node(&mut self, nid: NodeId) -> Result<(), Error> {
        let handle = self.graph.get_handle(nid, false)?;
        let right: Vec<Handle> = self.graph.follow_edges(handle, false).collect();
        let left: Vec<Handle> = self.graph.follow_edges(handle, true).collect();
        if right.len() + left.len() != 1 {
            return Err(Error::GraphInternalError(format!(
                "node {} is not a degree-one tip",
                nid
            )));
        }
        let neighbor = right.into_iter().chain(left).next().expect("one edge");
        if neighbor.id() == nid {
            return Err(Error::GraphInternalError(format!(
                "node {} only carries a self-edge",
                nid
            )));
        }
        let neighbor_id = neighbor.id();
        let neighbor_fwd = Handle::forward(neighbor_id);

        // Locate the tip relative to the neighbor's forward orientation.
        let on_right = self
            .graph
            .follow_edges(neighbor_fwd, false)
            .find(|h| h.id() == nid);
        let (tip_on_right, tip_reversed) = match on_right {
            Some(tip) => (true, tip.is_reverse()),
            None => {
                let tip = self
                    .graph
                    .follow_edges(neighbor_fwd, true)
                    .find(|h| h.id() == nid)
                    .ok_or_else(|| {
                        Error::GraphInternalError(format!(
                            "tip {} not visible from its neighbor {}",
                            nid, neighbor_id
                        ))
                    })?;
                (false, tip.is_reverse())
            }
        };

        self.graph.destroy_node(nid)?;
        self.purge_node(nid);

        let tip_subtree = self.take_decomp(nid)?;
        if tip_reversed {
            self.tree.reverse(tip_subtree);
        }
        let epsilon = self.tree.make_epsilon(nid);
        let neighbor_subtree = self.take_decomp(neighbor_id)?;
        let merged = if tip_on_right {
            let outer = self.tree.make_chain(nid, epsilon, tip_subtree);
            self.tree.make_chain(neighbor_id, neighbor_subtree, outer)
        } else {
            let outer = self.tree.make_chain(nid, tip_subtree, epsilon);
            self.tree.make_chain(neighbor_id, outer, neighbor_subtree)
        };
        self.decomp.insert(neighbor_id, merged);

        // The removed tip may have been masking a bundle at the neighbor.
        let seed = if tip_on_right {
            neighbor_fwd
        } else {
            neighbor_fwd.flip()
        };
        if let Some(found) = find_balanced_bundle(&self.graph, seed, &mut self.arena) {
            self.mark(found);
        }
        Ok(())
    }

    /// Collapses the bundle entered rightward from `handle`.
    pub fn reduce_bundle(&mut self, handle: Handle) -> Result<(), Error> {
        let id = *self.index.get(&handle).ok_or_else(|| {
            Error::GraphInternalError(format!("no bundle indexed at handle {}", handle))
        })?;
        self.collapse_bundle(id)
    }

    /// Chain fusion as a dedicated graph rewrite.
    ///
    /// The decomposition side of it is [`DecompositionTree::make_chain`];
    /// as a graph rewrite it is expressible as repeated tip elimination and
    /// has not been implemented on its own.
    pub fn fuse_chains(&mut self, _a: NodeId, _b: NodeId) -> Result<(), Error> {
        Err(Error::Unimplemented("chain fusion"))
    }

    // ---
    // Rewrites
    // ---

    fn collapse_bundle(&mut self, id: BundleId) -> Result<(), Error> {
        {
            let stored = self.store.get(&id).ok_or_else(|| {
                Error::GraphInternalError(format!("bundle {} is not live", id))
            })?;
            if stored.bundle.is_cyclic() {
                return Err(Error::InvalidBundleOp("cannot collapse a cyclic bundle"));
            }
            if stored.bundle.is_trivial() {
                return Err(Error::InvalidBundleOp("cannot collapse a trivial bundle"));
            }
        }
        {
            let bundle = &self.store[&id].bundle;
            let distinct: BTreeSet<NodeId> = bundle
                .left()
                .iter()
                .chain(bundle.right().iter())
                .map(|h| h.id())
                .collect();
            if distinct.len() != bundle.left().len() + bundle.right().len() {
                return Err(Error::InvalidBundleOp(
                    "cannot collapse a bundle that repeats a node",
                ));
            }
        }
        let stored = self.store.remove(&id).expect("checked above");
        let bundle = stored.bundle;
        let left: Vec<Handle> = bundle.left().members().to_vec();
        let right: Vec<Handle> = bundle.right().members().to_vec();
        // Drop the collapsed bundle's own entries. Entries that were
        // overwritten by a later marking stay with their current owner.
        for &l in &left {
            if self.index.get(&l) == Some(&id) {
                self.index.remove(&l);
            }
        }
        for &r in &right {
            let key = r.flip();
            if self.index.get(&key) == Some(&id) {
                self.index.remove(&key);
            }
        }

        let member_ids: BTreeSet<NodeId> =
            left.iter().chain(right.iter()).map(|h| h.id()).collect();

        let a = self.graph.create_node(String::new());
        let b = self.graph.create_node(String::new());
        let a_fwd = Handle::forward(a);
        let b_fwd = Handle::forward(b);

        // Boundary edges move onto the replacement pair; edges that stay
        // inside the member set are cycles the collapse swallows.
        let mut scycle = false;
        let mut sinv = [false, false];
        let mut inherited: Vec<(Handle, Handle)> = Vec::new();
        for &l in &left {
            for u in self.graph.follow_edges(l, true) {
                if member_ids.contains(&u.id()) {
                    if u == l.flip() {
                        sinv[0] = true;
                    } else {
                        scycle = true;
                    }
                } else {
                    inherited.push((u, a_fwd));
                }
            }
        }
        for &r in &right {
            for w in self.graph.follow_edges(r, false) {
                if member_ids.contains(&w.id()) {
                    if w == r.flip() {
                        sinv[1] = true;
                    } else {
                        scycle = true;
                    }
                } else {
                    inherited.push((b_fwd, w));
                }
            }
        }

        for (from, to) in inherited {
            self.graph.create_edge(from, to)?;
        }
        self.graph.create_edge(a_fwd, b_fwd)?;
        for &nid in &member_ids {
            self.graph.destroy_node(nid)?;
            self.purge_node(nid);
        }

        // Record the collapse: a split over the members' subtrees, wrapped
        // so that later chain fusion lands it between the two new sources.
        let mut children = Vec::with_capacity(left.len() + right.len());
        for &member in left.iter().chain(right.iter()) {
            let subtree = self.take_decomp(member.id())?;
            if member.is_reverse() {
                self.tree.reverse(subtree);
            }
            children.push(subtree);
        }
        let split = self.tree.make_split(a, children);
        if scycle {
            self.tree.set_self_cycle(split);
        }
        if sinv[0] {
            self.tree.set_self_inversion(split, false);
        }
        if sinv[1] {
            self.tree.set_self_inversion(split, true);
        }
        let source_a = self.tree.make_source(a);
        let chain_a = self.tree.make_chain(a, source_a, split);
        self.decomp.insert(a, chain_a);
        let source_b = self.tree.make_source(b);
        self.decomp.insert(b, source_b);

        // Index the replacement pair and probe outward from it.
        let mut replacement = self.arena.alloc();
        replacement.left.insert(a_fwd);
        replacement.right.insert(b_fwd);
        replacement.freeze();
        self.mark(replacement);
        if let Some(found) = find_balanced_bundle(&self.graph, a_fwd.flip(), &mut self.arena) {
            self.mark(found);
        }
        if let Some(found) = find_balanced_bundle(&self.graph, b_fwd, &mut self.arena) {
            self.mark(found);
        }

        self.arena.recycle(bundle);
        Ok(())
    }

    // ---
    // Candidate scans
    // ---

    fn find_tip(&self) -> Option<NodeId> {
        let mut nids: Vec<NodeId> = self.graph.node_ids().collect();
        nids.sort_unstable();
        for nid in nids {
            let handle = Handle::forward(nid);
            let mut incident = self
                .graph
                .follow_edges(handle, false)
                .chain(self.graph.follow_edges(handle, true));
            let neighbor = match incident.next() {
                Some(h) => h,
                None => continue,
            };
            if incident.next().is_some() {
                continue;
            }
            if neighbor.id() == nid {
                // A lone self-edge is not reducible.
                continue;
            }
            return Some(nid);
        }
        None
    }

    fn viable_bundle(&self) -> Option<BundleId> {
        self.store.iter().find_map(|(&id, stored)| {
            let bundle = &stored.bundle;
            if bundle.is_trivial() || bundle.is_cyclic() {
                return None;
            }
            // A node contributing both orientations cannot be replaced by
            // one side of the fresh pair.
            let distinct: BTreeSet<NodeId> = bundle
                .left()
                .iter()
                .chain(bundle.right().iter())
                .map(|h| h.id())
                .collect();
            if distinct.len() != bundle.left().len() + bundle.right().len() {
                return None;
            }
            let left_ok = bundle
                .left()
                .iter()
                .all(|l| self.flanked(bundle.left(), l.flip()));
            if !left_ok {
                return None;
            }
            let right_ok = bundle
                .right()
                .iter()
                .all(|r| self.flanked(bundle.right(), r));
            if right_ok {
                Some(id)
            } else {
                None
            }
        })
    }

    // True if following right from `key` enters a bundle that sits strongly
    // or weakly against `side`.
    fn flanked(&self, side: &BundleSide, key: Handle) -> bool {
        let neighbor = match self.index.get(&key).and_then(|id| self.store.get(id)) {
            Some(stored) => &stored.bundle,
            None => return false,
        };
        let classifications = [
            side.adjacency(neighbor.left()),
            side.adjacency(neighbor.right()),
        ];
        classifications
            .into_iter()
            .any(|c| matches!(c, Ok(Adjacency::Strong) | Ok(Adjacency::Weak)))
    }

    // ---
    // Index maintenance
    // ---

    fn mark(&mut self, bundle: Bundle) -> BundleId {
        let id = BundleId(self.next_bundle);
        self.next_bundle += 1;
        let mut keys: BTreeSet<Handle> = BTreeSet::new();
        for &l in bundle.left().members() {
            keys.insert(l);
        }
        for &r in bundle.right().members() {
            keys.insert(r.flip());
        }
        let refs = keys.len();
        for key in keys {
            if let Some(old) = self.index.insert(key, id) {
                self.release_ref(old);
            }
        }
        self.store.insert(id, StoredBundle { bundle, refs });
        id
    }

    fn release_ref(&mut self, id: BundleId) {
        let retired = match self.store.get_mut(&id) {
            Some(stored) => {
                stored.refs -= 1;
                stored.refs == 0
            }
            None => false,
        };
        if retired {
            let stored = self.store.remove(&id).expect("retired bundle vanished");
            self.arena.recycle(stored.bundle);
        }
    }

    fn purge_node(&mut self, nid: NodeId) {
        for key in [Handle::forward(nid), Handle::reverse(nid)] {
            if let Some(id) = self.index.remove(&key) {
                self.release_ref(id);
            }
        }
    }

    fn take_decomp(&mut self, nid: NodeId) -> Result<DecompIx, Error> {
        self.decomp.remove(&nid).ok_or_else(|| {
            Error::GraphInternalError(format!("node {} has no decomposition record", nid))
        })
    }
}

/// Convenience: reduces a graph to its fixed point in one call.
pub fn reduce(graph: BidirectedGraph) -> Result<Reduction, Error> {
    Reducer::new(graph).run()
}
