// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Balanced-bundle detection.
//!
//! A probe from a seed handle runs in three phases: collect the seed's
//! right-neighbors as the right side, collect the left-neighbors of the
//! first right member as the left side while checking every other right
//! member sees the same left set, then check every other left member sees
//! the same right set. Any disagreement means the seed is not on a balanced
//! bundle.

use crate::bundle::{Bundle, BundleArena};
use crate::graph::BidirectedGraph;
use crate::handle::Handle;
use fixedbitset::FixedBitSet;

/// A visit set over handles, keyed by their packed integer value.
///
/// Enumeration uses it to avoid re-probing seeds that an earlier probe
/// already placed inside a bundle.
pub(crate) struct SeedCache {
    bits: FixedBitSet,
}

impl SeedCache {
    pub(crate) fn with_capacity(handles: usize) -> Self {
        SeedCache {
            bits: FixedBitSet::with_capacity(handles),
        }
    }

    /// Marks a handle. Returns true if it was not marked before.
    pub(crate) fn insert(&mut self, handle: Handle) -> bool {
        let bit = handle.as_integer() as usize;
        if bit >= self.bits.len() {
            self.bits.grow(bit + 1);
        }
        !self.bits.put(bit)
    }
}

/// Probes the seed handle for a balanced bundle.
///
/// Handles reached during the probe are recorded in `cached` under the
/// orientation that would re-seed the same bundle: left members as-is,
/// right members flipped.
fn probe(
    graph: &BidirectedGraph,
    seed: Handle,
    cached: &mut SeedCache,
    arena: &mut BundleArena,
) -> (bool, Bundle) {
    let mut bundle = arena.alloc();
    let mut balanced = true;
    let mut has_reversed = false;
    let seed_reverse = seed.is_reverse();

    // Phase 1: the seed's right-neighbors form the right side.
    let rhs: Vec<Handle> = graph.follow_edges(seed, false).collect();
    for &handle in &rhs {
        bundle.right.insert(handle);
        has_reversed |= handle.is_reverse() != seed_reverse;
    }
    if bundle.right.is_empty() {
        return (false, bundle);
    }

    // Phase 2: the left side, checked for agreement across right members.
    let mut lhs: Vec<Handle> = Vec::new();
    let mut first = true;
    for &rhs_handle in &rhs {
        cached.insert(rhs_handle.flip());
        if first {
            for lhs_handle in graph.follow_edges(rhs_handle, true) {
                bundle.left.insert(lhs_handle);
                lhs.push(lhs_handle);
                has_reversed |= lhs_handle.is_reverse() != seed_reverse;
                cached.insert(lhs_handle);
            }
            first = false;
        } else {
            let mut count = 0;
            for lhs_handle in graph.follow_edges(rhs_handle, true) {
                if bundle.left.insert(lhs_handle) {
                    balanced = false;
                }
                has_reversed |= lhs_handle.is_reverse() != seed_reverse;
                cached.insert(lhs_handle);
                count += 1;
            }
            if count != lhs.len() {
                balanced = false;
            }
        }
    }

    // Phase 3: every other left member must see the same right side.
    let rhs_count = rhs.len();
    for &lhs_handle in &lhs {
        if lhs_handle == seed {
            continue;
        }
        let mut count = 0;
        for rhs_handle in graph.follow_edges(lhs_handle, false) {
            if bundle.right.insert(rhs_handle) {
                balanced = false;
            }
            has_reversed |= rhs_handle.is_reverse() != seed_reverse;
            cached.insert(rhs_handle.flip());
            count += 1;
        }
        if count != rhs_count {
            balanced = false;
        }
    }

    bundle.set_has_reversed(has_reversed);
    (balanced, bundle)
}

/// Finds the balanced bundle seeded at `seed`, if there is one.
///
/// A seed with no right-neighbors, or whose neighborhood fails the balance
/// checks, is not an error; it simply yields `None`.
pub fn find_balanced_bundle(
    graph: &BidirectedGraph,
    seed: Handle,
    arena: &mut BundleArena,
) -> Option<Bundle> {
    let mut cached = SeedCache::with_capacity(0);
    let (balanced, mut bundle) = probe(graph, seed, &mut cached, arena);
    if balanced {
        bundle.freeze();
        Some(bundle)
    } else {
        arena.recycle(bundle);
        None
    }
}

/// Enumerates every balanced bundle in the graph.
///
/// Each bundle is returned once even though it could be seeded from any of
/// its members: seeds already reached by an earlier probe are skipped.
pub fn find_all_bundles(graph: &BidirectedGraph, arena: &mut BundleArena) -> Vec<Bundle> {
    let capacity = graph
        .max_node_id()
        .map_or(0, |max| Handle::reverse(max).as_integer() as usize + 1);
    let mut cached = SeedCache::with_capacity(capacity);
    let mut bundles = Vec::new();

    let seeds: Vec<Handle> = graph
        .node_ids()
        .flat_map(|nid| [Handle::forward(nid), Handle::reverse(nid)])
        .collect();
    for seed in seeds {
        if !cached.insert(seed) {
            continue;
        }
        let (balanced, mut bundle) = probe(graph, seed, &mut cached, arena);
        if balanced {
            bundle.freeze();
            bundles.push(bundle);
        } else {
            arena.recycle(bundle);
        }
    }

    bundles
}
