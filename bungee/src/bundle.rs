// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The bundle model: two handle sets and their derived properties.
//!
//! A balanced bundle is a pair of handle sets `(L, R)` where every member of
//! `L` sees exactly `R` on its right and every member of `R` sees exactly
//! `L` on its left. The detector in [`crate::algo::bundles`] builds these;
//! the reduction engine consumes them.

use crate::errors::Error;
use crate::handle::Handle;
use crate::sorted_set::SortedSet;
use itertools::{EitherOrBoth, Itertools};
use std::collections::HashSet;

/// How strongly two bundle sides overlap as sets, possibly under flip.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Adjacency {
    /// The sides share no members under any orientation.
    None,
    /// The sides overlap but are not identical.
    Weak,
    /// The sides hold identical members under some orientation.
    Strong,
}

/// One side of a bundle: a set of handles.
///
/// While the detector builds a side it behaves like a hash set that also
/// remembers insertion order. Once frozen it additionally caches a sorted
/// vector of its members and a sorted vector of their flips, which the
/// adjacency classification intersects.
#[derive(Clone, Debug, Default)]
pub struct BundleSide {
    members: Vec<Handle>,
    seen: HashSet<Handle>,
    cached: SortedSet<Handle>,
    cached_flipped: SortedSet<Handle>,
    frozen: bool,
}

impl BundleSide {
    /// Adds a handle to this side. Returns true if it was newly inserted.
    pub(crate) fn insert(&mut self, handle: Handle) -> bool {
        if self.seen.insert(handle) {
            self.members.push(handle);
            true
        } else {
            false
        }
    }

    /// Returns true if this side contains the handle.
    pub fn contains(&self, handle: Handle) -> bool {
        if self.frozen {
            self.cached.contains(&handle)
        } else {
            self.seen.contains(&handle)
        }
    }

    /// The members of this side, in insertion order.
    pub fn members(&self) -> &[Handle] {
        &self.members
    }

    /// Iterates over the members of this side.
    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.members.iter().copied()
    }

    /// The number of members on this side.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if this side has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Builds the sorted member and flipped-member caches.
    pub(crate) fn freeze(&mut self) {
        self.cached = SortedSet::new(self.members.clone());
        self.cached_flipped =
            SortedSet::new(self.members.iter().map(|h| h.flip()).collect::<Vec<_>>());
        // The build-phase set is no longer needed.
        self.seen = HashSet::new();
        self.frozen = true;
    }

    /// Clears this side back to an empty, unfrozen state.
    pub(crate) fn reset(&mut self) {
        self.members.clear();
        self.seen.clear();
        self.cached = SortedSet::default();
        self.cached_flipped = SortedSet::default();
        self.frozen = false;
    }

    /// Classifies how this side overlaps another.
    ///
    /// All four orientation combinations of the two caches are intersected:
    /// `Strong` if any intersection covers both sides entirely, `Weak` if any
    /// is non-empty, `None` otherwise. Fails with
    /// [`Error::InvalidBundleOp`] when either side is not frozen.
    pub fn adjacency(&self, other: &BundleSide) -> Result<Adjacency, Error> {
        if !self.frozen || !other.frozen {
            return Err(Error::InvalidBundleOp(
                "adjacency requires frozen bundle sides",
            ));
        }
        let pairs = [
            (&self.cached, &other.cached),
            (&self.cached, &other.cached_flipped),
            (&self.cached_flipped, &other.cached),
            (&self.cached_flipped, &other.cached_flipped),
        ];
        let mut overlap = false;
        for (mine, theirs) in pairs {
            let count = intersection_count(mine, theirs);
            if count > 0 && count == mine.len() && count == theirs.len() {
                return Ok(Adjacency::Strong);
            }
            overlap |= count > 0;
        }
        if overlap {
            Ok(Adjacency::Weak)
        } else {
            Ok(Adjacency::None)
        }
    }

    fn intersects(&self, other_cache: &SortedSet<Handle>) -> bool {
        intersection_count(&self.cached, other_cache) > 0
    }
}

fn intersection_count(a: &SortedSet<Handle>, b: &SortedSet<Handle>) -> usize {
    a.iter()
        .merge_join_by(b.iter(), Ord::cmp)
        .filter(|pair| matches!(pair, EitherOrBoth::Both(..)))
        .count()
}

/// A pair of bundle sides plus derived properties.
#[derive(Clone, Debug, Default)]
pub struct Bundle {
    pub(crate) left: BundleSide,
    pub(crate) right: BundleSide,
    trivial: bool,
    has_reversed: bool,
    cyclic: bool,
}

impl Bundle {
    /// The left side of this bundle.
    pub fn left(&self) -> &BundleSide {
        &self.left
    }

    /// The right side of this bundle.
    pub fn right(&self) -> &BundleSide {
        &self.right
    }

    /// Selects a side: the left one if `is_left`, the right one otherwise.
    pub fn side(&self, is_left: bool) -> &BundleSide {
        if is_left {
            &self.left
        } else {
            &self.right
        }
    }

    /// Returns true if both sides hold exactly one handle.
    pub fn is_trivial(&self) -> bool {
        self.trivial
    }

    /// Returns true if any member's orientation differs from the seed's.
    pub fn has_reversed(&self) -> bool {
        self.has_reversed
    }

    /// Returns true if the member sets intersect with themselves or their
    /// flips: the bundle carries a self-cycle or self-inversion.
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    pub(crate) fn set_has_reversed(&mut self, has_reversed: bool) {
        self.has_reversed = has_reversed;
    }

    /// Freezes both sides and computes the derived flags that depend on the
    /// completed member sets.
    pub(crate) fn freeze(&mut self) {
        self.left.freeze();
        self.right.freeze();
        self.trivial = self.left.len() == 1 && self.right.len() == 1;
        self.cyclic = self.left.intersects(&self.right.cached)
            || self.left.intersects(&self.right.cached_flipped);
    }

    /// Clears the bundle back to an empty, unfrozen state.
    pub(crate) fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.trivial = false;
        self.has_reversed = false;
        self.cyclic = false;
    }
}

/// A pool of recycled bundles.
///
/// Enumeration probes many seeds that turn out not to be bundles; recycling
/// the scratch bundle between probes bounds allocator churn. Each detector or
/// reduction run owns one arena and passes it by reference.
#[derive(Debug, Default)]
pub struct BundleArena {
    free: Vec<Bundle>,
}

impl BundleArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a cleared bundle, reusing a recycled one when available.
    pub fn alloc(&mut self) -> Bundle {
        self.free.pop().unwrap_or_default()
    }

    /// Returns a bundle to the pool.
    pub fn recycle(&mut self, mut bundle: Bundle) {
        bundle.reset();
        self.free.push(bundle);
    }

    /// The number of bundles currently pooled.
    pub fn pooled(&self) -> usize {
        self.free.len()
    }
}
