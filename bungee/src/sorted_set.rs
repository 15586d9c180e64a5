// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::ops::Deref;

/// A set stored as a sorted vector.
///
/// Built once, then read-only. Membership queries are a binary search and
/// ordered iteration is free, which is what the bundle-side intersection
/// machinery wants.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct SortedSet<T> {
    inner: Box<[T]>,
}

impl<T> SortedSet<T>
where
    T: Ord,
{
    /// Creates a new `SortedSet` from a vector or other slice container.
    pub(crate) fn new(v: impl Into<Vec<T>>) -> Self {
        let mut v = v.into();
        v.sort();
        v.dedup();
        Self { inner: v.into() }
    }

    /// Returns true if this sorted vector contains this element.
    pub(crate) fn contains(&self, item: &T) -> bool {
        self.binary_search(item).is_ok()
    }
}

impl<T> Deref for SortedSet<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
