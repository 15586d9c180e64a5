// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Algorithms over bidirected graphs.

pub mod bundles;
pub mod reachability;
pub mod reduce;
pub mod scc;
