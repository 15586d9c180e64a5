// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The bidirected graph and its JSON loader.
//!
//! The main entry point is [`BidirectedGraph`](struct.BidirectedGraph.html).
//! See its documentation for more details.

mod build;
mod graph_impl;

pub use graph_impl::*;
