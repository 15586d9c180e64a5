// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod decomposition_tests;
mod fixtures;
mod proptest_helpers;
mod scc_tests;
