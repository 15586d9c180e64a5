// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A command-line frontend for `bungee`.
//!
//! Each command takes a list of graph files in JSON form, loads them one by
//! one, and prints its analysis. A file that fails to load is diagnosed and
//! skipped; the process then exits non-zero.

use bungee::algo::bundles::find_all_bundles;
use bungee::algo::reduce::Reducer;
use bungee::algo::scc::strongly_connected_components;
use bungee::decomposition::{DecompIx, DecompKind, DecompositionTree};
use bungee::{BidirectedGraph, Bundle, BundleArena};
use color_eyre::Result;
use itertools::Itertools;
use std::path::{Path, PathBuf};

fn load(path: &Path) -> Option<BidirectedGraph> {
    match BidirectedGraph::from_json_file(path) {
        Ok(graph) => Some(graph),
        Err(err) => {
            eprintln!("{}: {}", path.display(), err);
            None
        }
    }
}

/// Enumerates and prints the balanced bundles of each graph. Returns the
/// number of files that failed to load.
pub fn cmd_bundles(files: &[PathBuf]) -> Result<usize> {
    let mut failed = 0;
    for path in files {
        let graph = match load(path) {
            Some(graph) => graph,
            None => {
                failed += 1;
                continue;
            }
        };
        println!("{}", path.display());
        let mut arena = BundleArena::new();
        let bundles = find_all_bundles(&graph, &mut arena);
        for (i, bundle) in bundles.iter().enumerate() {
            println!("bundle {}: {}", i + 1, format_bundle(bundle));
        }
        println!("{} bundles", bundles.len());
    }
    Ok(failed)
}

/// Prints the strongly connected components of each graph. Returns the
/// number of files that failed to load.
pub fn cmd_scc(files: &[PathBuf]) -> Result<usize> {
    let mut failed = 0;
    for path in files {
        let graph = match load(path) {
            Some(graph) => graph,
            None => {
                failed += 1;
                continue;
            }
        };
        println!("{}", path.display());
        for component in strongly_connected_components(&graph) {
            println!("{{{}}}", component.iter().join(", "));
        }
    }
    Ok(failed)
}

/// Reduces each graph to its fixed point and prints the surviving topology
/// with its decomposition trees. Returns the number of files that failed to
/// load.
pub fn cmd_reduce(files: &[PathBuf]) -> Result<usize> {
    let mut failed = 0;
    for path in files {
        let graph = match load(path) {
            Some(graph) => graph,
            None => {
                failed += 1;
                continue;
            }
        };
        println!("{}", path.display());
        let reduction = Reducer::new(graph).run()?;
        println!(
            "{} nodes, {} edges after reduction",
            reduction.graph.node_count(),
            reduction.graph.edge_count()
        );
        for edge in reduction.graph.edges() {
            println!("edge {}", edge);
        }
        for (nid, &root) in &reduction.roots {
            println!("decomposition of node {}:", nid);
            print_subtree(&reduction.tree, root, 1);
        }
    }
    Ok(failed)
}

fn format_bundle(bundle: &Bundle) -> String {
    let left = bundle.left().iter().join(", ");
    let right = bundle.right().iter().join(", ");
    let mut flags = Vec::new();
    if bundle.is_trivial() {
        flags.push("trivial");
    }
    if bundle.is_cyclic() {
        flags.push("cyclic");
    }
    if bundle.has_reversed() {
        flags.push("reversed");
    }
    let suffix = if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    };
    format!("left {{{}}} right {{{}}}{}", left, right, suffix)
}

fn print_subtree(tree: &DecompositionTree, ix: DecompIx, depth: usize) {
    let node = tree.node(ix);
    let pad = "| ".repeat(depth);
    let orientation = if node.is_reverse { "r" } else { "" };
    match node.kind() {
        DecompKind::Source => println!("{}Source Node: {}{}", pad, node.nid, orientation),
        DecompKind::Epsilon => println!("{}Epsilon Node: {}{}", pad, node.nid, orientation),
        DecompKind::Chain { .. } => {
            println!("{}Chain Node: {}{}", pad, node.nid, orientation);
            for child in tree.chain_children(ix) {
                print_subtree(tree, child, depth + 1);
            }
        }
        DecompKind::Split { .. } => {
            println!("{}Split Node: {}{}", pad, node.nid, orientation);
            for &child in tree.split_children(ix) {
                print_subtree(tree, child, depth + 1);
            }
        }
    }
}
