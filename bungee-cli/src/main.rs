// Copyright (c) The bungee Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use bungee_cli::{cmd_bundles, cmd_reduce, cmd_scc};
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[clap(name = "bungee", about = "Balanced-bundle analysis of bidirected variation graphs")]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Enumerate the balanced bundles of each graph
    Bundles {
        /// Graph files in JSON form
        files: Vec<PathBuf>,
    },
    /// Print the strongly connected components of each graph
    Scc {
        /// Graph files in JSON form
        files: Vec<PathBuf>,
    },
    /// Reduce each graph and print its decomposition
    Reduce {
        /// Graph files in JSON form
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let failed_loads = match args.cmd {
        Command::Bundles { files } => cmd_bundles(&files)?,
        Command::Scc { files } => cmd_scc(&files)?,
        Command::Reduce { files } => cmd_reduce(&files)?,
    };

    if failed_loads > 0 {
        process::exit(1);
    }
    Ok(())
}
