// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the smilefuzz command-line interface.
//!
//! Three subcommands around the harness: `replay` runs saved corpus and
//! crash files, `explain` shows what a single input does to the generator,
//! and `seed` writes a starter corpus that reaches every operation.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "smilefuzz",
    about = "Structured fuzz harness for a streaming Smile generator",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay corpus files or directories through the harness
    Replay {
        /// Input files and directories (directories are walked recursively)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the report as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Run inputs one at a time, in order
        #[arg(long)]
        sequential: bool,
    },

    /// Show the generator calls, verdict and output for one input
    Explain {
        /// Input file
        file: PathBuf,
    },

    /// Write one seed input per operation into a directory
    Seed {
        /// Output directory (created if missing)
        dir: PathBuf,
    },
}
