// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use smilefuzz::corpus::{self, ReplayReport, Verdict};
use smilefuzz::generator::FactoryBuilder;
use smilefuzz::harness::{self, Outcome};
use smilefuzz::smile::SmileFactory;
use smilefuzz::trace::TracedBuilder;

mod cli;
use cli::display::{accent, dim, heading, hex_dump, verdict_badge};
use cli::{Cli, Commands};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            paths,
            json,
            sequential,
        } => run_replay(&paths, json, sequential),
        Commands::Explain { file } => run_explain(&file).map(|()| true),
        Commands::Seed { dir } => run_seed(&dir).map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns false when any input produced a finding or panic.
fn run_replay(paths: &[PathBuf], json: bool, sequential: bool) -> Result<bool> {
    let files = corpus::collect_inputs(paths).context("failed to collect corpus inputs")?;
    info!("replaying {} inputs", files.len());

    let report = if sequential {
        corpus::replay_files(&files)
    } else {
        replay_parallel(&files, json)
    }
    .context("failed to read corpus input")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(!report.has_failures())
}

#[cfg(feature = "parallel")]
fn replay_parallel(files: &[PathBuf], quiet: bool) -> std::io::Result<ReplayReport> {
    use indicatif::{ProgressBar, ProgressStyle};

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.cyan} Replaying [{bar:40.cyan/dim}] {pos}/{len}")
    {
        progress.set_style(style.progress_chars("━━╸"));
    }
    let report = corpus::replay_files_parallel(files, &progress);
    progress.finish_and_clear();
    report
}

#[cfg(not(feature = "parallel"))]
fn replay_parallel(files: &[PathBuf], _quiet: bool) -> std::io::Result<ReplayReport> {
    corpus::replay_files(files)
}

fn print_summary(report: &ReplayReport) {
    for failure in report.failures() {
        println!(
            "{} {} {}",
            verdict_badge(failure.verdict),
            failure.path,
            dim(failure.detail.as_deref().unwrap_or(""))
        );
    }
    println!(
        "{} {} inputs: {} completed, {} rejected, {} findings, {} panics",
        heading("replay"),
        report.inputs.len(),
        report.count(Verdict::Completed),
        report.count(Verdict::Rejected),
        report.count(Verdict::Finding),
        report.count(Verdict::Panic),
    );
}

fn run_explain(file: &Path) -> Result<()> {
    let data = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let builder = TracedBuilder::new(SmileFactory::builder());
    let log = builder.log();
    let result = harness::run_one_input_with(builder, &data);

    println!("{} {} ({} bytes, crc32 {})", heading("input"), file.display(), data.len(), corpus::fingerprint(&data));
    println!("{}", heading("calls"));
    for call in log.calls() {
        println!("  {}", call);
    }

    match result {
        Ok(iteration) => {
            if let Some(op) = &iteration.operation {
                println!("{} {} {}", heading("operation"), accent(&op.selector().to_string()), op);
            }
            match &iteration.outcome {
                Outcome::Completed => println!("{} {}", heading("verdict"), verdict_badge(Verdict::Completed)),
                Outcome::Rejected { stage, error } => println!(
                    "{} {} during {}: {}",
                    heading("verdict"),
                    verdict_badge(Verdict::Rejected),
                    stage,
                    error
                ),
            }
            println!("{} {} bytes", heading("output"), iteration.output.len());
            println!("{}", hex_dump(&iteration.output));
        }
        Err(finding) => {
            println!("{} {} {}", heading("verdict"), verdict_badge(Verdict::Finding), finding);
        }
    }
    Ok(())
}

fn run_seed(dir: &Path) -> Result<()> {
    let written = corpus::write_seeds(dir)
        .with_context(|| format!("failed to write seeds into {}", dir.display()))?;
    println!(
        "{} wrote {} inputs for {} features into {}",
        heading("seed"),
        written.len(),
        smilefuzz::smile::SmileFactoryBuilder::features().len(),
        dir.display()
    );
    Ok(())
}
