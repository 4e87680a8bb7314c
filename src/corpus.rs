// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus replay: run saved fuzz inputs outside the fuzzing engine.
//!
//! libFuzzer leaves behind a corpus directory and the occasional
//! `crash-<hash>` file. Replaying them through the same harness entry point
//! answers the two questions you have after a campaign: does this input
//! still crash, and what does the rest of the corpus actually exercise.
//!
//! Panics are caught per input so one crash does not hide the rest of the
//! report. Each input still gets a private generator and sink, which is what
//! makes running them on the rayon pool safe.

use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use log::{debug, warn};
use serde::Serialize;

use crate::generator::FactoryBuilder;
use crate::harness::{self, selector_name, Outcome, SELECTOR_MAX, SELECTOR_MIN};
use crate::smile::SmileFactoryBuilder;

/// How one input ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Completed,
    Rejected,
    Finding,
    Panic,
}

impl Verdict {
    /// Findings and panics are what a replay is looking for.
    pub fn is_failure(self) -> bool {
        matches!(self, Verdict::Finding | Verdict::Panic)
    }
}

/// Per-input line of a replay report.
#[derive(Debug, Clone, Serialize)]
pub struct InputReport {
    pub path: String,
    pub len: usize,
    /// CRC32 of the input bytes, hex
    pub crc32: String,
    pub operation: Option<&'static str>,
    pub verdict: Verdict,
    /// Error or panic message, if any
    pub detail: Option<String>,
    pub output_len: usize,
}

/// Report over a whole replay.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub inputs: Vec<InputReport>,
}

impl ReplayReport {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.inputs.iter().filter(|r| r.verdict == verdict).count()
    }

    pub fn has_failures(&self) -> bool {
        self.inputs.iter().any(|r| r.verdict.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &InputReport> {
        self.inputs.iter().filter(|r| r.verdict.is_failure())
    }
}

/// CRC32 fingerprint of an input, as 8 hex digits.
pub fn fingerprint(data: &[u8]) -> String {
    format!("{:08x}", crc32fast::hash(data))
}

/// Expand files and directories into a sorted list of input files.
///
/// Directories are walked recursively; hidden entries (leading `.`) are
/// skipped so editor and VCS droppings do not end up in the corpus.
pub fn collect_inputs(paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        collect_into(path, &mut files)?;
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_into(path: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    let metadata = fs::metadata(path)?;
    if metadata.is_file() {
        files.push(path.to_path_buf());
        return Ok(());
    }
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        // A symlinked directory can point back up the tree
        if entry.file_type()?.is_symlink() && entry.path().is_dir() {
            debug!("skipping symlinked directory {}", entry.path().display());
            continue;
        }
        collect_into(&entry.path(), files)?;
    }
    Ok(())
}

/// Run one input through the Smile harness, catching panics.
pub fn replay_input(name: &str, data: &[u8]) -> InputReport {
    let result = panic::catch_unwind(AssertUnwindSafe(|| harness::run_one_input(data)));

    let (operation, verdict, detail, output_len) = match result {
        Ok(Ok(iteration)) => {
            let operation = iteration.operation.as_ref().map(|op| op.name());
            let (verdict, detail) = match iteration.outcome {
                Outcome::Completed => (Verdict::Completed, None),
                Outcome::Rejected { stage, error } => {
                    (Verdict::Rejected, Some(format!("{}: {}", stage, error)))
                }
            };
            (operation, verdict, detail, iteration.output.len())
        }
        Ok(Err(finding)) => {
            warn!("{}: {}", name, finding);
            let operation = finding.operation.as_ref().map(|op| op.name());
            (operation, Verdict::Finding, Some(finding.to_string()), finding.output.len())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!("{}: panicked: {}", name, message);
            (None, Verdict::Panic, Some(message), 0)
        }
    };

    InputReport {
        path: name.to_string(),
        len: data.len(),
        crc32: fingerprint(data),
        operation,
        verdict,
        detail,
        output_len,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn replay_file(path: &Path) -> io::Result<InputReport> {
    let data = fs::read(path)?;
    Ok(replay_input(&path.display().to_string(), &data))
}

/// Replay every file, in order.
pub fn replay_files(files: &[PathBuf]) -> io::Result<ReplayReport> {
    let inputs = files
        .iter()
        .map(|path| replay_file(path))
        .collect::<io::Result<Vec<_>>>()?;
    Ok(ReplayReport { inputs })
}

/// Replay every file on the rayon pool. Report order matches `files`.
#[cfg(feature = "parallel")]
pub fn replay_files_parallel(files: &[PathBuf], progress: &ProgressBar) -> io::Result<ReplayReport> {
    let inputs = files
        .par_iter()
        .map(|path| {
            let report = replay_file(path);
            progress.inc(1);
            report
        })
        .collect::<io::Result<Vec<_>>>()?;
    Ok(ReplayReport { inputs })
}

/// Bytes after the selector in every seed: an array length byte, some
/// ASCII, and a trailing byte that is never valid UTF-8.
const SEED_PAYLOAD: &[u8] = b"\x03smile:)\n\xff";

/// One seed input per operation, named `op-NN-<operation>.bin`.
///
/// Each seed enables the first feature, disables the second, replays every
/// feature as `false`, then forces its selector.
pub fn seed_inputs() -> Vec<(String, Vec<u8>)> {
    let feature_count = SmileFactoryBuilder::features().len();
    (SELECTOR_MIN..=SELECTOR_MAX)
        .map(|selector| {
            let mut data = vec![0, 1];
            data.extend(std::iter::repeat(0).take(feature_count));
            // int_in_range(1..=20) maps byte b to 1 + b % 20
            data.push((selector - SELECTOR_MIN) as u8);
            data.extend_from_slice(SEED_PAYLOAD);
            let name = format!("op-{:02}-{}.bin", selector, selector_name(selector));
            (name, data)
        })
        .collect()
}

/// Write `seed_inputs` into `dir`, returning the paths written.
pub fn write_seeds(dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    seed_inputs()
        .into_iter()
        .map(|(name, data)| {
            let path = dir.join(name);
            fs::write(&path, data)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_cover_every_selector() {
        let seeds = seed_inputs();
        assert_eq!(seeds.len(), 20);
        for (i, (name, data)) in seeds.iter().enumerate() {
            let report = replay_input(name, data);
            assert!(!report.verdict.is_failure(), "{}: {:?}", name, report.detail);
            assert_eq!(report.operation, Some(selector_name(i as u32 + 1)));
        }
    }

    #[test]
    fn test_fingerprint_is_crc32() {
        assert_eq!(fingerprint(b""), "00000000");
        assert_eq!(fingerprint(b"123456789"), "cbf43926");
    }

    #[test]
    fn test_replay_input_reports_operation() {
        // selector byte 12 -> null
        let report = replay_input("null", &[0, 1, 0, 0, 0, 0, 0, 0, 12]);
        assert_eq!(report.verdict, Verdict::Completed);
        assert_eq!(report.operation, Some("null"));
        assert_eq!(report.len, 9);
        assert!(report.output_len > 0);
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u32), "non-string panic payload");
    }
}
