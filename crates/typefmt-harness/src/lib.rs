//! Conformance testing harness for typefmt.
//!
//! This crate provides:
//! - Fixture capture: render cases through the host C library's `snprintf`
//! - Fixture verify: run fixture sets under each strictness mode
//! - Report generation: human-readable + machine-readable conformance reports
//! - Structured JSONL logging of every verified case

#![deny(unsafe_code)]

pub mod capture;
pub mod diff;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureArg, FixtureCase, FixtureSet};
pub use report::{ConformanceReport, FixtureDigest};
pub use runner::{MODES, TestRunner, mode_config};
pub use verify::{VerificationResult, VerificationSummary};

use std::path::{Path, PathBuf};

/// Sorted `*.json` files directly under `dir`.
pub fn fixture_paths(dir: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Resolve a `--mode` value to runner modes; `all` expands to [`MODES`].
pub fn expand_modes(mode: &str) -> Result<Vec<&'static str>, HarnessError> {
    if mode.eq_ignore_ascii_case("all") {
        return Ok(MODES.to_vec());
    }
    MODES
        .iter()
        .copied()
        .find(|m| m.eq_ignore_ascii_case(mode))
        .map(|m| vec![m])
        .ok_or_else(|| HarnessError::UnknownMode(mode.to_string()))
}
