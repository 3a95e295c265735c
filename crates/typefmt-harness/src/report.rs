//! Report generation for conformance results.

use std::fmt::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::HarnessError;
use crate::verify::VerificationSummary;

/// A fixture file that fed the run, pinned by content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureDigest {
    pub path: String,
    pub family: String,
    pub sha256: String,
    pub cases: usize,
}

impl FixtureDigest {
    /// Hash the file at `path`.
    pub fn from_file(path: &Path, family: &str, cases: usize) -> Result<Self, HarnessError> {
        let data = std::fs::read(path)?;
        Ok(Self {
            path: path.display().to_string(),
            family: family.to_string(),
            sha256: sha256_hex(&data),
            cases,
        })
    }
}

/// Lowercase hex SHA-256 of `data`.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// A conformance report over one or more modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// Modes tested, comma separated.
    pub mode: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    pub fixtures: Vec<FixtureDigest>,
    /// Verification summary.
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", self.title);
        let _ = writeln!(out, "- Mode: {}", self.mode);
        let _ = writeln!(out, "- Timestamp: {}", self.timestamp);
        let _ = writeln!(out, "- Total: {}", self.summary.total);
        let _ = writeln!(out, "- Passed: {}", self.summary.passed);
        let _ = writeln!(out, "- Failed: {}\n", self.summary.failed);

        if !self.fixtures.is_empty() {
            out.push_str("| Fixture | Family | Cases | SHA-256 |\n");
            out.push_str("|---------|--------|-------|---------|\n");
            for f in &self.fixtures {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | `{}` |",
                    f.path, f.family, f.cases, f.sha256
                );
            }
            out.push('\n');
        }

        out.push_str("| Case | Family | Mode | Status |\n");
        out.push_str("|------|--------|------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {status} |",
                escape_cell(&r.case_name),
                r.family,
                r.mode
            );
        }

        let failures: Vec<_> = self.summary.failures().collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                let _ = writeln!(out, "\n### {} ({})\n", r.case_name, r.mode);
                let _ = writeln!(out, "```diff\n{}```", r.diff.as_deref().unwrap_or(""));
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
