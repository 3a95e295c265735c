//! CLI entrypoint for the typefmt conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use typefmt_harness::structured_log::{LogEmitter, LogLevel, now_utc};
use typefmt_harness::{
    ConformanceReport, FixtureArg, FixtureCase, FixtureDigest, FixtureSet, HarnessError,
    TestRunner, VerificationSummary, capture, expand_modes, fixture_paths, mode_config, runner,
};

/// Conformance tooling for typefmt.
#[derive(Debug, Parser)]
#[command(name = "typefmt-harness")]
#[command(about = "Conformance testing harness for typefmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run fixture sets and report the results.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Strictness mode, or `all`.
        #[arg(long, default_value = "all")]
        mode: String,
        /// Output report path (markdown; JSON is written alongside).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Re-derive expected outputs from the host C library.
    Capture {
        /// Input fixture JSON file.
        #[arg(long)]
        fixture: PathBuf,
        /// Output fixture JSON file.
        #[arg(long)]
        output: PathBuf,
    },
    /// Format one call and print the result.
    Render {
        /// Format string.
        format: String,
        /// Arguments as `<type>:<value>` (e.g. `i32:-7`, `str:hi`, `f64:2.5`).
        args: Vec<String>,
        /// Strictness mode.
        #[arg(long, default_value = "lenient")]
        mode: String,
        /// Format as wide text.
        #[arg(long)]
        wide: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            mode,
            report,
            log,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let modes = expand_modes(&mode)?;

            let mut fixture_sets = Vec::new();
            let mut digests = Vec::new();
            for path in fixture_paths(&fixture)? {
                match FixtureSet::from_file(&path) {
                    Ok(set) => {
                        digests.push(FixtureDigest::from_file(&path, &set.family, set.cases.len())?);
                        fixture_sets.push(set);
                    }
                    Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
                }
            }
            if fixture_sets.is_empty() {
                return Err(HarnessError::NoFixtures(fixture.display().to_string()).into());
            }

            let mut results = Vec::new();
            for mode in &modes {
                let runner = TestRunner::new("fixture-verify", *mode)?;
                for set in &fixture_sets {
                    results.extend(runner.run(set));
                }
            }

            if let Some(log_path) = log {
                let mut emitter = LogEmitter::to_file(&log_path, "verify")?;
                emitter.emit(LogLevel::Info, "verify_start")?;
                emitter.emit_results(&results)?;
                emitter.emit(LogLevel::Info, "verify_end")?;
                emitter.flush()?;
                eprintln!("Wrote log to {}", log_path.display());
            }

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("typefmt Conformance Report"),
                mode: modes.join(","),
                timestamp: now_utc(),
                fixtures: digests,
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            for failure in report_doc.summary.failures() {
                eprintln!("FAIL {} ({})", failure.case_name, failure.mode);
                if let Some(diff) = &failure.diff {
                    eprint!("{diff}");
                }
            }

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(&report_path, report_doc.to_markdown())?;
                std::fs::write(report_path.with_extension("json"), report_doc.to_json())?;
            }

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::Capture { fixture, output } => {
            let set = FixtureSet::from_file(&fixture)?;
            let (captured, skipped) = capture::capture_set(&set, &now_utc());
            for (name, reason) in &skipped {
                eprintln!("Skipped {name}: {reason}");
            }
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, captured.to_json()?)?;
            eprintln!(
                "Captured {} of {} cases to {}",
                set.cases.len() - skipped.len(),
                set.cases.len(),
                output.display()
            );
        }
        Command::Render {
            format,
            args,
            mode,
            wide,
        } => {
            let config = mode_config(&mode)?;
            let args = args
                .iter()
                .map(|input| FixtureArg::parse_cli(input))
                .collect::<Result<Vec<_>, _>>()?;
            let case = FixtureCase {
                name: String::from("cli"),
                format,
                wide,
                args,
                mode,
                expected_output: None,
                expected_error: None,
            };
            let text = runner::render_case(&case, config)?;
            println!("{text}");
        }
    }

    Ok(())
}
