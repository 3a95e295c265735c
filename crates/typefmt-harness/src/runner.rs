//! Test execution engine.

use typefmt_core::{FormatConfig, FormatError, WideString, format_to};

use crate::diff;
use crate::error::HarnessError;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::verify::VerificationResult;

/// Every strictness mode a runner can execute under.
pub const MODES: [&str; 5] = [
    "lenient",
    "strict-sign",
    "strict-int-size",
    "strict",
    "unchecked",
];

/// Map a mode name to its configuration.
pub fn mode_config(mode: &str) -> Result<FormatConfig, HarnessError> {
    let config = match mode.to_ascii_lowercase().as_str() {
        "lenient" => FormatConfig::lenient(),
        "strict-sign" => FormatConfig::lenient().with_strict_sign(true),
        "strict-int-size" => FormatConfig::lenient().with_strict_int_size(true),
        "strict" => FormatConfig::strict(),
        "unchecked" => FormatConfig::unchecked(),
        _ => return Err(HarnessError::UnknownMode(mode.to_string())),
    };
    Ok(config)
}

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Mode being tested.
    pub mode: String,
    config: FormatConfig,
}

impl TestRunner {
    /// Create a runner for one of [`MODES`].
    pub fn new(campaign: impl Into<String>, mode: impl Into<String>) -> Result<Self, HarnessError> {
        let mode = mode.into().to_ascii_lowercase();
        let config = mode_config(&mode)?;
        Ok(Self {
            campaign: campaign.into(),
            mode,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> FormatConfig {
        self.config
    }

    /// Run all fixtures in a set that apply to this runner's mode.
    #[must_use]
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .filter(|case| mode_matches(&self.mode, &case.mode))
            .map(|case| {
                let expected = case.expected();
                let actual = execute_case(case, self.config);
                let case_name = if is_any_mode(&case.mode) {
                    format!("{} [{}]", case.name, self.mode)
                } else {
                    case.name.clone()
                };
                let passed = actual == expected;
                VerificationResult {
                    case_name,
                    family: fixture_set.family.clone(),
                    mode: self.mode.clone(),
                    passed,
                    diff: (!passed).then(|| diff::render_diff(&expected, &actual)),
                    expected,
                    actual,
                }
            })
            .collect()
    }
}

fn is_any_mode(case_mode: &str) -> bool {
    case_mode.eq_ignore_ascii_case("all")
        || case_mode.eq_ignore_ascii_case("any")
        || case_mode.eq_ignore_ascii_case("both")
}

fn mode_matches(active_mode: &str, case_mode: &str) -> bool {
    is_any_mode(case_mode)
        || case_mode
            .split(',')
            .any(|mode| mode.trim().eq_ignore_ascii_case(active_mode))
}

/// Format a case under `config`.
pub fn render_case(case: &FixtureCase, config: FormatConfig) -> Result<String, FormatError> {
    let args = case.call_args();
    if case.wide {
        let fmt = WideString::from(case.format.as_str());
        let mut out: Vec<u32> = Vec::new();
        format_to(&mut out, fmt.as_slice(), &args, config)?;
        Ok(WideString::from(out).to_string_lossy())
    } else {
        let mut out = String::new();
        format_to(&mut out, case.format.as_bytes(), &args, config)?;
        Ok(out)
    }
}

/// The outcome string compared against [`FixtureCase::expected`].
#[must_use]
pub fn execute_case(case: &FixtureCase, config: FormatConfig) -> String {
    match render_case(case, config) {
        Ok(text) => text,
        Err(err) => format!("error:{}", err.kind().as_str()),
    }
}
