//! Check configuration.
//!
//! The configuration is process-wide and resolved once. Compiled defaults come
//! from cargo features (`strict-sign`, `strict-int-size`, `unchecked`); the
//! environment may override them on first use:
//! - `TYPEFMT_MODE`: `checked` (default) validates every directive against its
//!   argument; `off` skips type and argument-count checks.
//! - `TYPEFMT_STRICT_SIGN`: `1`/`0` (also `true`/`false`, `on`/`off`).
//! - `TYPEFMT_STRICT_INT_SIZE`: same values.
//!
//! Building with the `unchecked` feature pins the level to `Off`; the
//! environment cannot turn checks back on.

use std::sync::OnceLock;

/// Environment variable selecting the check level.
pub const ENV_MODE: &str = "TYPEFMT_MODE";
/// Environment variable toggling strict signedness checks.
pub const ENV_STRICT_SIGN: &str = "TYPEFMT_STRICT_SIGN";
/// Environment variable toggling strict `int`/`long` size checks.
pub const ENV_STRICT_INT_SIZE: &str = "TYPEFMT_STRICT_INT_SIZE";

/// How much of the argument validation runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckLevel {
    /// Every directive is checked against its argument, and the argument
    /// count must match the directive count.
    #[default]
    Checked,
    /// No type or count validation. Mismatched values render best-effort.
    Off,
}

impl CheckLevel {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// `Checked`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" | "disabled" | "unchecked" | "release" => Self::Off,
            _ => Self::Checked,
        }
    }

    /// Returns true if validation is active at this level.
    #[must_use]
    pub const fn validation_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Stable lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checked => "checked",
            Self::Off => "off",
        }
    }
}

/// Strictness options shared by every formatting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatConfig {
    /// Check level.
    pub level: CheckLevel,
    /// Signed conversions (`d i`) reject unsigned arguments and `u` rejects
    /// signed ones.
    pub strict_sign: bool,
    /// A directive without a size marker requires an `int`-sized argument and
    /// `l` requires a `long`-sized one.
    pub strict_int_size: bool,
}

impl FormatConfig {
    /// Configuration selected by cargo features alone.
    #[must_use]
    pub const fn compiled() -> Self {
        Self {
            level: if cfg!(feature = "unchecked") {
                CheckLevel::Off
            } else {
                CheckLevel::Checked
            },
            strict_sign: cfg!(feature = "strict-sign"),
            strict_int_size: cfg!(feature = "strict-int-size"),
        }
    }

    /// Checked, with both strictness options disabled.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            level: CheckLevel::Checked,
            strict_sign: false,
            strict_int_size: false,
        }
    }

    /// Checked, with both strictness options enabled.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            level: CheckLevel::Checked,
            strict_sign: true,
            strict_int_size: true,
        }
    }

    /// No validation.
    #[must_use]
    pub const fn unchecked() -> Self {
        Self {
            level: CheckLevel::Off,
            strict_sign: false,
            strict_int_size: false,
        }
    }

    #[must_use]
    pub const fn with_level(mut self, level: CheckLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub const fn with_strict_sign(mut self, on: bool) -> Self {
        self.strict_sign = on;
        self
    }

    #[must_use]
    pub const fn with_strict_int_size(mut self, on: bool) -> Self {
        self.strict_int_size = on;
        self
    }

    /// Returns true if type and argument-count checks run.
    ///
    /// Always false when built with the `unchecked` feature, so the checks
    /// are compiled out.
    #[must_use]
    pub const fn validation_enabled(&self) -> bool {
        !cfg!(feature = "unchecked") && self.level.validation_enabled()
    }

    /// Apply overrides from a variable lookup on top of `base`.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    #[must_use]
    pub fn with_overrides(base: Self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = base;
        if let Some(mode) = lookup(ENV_MODE) {
            config.level = CheckLevel::from_str_loose(&mode);
        }
        if let Some(on) = lookup(ENV_STRICT_SIGN).as_deref().and_then(parse_switch) {
            config.strict_sign = on;
        }
        if let Some(on) = lookup(ENV_STRICT_INT_SIZE)
            .as_deref()
            .and_then(parse_switch)
        {
            config.strict_int_size = on;
        }
        if cfg!(feature = "unchecked") {
            config.level = CheckLevel::Off;
        }
        config
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::compiled()
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

static GLOBAL_CONFIG: OnceLock<FormatConfig> = OnceLock::new();

/// Get the process-wide configuration (reads the environment on first call,
/// caches thereafter).
#[must_use]
pub fn global_config() -> FormatConfig {
    *GLOBAL_CONFIG.get_or_init(|| {
        FormatConfig::with_overrides(FormatConfig::compiled(), |key| std::env::var(key).ok())
    })
}
