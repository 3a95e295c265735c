//! Fixture loading and management.

use std::path::Path;

use serde::{Deserialize, Serialize};
use typefmt_core::{Arg, ErrorKind, ToArg, WideString};

use crate::error::HarnessError;

/// One formatting argument, tagged with the Rust type it stands for.
///
/// Serialized as `{"type": "i32", "value": 42}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FixtureArg {
    I16(i16),
    I32(i32),
    Isize(isize),
    I64(i64),
    U16(u16),
    U32(u32),
    Usize(usize),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    /// A C `char`.
    Byte(u8),
    /// A wide character.
    Char(char),
    Str(String),
    #[serde(with = "wide_text")]
    Wide(WideString),
    /// A raw address, formatted as a pointer.
    Ptr(usize),
}

impl FixtureArg {
    /// Borrow as a formatting argument.
    #[must_use]
    pub fn to_arg(&self) -> Arg<'_> {
        match self {
            Self::I16(v) => v.to_arg(),
            Self::I32(v) => v.to_arg(),
            Self::Isize(v) => v.to_arg(),
            Self::I64(v) => v.to_arg(),
            Self::U16(v) => v.to_arg(),
            Self::U32(v) => v.to_arg(),
            Self::Usize(v) => v.to_arg(),
            Self::U64(v) => v.to_arg(),
            Self::F32(v) => v.to_arg(),
            Self::F64(v) => v.to_arg(),
            Self::Bool(v) => v.to_arg(),
            Self::Byte(v) => v.to_arg(),
            Self::Char(v) => v.to_arg(),
            Self::Str(v) => v.as_str().to_arg(),
            Self::Wide(v) => v.to_arg(),
            Self::Ptr(addr) => std::ptr::without_provenance::<u8>(*addr).to_arg(),
        }
    }

    /// The `type` tag used in fixture JSON.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::Isize(_) => "isize",
            Self::I64(_) => "i64",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::Usize(_) => "usize",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::Char(_) => "char",
            Self::Str(_) => "str",
            Self::Wide(_) => "wide",
            Self::Ptr(_) => "ptr",
        }
    }

    /// Parse the command-line form `type:value`, e.g. `i32:-7`, `str:hello`,
    /// `ptr:0x1000`.
    pub fn parse_cli(input: &str) -> Result<Self, HarnessError> {
        let (ty, raw) = input
            .split_once(':')
            .ok_or_else(|| HarnessError::invalid_arg(input, "expected <type>:<value>"))?;
        let bad = |err: &dyn std::fmt::Display| HarnessError::invalid_arg(input, err.to_string());

        let arg = match ty {
            "i16" => Self::I16(raw.parse().map_err(|e| bad(&e))?),
            "i32" => Self::I32(raw.parse().map_err(|e| bad(&e))?),
            "isize" => Self::Isize(raw.parse().map_err(|e| bad(&e))?),
            "i64" => Self::I64(raw.parse().map_err(|e| bad(&e))?),
            "u16" => Self::U16(raw.parse().map_err(|e| bad(&e))?),
            "u32" => Self::U32(raw.parse().map_err(|e| bad(&e))?),
            "usize" => Self::Usize(raw.parse().map_err(|e| bad(&e))?),
            "u64" => Self::U64(raw.parse().map_err(|e| bad(&e))?),
            "f32" => Self::F32(raw.parse().map_err(|e| bad(&e))?),
            "f64" => Self::F64(raw.parse().map_err(|e| bad(&e))?),
            "bool" => Self::Bool(raw.parse().map_err(|e| bad(&e))?),
            "byte" => match raw.as_bytes() {
                [b] => Self::Byte(*b),
                _ => Self::Byte(raw.parse().map_err(|e| bad(&e))?),
            },
            "char" => Self::Char(raw.parse().map_err(|e| bad(&e))?),
            "str" => Self::Str(raw.to_string()),
            "wide" => Self::Wide(WideString::from(raw)),
            "ptr" => Self::Ptr(parse_address(raw).map_err(|e| bad(&e))?),
            other => {
                return Err(HarnessError::invalid_arg(
                    input,
                    format!("unknown type '{other}'"),
                ));
            }
        };
        Ok(arg)
    }
}

fn parse_address(raw: &str) -> Result<usize, std::num::ParseIntError> {
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => raw.parse(),
    }
}

mod wide_text {
    use serde::{Deserialize, Deserializer, Serializer};
    use typefmt_core::WideString;

    pub fn serialize<S: Serializer>(value: &WideString, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string_lossy())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<WideString, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(WideString::from(text.as_str()))
    }
}

fn default_mode() -> String {
    String::from("all")
}

/// A single fixture test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// The format string.
    pub format: String,
    /// Run the format as wide text into a wide sink.
    #[serde(default)]
    pub wide: bool,
    #[serde(default)]
    pub args: Vec<FixtureArg>,
    /// Strictness mode the case applies to (`all` for every mode).
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Rendered text on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    /// Error kind name (`type_mismatch`, ...) on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
}

impl FixtureCase {
    /// The expected outcome in the form the runner reports actual outcomes:
    /// the rendered text, or `error:<kind>`.
    #[must_use]
    pub fn expected(&self) -> String {
        match (&self.expected_error, &self.expected_output) {
            (Some(kind), _) => format!("error:{kind}"),
            (None, Some(text)) => text.clone(),
            (None, None) => String::from("<no expectation>"),
        }
    }

    /// The expected error kind, if the case expects one and names it
    /// correctly.
    #[must_use]
    pub fn expected_error_kind(&self) -> Option<ErrorKind> {
        self.expected_error.as_deref().and_then(ErrorKind::from_name)
    }

    /// Borrow the arguments for a formatting call.
    #[must_use]
    pub fn call_args(&self) -> Vec<Arg<'_>> {
        self.args.iter().map(FixtureArg::to_arg).collect()
    }
}

/// A collection of fixture cases for one family of directives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Family name (`integers`, `floats`, ...).
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
