//! Owned results of the string-producing calls.

use std::fmt;

use crate::arg::{Arg, ArgValue, Category, Size, ToArg, TypeTag};
use crate::unit::wide_char;

/// Narrow text produced by `strprintf`.
///
/// Borrowing it as `&str` is explicit: call [`FormattedString::as_str`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FormattedString(String);

impl FormattedString {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for FormattedString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<FormattedString> for String {
    fn from(s: FormattedString) -> Self {
        s.0
    }
}

impl AsRef<str> for FormattedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormattedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for FormattedString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FormattedString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'a> ToArg<'a> for &'a FormattedString {
    fn to_arg(self) -> Arg<'a> {
        self.as_str().to_arg()
    }
}

/// Wide text: one `u32` per character, as produced by `wstrprintf` and used
/// for wide format strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WideString(Vec<u32>);

impl WideString {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap raw units without validation.
    #[must_use]
    pub const fn from_units(units: Vec<u32>) -> Self {
        Self(units)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode to a `String`, replacing non-scalar units with U+FFFD.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        self.0.iter().map(|&u| wide_char(u)).collect()
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        Self(s.chars().map(u32::from).collect())
    }
}

impl From<Vec<u32>> for WideString {
    fn from(units: Vec<u32>) -> Self {
        Self(units)
    }
}

impl AsRef<[u32]> for WideString {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for &unit in &self.0 {
            f.write_char(wide_char(unit))?;
        }
        Ok(())
    }
}

/// A `WideString` argument keeps its full length, embedded NULs included.
impl<'a> ToArg<'a> for &'a WideString {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(
            TypeTag::new(Size::Long, Category::WideString),
            ArgValue::Wide(self.as_slice()),
        )
    }
}
