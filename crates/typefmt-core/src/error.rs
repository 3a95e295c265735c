//! Formatting errors.
//!
//! Everything except [`FormatError::Sink`] is a programmer error: the format
//! string and the argument list disagree. The panicking API turns those into
//! panics; the `try_*` API hands them back for tooling.

use std::io;

use thiserror::Error;

use crate::arg::{Size, TypeTag};

/// Why a format string could not be scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("format string ends with an unmatched '%'")]
    TrailingPercent,
    #[error("format string ends before the conversion character")]
    MissingConversion,
    #[error("unknown conversion character {0:?}")]
    UnknownConversion(char),
    #[error("directive does not fit the {capacity}-unit scratch buffer", capacity = crate::directive::DIRECTIVE_CAPACITY)]
    DirectiveTooLong,
    #[error("width or precision exceeds {max}", max = i32::MAX)]
    FieldOverflow,
}

/// Which compatibility rule an argument broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MismatchReason {
    #[error("string arguments printed with %p take no size marker")]
    PointerSizeMarker,
    #[error("size marker does not match the argument size")]
    SizeClass,
    #[error("conversion is not legal for the argument category")]
    Conversion,
}

/// Classification of a [`FormatError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedFormat,
    TypeMismatch,
    ArgumentCountMismatch,
    Sink,
}

impl ErrorKind {
    pub const ALL: [Self; 4] = [
        Self::MalformedFormat,
        Self::TypeMismatch,
        Self::ArgumentCountMismatch,
        Self::Sink,
    ];

    /// Stable snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedFormat => "malformed_format",
            Self::TypeMismatch => "type_mismatch",
            Self::ArgumentCountMismatch => "argument_count_mismatch",
            Self::Sink => "sink",
        }
    }

    /// Inverse of [`ErrorKind::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Error raised by a formatting call.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("printf: malformed format string at offset {position}: {reason}")]
    MalformedFormat {
        /// Offset of the offending `%`.
        position: usize,
        reason: MalformedReason,
    },

    #[error(
        "printf: type mismatch at offset {position}: directive \"{directive}\" cannot format argument {index} ({actual}): {reason}"
    )]
    TypeMismatch {
        /// Offset of the directive's `%`.
        position: usize,
        /// Directive text, `%` through conversion character.
        directive: String,
        /// Resolved size class of the directive.
        size: Size,
        conversion: char,
        /// Zero-based argument index.
        index: usize,
        actual: TypeTag,
        reason: MismatchReason,
    },

    #[error("printf: too few arguments: {supplied} supplied, next directive at offset {position}")]
    TooFewArguments { supplied: usize, position: usize },

    #[error("printf: too many arguments: argument {index} has no directive")]
    TooManyArguments { index: usize },

    #[error("printf: sink write failed: {0}")]
    Sink(#[from] io::Error),
}

impl FormatError {
    pub(crate) const fn malformed(position: usize, reason: MalformedReason) -> Self {
        Self::MalformedFormat { position, reason }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedFormat { .. } => ErrorKind::MalformedFormat,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::TooFewArguments { .. } | Self::TooManyArguments { .. } => {
                ErrorKind::ArgumentCountMismatch
            }
            Self::Sink(_) => ErrorKind::Sink,
        }
    }

    /// Returns true for programmer errors (everything but sink failures).
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Sink(_))
    }

    /// Offset into the format string the error refers to, if any.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::MalformedFormat { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::TooFewArguments { position, .. } => Some(*position),
            Self::TooManyArguments { .. } | Self::Sink(_) => None,
        }
    }
}
