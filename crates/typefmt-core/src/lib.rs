//! # typefmt-core
//!
//! Type-checked printf-style formatting into growable sinks.
//!
//! Every argument carries a type tag. Each `%` directive is checked against
//! the tag of the argument it consumes, and the argument count must match the
//! directive count exactly. Output goes to a [`Sink`] (a `Vec`, a `String`,
//! or any [`std::io::Write`] through [`IoSink`]); no fixed-size buffer is ever
//! involved.
//!
//! Mismatches are programmer errors. The plain API ([`oprintf`],
//! [`strprintf`], the macros) panics on them; the `try_*` API returns them as
//! [`FormatError`].
//!
//! ```
//! use typefmt_core::{strprintf, try_strprintf, ToArg, ErrorKind};
//!
//! let s = strprintf!("%-6s|%5.1f|%#x", "load", 2.718_f64, 255_u32);
//! assert_eq!(s.as_str(), "load  |  2.7|0xff");
//!
//! let err = try_strprintf("%s", &[42_i32.to_arg()]).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::TypeMismatch);
//! ```

#![deny(unsafe_code)]

pub mod arg;
pub mod config;
pub mod directive;
pub mod error;
mod macros;
pub mod matrix;
pub mod metrics;
pub mod printf;
pub mod render;
pub mod sink;
pub mod text;
pub mod unit;

use std::io;

pub use arg::{Arg, ArgValue, Category, Size, ToArg, TypeTag};
pub use config::{CheckLevel, FormatConfig, global_config};
pub use directive::{DIRECTIVE_CAPACITY, Directive, FormatFlags};
pub use error::{ErrorKind, FormatError, MalformedReason, MismatchReason};
pub use matrix::{CompatibilityMatrix, compatibility_matrix};
pub use metrics::{FormatMetrics, MetricsSnapshot, global_metrics};
pub use printf::{Printf, RENDER_MARGIN, check_structure, format_to};
pub use sink::{IoSink, Sink};
pub use text::{FormattedString, WideString};
pub use unit::{CharWidth, FmtUnit};

/// Format narrow `fmt` into `sink`.
pub fn try_oprintf<S: Sink<u8> + ?Sized>(
    sink: &mut S,
    fmt: &str,
    args: &[Arg<'_>],
) -> Result<(), FormatError> {
    format_to(sink, fmt.as_bytes(), args, global_config())
}

/// Format wide `fmt` into `sink`.
pub fn try_woprintf<S, F>(sink: &mut S, fmt: &F, args: &[Arg<'_>]) -> Result<(), FormatError>
where
    S: Sink<u32> + ?Sized,
    F: AsRef<[u32]> + ?Sized,
{
    format_to(sink, fmt.as_ref(), args, global_config())
}

/// Format narrow `fmt` into a new string.
pub fn try_strprintf(fmt: &str, args: &[Arg<'_>]) -> Result<FormattedString, FormatError> {
    let mut out: Vec<u8> = Vec::with_capacity(fmt.len());
    try_oprintf(&mut out, fmt, args)?;
    let text = String::from_utf8(out)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());
    Ok(FormattedString::from(text))
}

/// Format wide `fmt` into a new wide string.
pub fn try_wstrprintf<F>(fmt: &F, args: &[Arg<'_>]) -> Result<WideString, FormatError>
where
    F: AsRef<[u32]> + ?Sized,
{
    let mut out: Vec<u32> = Vec::with_capacity(fmt.as_ref().len());
    try_woprintf(&mut out, fmt, args)?;
    Ok(WideString::from(out))
}

/// Like [`try_oprintf`], panicking on programmer errors. Sink failures are
/// returned.
#[track_caller]
pub fn oprintf<S: Sink<u8> + ?Sized>(sink: &mut S, fmt: &str, args: &[Arg<'_>]) -> io::Result<()> {
    match try_oprintf(sink, fmt, args) {
        Ok(()) => Ok(()),
        Err(FormatError::Sink(err)) => Err(err),
        Err(err) => panic!("{err}"),
    }
}

/// Like [`try_woprintf`], panicking on programmer errors. Sink failures are
/// returned.
#[track_caller]
pub fn woprintf<S, F>(sink: &mut S, fmt: &F, args: &[Arg<'_>]) -> io::Result<()>
where
    S: Sink<u32> + ?Sized,
    F: AsRef<[u32]> + ?Sized,
{
    match try_woprintf(sink, fmt, args) {
        Ok(()) => Ok(()),
        Err(FormatError::Sink(err)) => Err(err),
        Err(err) => panic!("{err}"),
    }
}

/// Like [`try_strprintf`], panicking on programmer errors.
#[track_caller]
#[must_use]
pub fn strprintf(fmt: &str, args: &[Arg<'_>]) -> FormattedString {
    match try_strprintf(fmt, args) {
        Ok(s) => s,
        Err(err) => panic!("{err}"),
    }
}

/// Like [`try_wstrprintf`], panicking on programmer errors.
#[track_caller]
#[must_use]
pub fn wstrprintf<F>(fmt: &F, args: &[Arg<'_>]) -> WideString
where
    F: AsRef<[u32]> + ?Sized,
{
    match try_wstrprintf(fmt, args) {
        Ok(s) => s,
        Err(err) => panic!("{err}"),
    }
}
