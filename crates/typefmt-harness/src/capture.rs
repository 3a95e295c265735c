//! Host C library fixture capture.
//!
//! Renders narrow fixture cases through the host `snprintf` so the expected
//! outputs can be checked against a reference implementation. A format is
//! split into segments holding at most one directive, and each segment is
//! rendered with its own argument. `I64` becomes `ll` and `L` becomes `l`
//! on the way to C. Wide text, wide characters, error cases and arguments
//! whose C type differs from what the directive reads are skipped.

use std::ffi::{CString, c_char, c_int};

use typefmt_core::directive::parse_directive;
use typefmt_core::{CompatibilityMatrix, Size, check_structure};

use crate::error::HarnessError;
use crate::fixtures::{FixtureArg, FixtureCase, FixtureSet};

/// `int` and `long` differ in width on LP64 hosts, so only exact size
/// markers are passed through to C.
const HOST_MATRIX: CompatibilityMatrix = CompatibilityMatrix::new(false, true);

/// An argument converted to the C type `snprintf` reads it as.
enum HostArg {
    Int(c_int),
    UInt(libc::c_uint),
    Long(libc::c_long),
    ULong(libc::c_ulong),
    LongLong(libc::c_longlong),
    ULongLong(libc::c_ulonglong),
    Double(libc::c_double),
    Str(CString),
    Ptr(*const libc::c_void),
}

impl HostArg {
    fn from_fixture(name: &str, arg: &FixtureArg) -> Result<Self, HarnessError> {
        let host = match arg {
            FixtureArg::I16(v) => Self::Int(c_int::from(*v)),
            FixtureArg::I32(v) => Self::Int(*v),
            FixtureArg::Isize(v) => Self::Long(*v as libc::c_long),
            FixtureArg::I64(v) => Self::LongLong(*v),
            FixtureArg::U16(v) => Self::UInt(libc::c_uint::from(*v)),
            FixtureArg::U32(v) => Self::UInt(*v),
            FixtureArg::Usize(v) => Self::ULong(*v as libc::c_ulong),
            FixtureArg::U64(v) => Self::ULongLong(*v),
            FixtureArg::F32(v) => Self::Double(f64::from(*v)),
            FixtureArg::F64(v) => Self::Double(*v),
            FixtureArg::Bool(v) => Self::Int(c_int::from(*v)),
            FixtureArg::Byte(v) => Self::Int(c_int::from(*v)),
            FixtureArg::Str(s) => Self::Str(
                CString::new(s.as_str())
                    .map_err(|_| HarnessError::unsupported(name, "string contains NUL"))?,
            ),
            FixtureArg::Ptr(addr) => Self::Ptr(std::ptr::without_provenance(*addr)),
            FixtureArg::Char(_) | FixtureArg::Wide(_) => {
                return Err(HarnessError::unsupported(
                    name,
                    format!("{} arguments need a wide-character locale", arg.type_name()),
                ));
            }
        };
        Ok(host)
    }
}

/// Render `case` through the host `snprintf`.
pub fn capture_case(case: &FixtureCase) -> Result<String, HarnessError> {
    let name = case.name.as_str();
    if case.wide {
        return Err(HarnessError::unsupported(name, "wide format"));
    }
    if case.expected_error.is_some() {
        return Err(HarnessError::unsupported(name, "case expects an error"));
    }

    let fmt = case.format.as_bytes();
    check_structure(fmt)?;

    let mut out = Vec::new();
    let mut args = case.args.iter();
    let mut segment: Vec<u8> = Vec::new();
    let mut pos = 0;
    while pos < fmt.len() {
        if fmt[pos] != b'%' {
            segment.push(fmt[pos]);
            pos += 1;
            continue;
        }
        if fmt.get(pos + 1) == Some(&b'%') {
            segment.extend_from_slice(b"%%");
            pos += 2;
            continue;
        }

        let parsed = parse_directive::<u8>(fmt, pos)?;
        let text = parsed.text.as_slice();
        let conversion = parsed.directive.conversion;
        if text.iter().any(|&b| b == b'C' || b == b'S')
            || (matches!(conversion, b'c' | b's') && parsed.directive.size == Size::Long)
        {
            return Err(HarnessError::unsupported(name, "wide-character directive"));
        }
        segment.extend_from_slice(&c_directive(text));

        let arg = args.next().ok_or_else(|| {
            HarnessError::unsupported(name, "fewer arguments than directives")
        })?;
        if HOST_MATRIX
            .check(arg.to_arg().tag(), parsed.directive.size, conversion)
            .is_err()
        {
            return Err(HarnessError::unsupported(
                name,
                format!("{} argument for %{}", arg.type_name(), char::from(conversion)),
            ));
        }
        let host = HostArg::from_fixture(name, arg)?;
        out.extend(host_snprintf(name, &segment, Some(&host))?);
        segment.clear();
        pos = parsed.end;
    }
    if args.next().is_some() {
        return Err(HarnessError::unsupported(name, "more arguments than directives"));
    }
    if !segment.is_empty() {
        out.extend(host_snprintf(name, &segment, None)?);
    }

    String::from_utf8(out).map_err(|_| HarnessError::HostFailure(name.to_string()))
}

/// Re-derive every capturable expected output in `set` from the host.
/// Returns the updated set and the `(case, reason)` pairs that were skipped.
#[must_use]
pub fn capture_set(set: &FixtureSet, captured_at: &str) -> (FixtureSet, Vec<(String, String)>) {
    let mut captured = set.clone();
    captured.captured_at = captured_at.to_string();
    let mut skipped = Vec::new();
    for case in &mut captured.cases {
        match capture_case(case) {
            Ok(text) => case.expected_output = Some(text),
            Err(err) => skipped.push((case.name.clone(), err.to_string())),
        }
    }
    (captured, skipped)
}

/// Spell a directive the way C reads it.
fn c_directive(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 1);
    let mut i = 0;
    while i < text.len() {
        if text[i..].starts_with(b"I64") {
            out.extend_from_slice(b"ll");
            i += 3;
        } else {
            out.push(if text[i] == b'L' { b'l' } else { text[i] });
            i += 1;
        }
    }
    out
}

/// Call `snprintf` twice: once to size the output, once to fill it.
fn sized_call(call: impl Fn(*mut c_char, usize) -> c_int) -> Option<Vec<u8>> {
    let needed = usize::try_from(call(std::ptr::null_mut(), 0)).ok()?;
    let mut buf = vec![0u8; needed + 1];
    let written = usize::try_from(call(buf.as_mut_ptr().cast(), buf.len())).ok()?;
    buf.truncate(written.min(needed));
    Some(buf)
}

#[allow(unsafe_code)]
fn host_snprintf(
    name: &str,
    segment: &[u8],
    arg: Option<&HostArg>,
) -> Result<Vec<u8>, HarnessError> {
    let fmt = CString::new(segment)
        .map_err(|_| HarnessError::unsupported(name, "format contains NUL"))?;
    let f = fmt.as_ptr();
    // SAFETY: `f` is a NUL-terminated format holding at most one directive,
    // and the argument passed has the C type that directive reads.
    // `sized_call` passes either a null buffer with size 0 or a buffer of
    // exactly the size given.
    let rendered = match arg {
        None => sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f) }),
        Some(HostArg::Int(v)) => {
            sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f, *v) })
        }
        Some(HostArg::UInt(v)) => {
            sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f, *v) })
        }
        Some(HostArg::Long(v)) => {
            sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f, *v) })
        }
        Some(HostArg::ULong(v)) => {
            sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f, *v) })
        }
        Some(HostArg::LongLong(v)) => {
            sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f, *v) })
        }
        Some(HostArg::ULongLong(v)) => {
            sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f, *v) })
        }
        Some(HostArg::Double(v)) => {
            sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f, *v) })
        }
        Some(HostArg::Str(s)) => {
            let p = s.as_ptr();
            sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f, p) })
        }
        Some(HostArg::Ptr(p)) => {
            sized_call(|buf, len| unsafe { libc::snprintf(buf, len, f, *p) })
        }
    };
    rendered.ok_or_else(|| HarnessError::HostFailure(name.to_string()))
}
