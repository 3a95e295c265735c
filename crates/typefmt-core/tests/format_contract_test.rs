//! Integration test: formatting contract
//!
//! End-to-end behavior of the public API: argument-count matching, `%%`
//! escapes, trailing `%`, round-trip rendering, mismatch detection, width vs.
//! string length, sinks, and the panicking wrappers.
//!
//! Run: cargo test -p typefmt-core --test format_contract_test

use std::io;

use typefmt_core::{
    Arg, ErrorKind, FormatConfig, FormatError, IoSink, MalformedReason, Printf, ToArg, WideString,
    format_to, global_metrics, oprintf, strprintf, try_strprintf, try_wstrprintf, wstrprintf,
};

fn lenient(fmt: &str, args: &[Arg<'_>]) -> Result<String, FormatError> {
    let mut out = String::new();
    format_to(&mut out, fmt.as_bytes(), args, FormatConfig::lenient())?;
    Ok(out)
}

// -----------------------------------------------------------------
// 1. Argument count
// -----------------------------------------------------------------

#[test]
fn exact_argument_count_succeeds() {
    let out = lenient("%d + %d = %d", &[1_i32.to_arg(), 2_i32.to_arg(), 3_i32.to_arg()]).unwrap();
    assert_eq!(out, "1 + 2 = 3");
}

#[test]
fn one_argument_short_is_too_few() {
    let err = lenient("%d + %d = %d", &[1_i32.to_arg(), 2_i32.to_arg()]).unwrap_err();
    assert!(matches!(err, FormatError::TooFewArguments { supplied: 2, .. }));
    assert_eq!(err.kind(), ErrorKind::ArgumentCountMismatch);
}

#[test]
fn one_argument_over_is_too_many() {
    let args = [1_i32.to_arg(), 2_i32.to_arg(), 3_i32.to_arg(), 4_i32.to_arg()];
    let err = lenient("%d + %d = %d", &args).unwrap_err();
    assert!(matches!(err, FormatError::TooManyArguments { index: 3 }));
    assert_eq!(err.kind(), ErrorKind::ArgumentCountMismatch);
}

#[test]
fn no_directives_no_arguments() {
    assert_eq!(lenient("plain text", &[]).unwrap(), "plain text");
    assert_eq!(lenient("", &[]).unwrap(), "");
    assert!(lenient("plain", &[1_i32.to_arg()]).is_err());
}

// -----------------------------------------------------------------
// 2. Escapes and malformed formats
// -----------------------------------------------------------------

#[test]
fn percent_escape_renders_single_percent() {
    assert_eq!(lenient("%%", &[]).unwrap(), "%");
    assert_eq!(lenient("%%%%", &[]).unwrap(), "%%");
    assert_eq!(lenient("a%%b%dc%%", &[5_i32.to_arg()]).unwrap(), "a%b5c%");
}

#[test]
fn trailing_percent_is_malformed_for_any_arguments() {
    let cases: [&[Arg<'_>]; 3] = [&[], &[1_i32.to_arg()], &[1_i32.to_arg(), "x".to_arg()]];
    for args in cases {
        for fmt in ["%", "abc%", "%d%", "%%%"] {
            let err = lenient(fmt, args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedFormat, "{fmt:?}");
        }
    }
}

#[test]
fn malformed_reasons() {
    let reason = |fmt: &str, args: &[Arg<'_>]| match lenient(fmt, args) {
        Err(FormatError::MalformedFormat { reason, .. }) => reason,
        other => panic!("{fmt:?}: expected malformed format, got {other:?}"),
    };
    assert_eq!(reason("%", &[]), MalformedReason::TrailingPercent);
    assert_eq!(reason("%-5", &[1_i32.to_arg()]), MalformedReason::MissingConversion);
    assert_eq!(reason("%k", &[1_i32.to_arg()]), MalformedReason::UnknownConversion('k'));
    assert_eq!(
        reason("%99999999999d", &[1_i32.to_arg()]),
        MalformedReason::FieldOverflow
    );
    let long = format!("%{}d", "+".repeat(40));
    assert_eq!(reason(&long, &[1_i32.to_arg()]), MalformedReason::DirectiveTooLong);
}

// -----------------------------------------------------------------
// 3. Round trips
// -----------------------------------------------------------------

#[test]
fn int_round_trip() {
    assert_eq!(lenient("%d", &[42_i32.to_arg()]).unwrap(), "42");
}

#[test]
fn float_width_precision_round_trip() {
    assert_eq!(lenient("%5.2f", &[3.14159_f64.to_arg()]).unwrap(), " 3.14");
}

#[test]
fn mixed_directives() {
    let name = String::from("disk");
    let out = lenient(
        "[%-6s] %3u%% used, %+.1e bytes free, flag=%c",
        &[(&name).to_arg(), 87_u32.to_arg(), 1.5e9_f64.to_arg(), b'y'.to_arg()],
    )
    .unwrap();
    assert_eq!(out, "[disk  ]  87% used, +1.5e+09 bytes free, flag=y");
}

// -----------------------------------------------------------------
// 4. Mismatch detection
// -----------------------------------------------------------------

#[test]
fn string_directive_rejects_int() {
    let err = lenient("%s", &[42_i32.to_arg()]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn string_directive_without_argument_is_count_mismatch() {
    let err = lenient("%s", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentCountMismatch);
}

#[test]
fn first_failing_directive_is_reported_with_offset() {
    let err = lenient("ok=%d bad=%f", &[1_i32.to_arg(), 2_i32.to_arg()]).unwrap_err();
    match err {
        FormatError::TypeMismatch {
            position,
            index,
            directive,
            ..
        } => {
            assert_eq!(position, 10);
            assert_eq!(index, 1);
            assert_eq!(directive, "%f");
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
}

#[test]
fn float_directive_rejects_pointer_and_text() {
    let x = 1_u8;
    let p: *const u8 = &x;
    assert!(lenient("%f", &[p.to_arg()]).is_err());
    assert!(lenient("%f", &["1.0".to_arg()]).is_err());
    assert!(lenient("%d", &[1.0_f64.to_arg()]).is_err());
}

#[test]
fn text_may_print_as_pointer() {
    let out = lenient("%p", &["abc".to_arg()]).unwrap();
    assert!(out.starts_with("0x"));
    assert!(lenient("%hp", &["abc".to_arg()]).is_err());
}

// -----------------------------------------------------------------
// 5. Strings and width
// -----------------------------------------------------------------

#[test]
fn width_never_truncates() {
    let long = "a string much longer than the field";
    assert_eq!(lenient("%5s", &[long.to_arg()]).unwrap(), long);
    assert_eq!(lenient("%-5s|", &["ab".to_arg()]).unwrap(), "ab   |");
}

#[test]
fn long_string_exceeds_render_margin() {
    let long = "x".repeat(10_000);
    let out = lenient("<%s>", &[long.as_str().to_arg()]).unwrap();
    assert_eq!(out.len(), 10_002);
}

#[test]
fn wide_width_far_beyond_render_margin() {
    let out = lenient("%500d", &[7_i32.to_arg()]).unwrap();
    assert_eq!(out.len(), 500);
    assert!(out.ends_with(" 7"));
}

#[test]
fn wide_text_in_narrow_format() {
    let wide = WideString::from("größe");
    assert_eq!(lenient("%ls", &[(&wide).to_arg()]).unwrap(), "größe");
    assert_eq!(lenient("%S", &[(&wide).to_arg()]).unwrap(), "größe");
}

// -----------------------------------------------------------------
// 6. Wide formats
// -----------------------------------------------------------------

#[test]
fn wide_format_round_trip() {
    let fmt = WideString::from("%ls=%5.1f %hs %lc");
    let key = WideString::from("π");
    let mut out = String::new();
    format_to(
        &mut out,
        fmt.as_slice(),
        &[(&key).to_arg(), 3.14159_f64.to_arg(), "approx".to_arg(), '✓'.to_arg()],
        FormatConfig::lenient(),
    )
    .unwrap();
    assert_eq!(out, "π=  3.1 approx ✓");
}

#[test]
fn wide_string_result() {
    let fmt = WideString::from("%d/%d");
    let out = try_wstrprintf(&fmt, &[3_i32.to_arg(), 4_i32.to_arg()]).unwrap();
    assert_eq!(out.to_string_lossy(), "3/4");
}

// -----------------------------------------------------------------
// 7. Sinks
// -----------------------------------------------------------------

struct FailingWriter;

impl io::Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn io_sink_streams_output() {
    let mut sink = IoSink::new(Vec::new());
    format_to(
        &mut sink,
        b"%s:%d\n",
        &["line".to_arg(), 1_i32.to_arg()],
        FormatConfig::lenient(),
    )
    .unwrap();
    assert_eq!(sink.into_inner(), b"line:1\n");
}

#[test]
fn sink_failure_is_not_fatal() {
    let mut sink = IoSink::new(FailingWriter);
    let err = format_to(&mut sink, b"x%d", &[1_i32.to_arg()], FormatConfig::lenient()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Sink);
    assert!(!err.is_fatal());

    let mut sink = IoSink::new(FailingWriter);
    let err = oprintf(&mut sink, "x", &[]).unwrap_err();
    assert_eq!(err.to_string(), "disk full");
}

// -----------------------------------------------------------------
// 8. Builder and macros
// -----------------------------------------------------------------

#[test]
fn builder_accepts_heterogeneous_arguments() {
    let mut out: Vec<u8> = Vec::new();
    Printf::with_config(&mut out, "%s %d %.2f %c", FormatConfig::lenient())
        .and_then(|p| p.arg("mix"))
        .and_then(|p| p.arg(-3))
        .and_then(|p| p.arg(0.5_f32))
        .and_then(|p| p.arg(b'!'))
        .and_then(Printf::finish)
        .unwrap();
    assert_eq!(out, b"mix -3 0.50 !");
}

#[test]
fn float_precision_beyond_fmt_limit_renders() {
    for fmt in ["%.65536f", "%.70000e", "%.70000g", "%.100000f"] {
        let out = lenient(fmt, &[1.0_f64.to_arg()]).unwrap();
        assert!(out.starts_with('1'), "{fmt}");
    }
    let out = lenient("%.100000f", &[0.5_f64.to_arg()]).unwrap();
    assert_eq!(out.len(), 2 + 100_000);
    assert!(out.starts_with("0.5000"));
}

#[test]
fn macros_collect_arguments() {
    let owned = String::from("owned");
    let s = strprintf!("%s|%s|%u", "lit", &owned, 9_u32);
    assert_eq!(s.as_str(), "lit|owned|9");

    let w = wstrprintf!("%hs=%x", "k", 255_u32);
    assert_eq!(w.to_string_lossy(), "k=ff");

    let mut out: Vec<u8> = Vec::new();
    typefmt_core::oprintf!(&mut out, "%d%%", 50).unwrap();
    assert_eq!(out, b"50%");
}

#[test]
fn try_api_returns_programmer_errors() {
    let err = try_strprintf("%d %d", &[1_i32.to_arg()]).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().starts_with("printf: too few arguments"));
}

#[test]
#[should_panic(expected = "printf: type mismatch")]
fn strprintf_panics_on_mismatch() {
    let _ = strprintf("%s", &[1_i32.to_arg()]);
}

#[test]
#[should_panic(expected = "printf: too many arguments")]
fn macro_panics_on_extra_argument() {
    let _ = strprintf!("%d", 1, 2);
}

// -----------------------------------------------------------------
// 9. Metrics
// -----------------------------------------------------------------

#[test]
fn metrics_count_calls_and_failures() {
    let before = global_metrics().snapshot();
    lenient("%d", &[1_i32.to_arg()]).unwrap();
    let _ = lenient("%s", &[1_i32.to_arg()]);
    let after = global_metrics().snapshot();
    // Other tests run concurrently against the same counters.
    assert!(after.calls >= before.calls + 2);
    assert!(after.directives > before.directives);
    assert!(after.type_mismatches > before.type_mismatches);
}
