//! Integration test: strictness matrix
//!
//! Every (directive, argument) pair below is run under the four
//! combinations of strict-sign and strict-int-size, and under unchecked mode.
//!
//! Run: cargo test -p typefmt-core --test strictness_matrix_test

use typefmt_core::{Arg, ErrorKind, FormatConfig, FormatError, ToArg, format_to};

/// Expected outcome per configuration: `Some(text)` renders, `None` is a
/// type mismatch.
struct Case {
    fmt: &'static str,
    arg: Arg<'static>,
    lenient: Option<&'static str>,
    strict_sign: Option<&'static str>,
    strict_int_size: Option<&'static str>,
    strict: Option<&'static str>,
}

fn render(fmt: &str, arg: Arg<'_>, config: FormatConfig) -> Result<String, FormatError> {
    let mut out = String::new();
    format_to(&mut out, fmt.as_bytes(), &[arg], config)?;
    Ok(out)
}

fn cases() -> Vec<Case> {
    vec![
        Case {
            fmt: "%d",
            arg: 42_i32.to_arg(),
            lenient: Some("42"),
            strict_sign: Some("42"),
            strict_int_size: Some("42"),
            strict: Some("42"),
        },
        Case {
            fmt: "%u",
            arg: (-1_i32).to_arg(),
            lenient: Some("4294967295"),
            strict_sign: None,
            strict_int_size: Some("4294967295"),
            strict: None,
        },
        Case {
            fmt: "%d",
            arg: 7_u32.to_arg(),
            lenient: Some("7"),
            strict_sign: None,
            strict_int_size: Some("7"),
            strict: None,
        },
        Case {
            fmt: "%x",
            arg: (-1_i32).to_arg(),
            lenient: Some("ffffffff"),
            strict_sign: Some("ffffffff"),
            strict_int_size: Some("ffffffff"),
            strict: Some("ffffffff"),
        },
        Case {
            fmt: "%ld",
            arg: 5_i32.to_arg(),
            lenient: Some("5"),
            strict_sign: Some("5"),
            strict_int_size: None,
            strict: None,
        },
        Case {
            fmt: "%d",
            arg: 5_isize.to_arg(),
            lenient: Some("5"),
            strict_sign: Some("5"),
            strict_int_size: None,
            strict: None,
        },
        Case {
            fmt: "%ld",
            arg: (-5_isize).to_arg(),
            lenient: Some("-5"),
            strict_sign: Some("-5"),
            strict_int_size: Some("-5"),
            strict: Some("-5"),
        },
        Case {
            fmt: "%lu",
            arg: 9_usize.to_arg(),
            lenient: Some("9"),
            strict_sign: Some("9"),
            strict_int_size: Some("9"),
            strict: Some("9"),
        },
        Case {
            fmt: "%hd",
            arg: (-2_i16).to_arg(),
            lenient: Some("-2"),
            strict_sign: Some("-2"),
            strict_int_size: Some("-2"),
            strict: Some("-2"),
        },
        Case {
            fmt: "%d",
            arg: 2_i16.to_arg(),
            lenient: None,
            strict_sign: None,
            strict_int_size: None,
            strict: None,
        },
        Case {
            fmt: "%hu",
            arg: 65535_u16.to_arg(),
            lenient: Some("65535"),
            strict_sign: Some("65535"),
            strict_int_size: Some("65535"),
            strict: Some("65535"),
        },
        Case {
            fmt: "%lc",
            arg: 0x41_u16.to_arg(),
            lenient: Some("A"),
            strict_sign: Some("A"),
            strict_int_size: Some("A"),
            strict: Some("A"),
        },
        Case {
            fmt: "%I64d",
            arg: i64::MIN.to_arg(),
            lenient: Some("-9223372036854775808"),
            strict_sign: Some("-9223372036854775808"),
            strict_int_size: Some("-9223372036854775808"),
            strict: Some("-9223372036854775808"),
        },
        Case {
            fmt: "%ld",
            arg: 1_i64.to_arg(),
            lenient: None,
            strict_sign: None,
            strict_int_size: None,
            strict: None,
        },
        Case {
            fmt: "%I64u",
            arg: u64::MAX.to_arg(),
            lenient: Some("18446744073709551615"),
            strict_sign: Some("18446744073709551615"),
            strict_int_size: Some("18446744073709551615"),
            strict: Some("18446744073709551615"),
        },
        Case {
            fmt: "%lf",
            arg: 0.5_f64.to_arg(),
            lenient: Some("0.500000"),
            strict_sign: Some("0.500000"),
            strict_int_size: None,
            strict: None,
        },
        Case {
            fmt: "%c",
            arg: b'z'.to_arg(),
            lenient: Some("z"),
            strict_sign: Some("z"),
            strict_int_size: Some("z"),
            strict: Some("z"),
        },
        Case {
            fmt: "%c",
            arg: 'z'.to_arg(),
            lenient: None,
            strict_sign: None,
            strict_int_size: None,
            strict: None,
        },
        Case {
            fmt: "%C",
            arg: 'é'.to_arg(),
            lenient: Some("é"),
            strict_sign: Some("é"),
            strict_int_size: Some("é"),
            strict: Some("é"),
        },
        Case {
            fmt: "%s",
            arg: "text".to_arg(),
            lenient: Some("text"),
            strict_sign: Some("text"),
            strict_int_size: Some("text"),
            strict: Some("text"),
        },
        Case {
            fmt: "%ls",
            arg: "text".to_arg(),
            lenient: None,
            strict_sign: None,
            strict_int_size: None,
            strict: None,
        },
        Case {
            fmt: "%s",
            arg: true.to_arg(),
            lenient: None,
            strict_sign: None,
            strict_int_size: None,
            strict: None,
        },
        Case {
            fmt: "%d",
            arg: true.to_arg(),
            lenient: Some("1"),
            strict_sign: Some("1"),
            strict_int_size: Some("1"),
            strict: Some("1"),
        },
        Case {
            fmt: "%p",
            arg: std::ptr::null::<u8>().to_arg(),
            lenient: Some("(nil)"),
            strict_sign: Some("(nil)"),
            strict_int_size: Some("(nil)"),
            strict: Some("(nil)"),
        },
        Case {
            fmt: "%lp",
            arg: std::ptr::null::<u8>().to_arg(),
            lenient: Some("(nil)"),
            strict_sign: Some("(nil)"),
            strict_int_size: None,
            strict: None,
        },
    ]
}

fn check(case: &Case, label: &str, config: FormatConfig, expected: Option<&str>) {
    let result = render(case.fmt, case.arg, config);
    match (expected, result) {
        (Some(want), Ok(got)) => assert_eq!(got, want, "{label}: {:?}", case.fmt),
        (None, Err(err)) => assert_eq!(
            err.kind(),
            ErrorKind::TypeMismatch,
            "{label}: {:?}",
            case.fmt
        ),
        (want, got) => panic!(
            "{label}: {:?} with {}: expected {want:?}, got {got:?}",
            case.fmt,
            case.arg.tag()
        ),
    }
}

#[test]
fn lenient_matrix() {
    for case in cases() {
        check(&case, "lenient", FormatConfig::lenient(), case.lenient);
    }
}

#[test]
fn strict_sign_matrix() {
    let config = FormatConfig::lenient().with_strict_sign(true);
    for case in cases() {
        check(&case, "strict-sign", config, case.strict_sign);
    }
}

#[test]
fn strict_int_size_matrix() {
    let config = FormatConfig::lenient().with_strict_int_size(true);
    for case in cases() {
        check(&case, "strict-int-size", config, case.strict_int_size);
    }
}

#[test]
fn strict_matrix() {
    for case in cases() {
        check(&case, "strict", FormatConfig::strict(), case.strict);
    }
}

#[test]
fn unchecked_mode_never_reports_mismatches() {
    for case in cases() {
        let result = render(case.fmt, case.arg, FormatConfig::unchecked());
        assert!(result.is_ok(), "{:?}: {result:?}", case.fmt);
    }
}

#[test]
fn unchecked_mode_never_reports_count_errors() {
    let config = FormatConfig::unchecked();
    let mut out = String::new();
    format_to(&mut out, b"%d %d", &[1_i32.to_arg()], config).unwrap();
    assert_eq!(out, "1 ");
    out.clear();
    format_to(&mut out, b"%d", &[1_i32.to_arg(), 2_i32.to_arg(), 3_i32.to_arg()], config).unwrap();
    assert_eq!(out, "1");
}
