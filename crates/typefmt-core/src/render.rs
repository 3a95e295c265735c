//! Renders one validated (directive, argument) pair.
//!
//! Output follows C `printf` for the supported conversions. Integer
//! arguments are read at their own bit width, so `%u` of an `i32` `-1` is
//! `4294967295` and `%d` of a `u16` `65535` is `-1`. When validation is off,
//! mismatched values are coerced as well as they can be; nothing here
//! panics.
//!
//! Every renderer appends to `buf`, which the caller sizes. Width is counted
//! in output units and only ever pads.

use crate::arg::{Arg, ArgValue, Size};
use crate::directive::{Directive, FormatFlags};
use crate::unit::{FmtUnit, wide_char};

/// Render `arg` as `directive` into `buf`.
pub fn render<U: FmtUnit>(directive: &Directive, arg: &Arg<'_>, buf: &mut Vec<U>) {
    match directive.conversion {
        b'd' | b'i' => format_signed(signed_value(arg), directive, buf),
        b'o' | b'u' | b'x' | b'X' => format_unsigned(unsigned_value(arg), directive, buf),
        b'e' | b'E' | b'f' | b'g' | b'G' => format_float(float_value(arg), directive, buf),
        b'c' => format_char(char_code(arg), directive, buf),
        b's' => match arg.value() {
            ArgValue::Narrow(text) => format_str(&U::narrow_text(text), directive, buf),
            ArgValue::Wide(text) => format_str(&U::wide_text(text), directive, buf),
            value => render(&natural_directive(directive, arg, value), arg, buf),
        },
        b'p' => format_pointer(address(arg), directive, buf),
        // parse_directive yields nothing else
        _ => {}
    }
}

/// Render a signed integer.
pub fn format_signed<U: FmtUnit>(value: i64, directive: &Directive, buf: &mut Vec<U>) {
    let mut digits = [0u8; 64];
    let count = render_digits(value.unsigned_abs(), 10, false, &mut digits);
    let digit_slice = visible_digits(&digits, count, value == 0, directive);
    let zeros = directive
        .precision
        .unwrap_or(1)
        .saturating_sub(digit_slice.len());

    emit_number(
        buf,
        directive,
        Number {
            sign: sign_char(value < 0, directive.flags),
            prefix: b"",
            zeros,
            digits: digit_slice,
        },
        directive.flags.zero_pad && directive.precision.is_none(),
    );
}

/// Render an unsigned integer in octal, decimal or hex.
pub fn format_unsigned<U: FmtUnit>(value: u64, directive: &Directive, buf: &mut Vec<U>) {
    let (base, uppercase) = int_base(directive.conversion);
    let mut digits = [0u8; 64];
    let count = render_digits(value, base, uppercase, &mut digits);
    let digit_slice = visible_digits(&digits, count, value == 0, directive);
    let zeros = directive
        .precision
        .unwrap_or(1)
        .saturating_sub(digit_slice.len());

    let prefix: &[u8] = if directive.flags.alt_form {
        match directive.conversion {
            // '#' with 'o' only guarantees a leading zero.
            b'o' if zeros == 0 && digit_slice.first() != Some(&b'0') => b"0",
            b'x' if value != 0 => b"0x",
            b'X' if value != 0 => b"0X",
            _ => b"",
        }
    } else {
        b""
    };

    emit_number(
        buf,
        directive,
        Number {
            sign: None,
            prefix,
            zeros,
            digits: digit_slice,
        },
        directive.flags.zero_pad && directive.precision.is_none(),
    );
}

/// Render a floating-point value for `f`, `e`/`E` or `g`/`G`.
pub fn format_float<U: FmtUnit>(value: f64, directive: &Directive, buf: &mut Vec<U>) {
    let uppercase = directive.conversion.is_ascii_uppercase();
    let sign = sign_char(value.is_sign_negative(), directive.flags);

    if !value.is_finite() {
        let body: &[u8] = match (value.is_nan(), uppercase) {
            (true, false) => b"nan",
            (true, true) => b"NAN",
            (false, false) => b"inf",
            (false, true) => b"INF",
        };
        let number = Number {
            sign,
            prefix: b"",
            zeros: 0,
            digits: body,
        };
        return emit_number(buf, directive, number, false);
    }

    let abs = value.abs();
    let precision = directive.precision.unwrap_or(6);
    let alt_form = directive.flags.alt_form;
    let body = match directive.conversion {
        b'f' => format_f(abs, precision, alt_form),
        b'e' | b'E' => format_e(abs, precision, uppercase, alt_form),
        _ => format_g(abs, precision, uppercase, alt_form),
    };

    emit_number(
        buf,
        directive,
        Number {
            sign,
            prefix: b"",
            zeros: 0,
            digits: body.as_bytes(),
        },
        directive.flags.zero_pad,
    );
}

/// Render a character. A `Short` directive takes a byte, anything else a
/// Unicode scalar.
pub fn format_char<U: FmtUnit>(code: u32, directive: &Directive, buf: &mut Vec<U>) {
    let mut body = Vec::with_capacity(4);
    if directive.size == Size::Short {
        U::push_byte(code.to_le_bytes()[0], &mut body);
    } else {
        U::push_char(wide_char(code), &mut body);
    }
    emit_field(buf, directive, &body);
}

/// Render text already converted to the output width. Precision truncates
/// without splitting a character.
pub fn format_str<U: FmtUnit>(text: &[U], directive: &Directive, buf: &mut Vec<U>) {
    let limit = match directive.precision {
        Some(p) => U::char_boundary(text, p),
        None => text.len(),
    };
    emit_field(buf, directive, &text[..limit]);
}

/// Render a pointer as `0x...` hex, or `(nil)`.
pub fn format_pointer<U: FmtUnit>(addr: usize, directive: &Directive, buf: &mut Vec<U>) {
    if addr == 0 {
        let nil: Vec<U> = b"(nil)".iter().map(|&b| U::from_ascii(b)).collect();
        return emit_field(buf, directive, &nil);
    }

    let mut digits = [0u8; 64];
    let count = render_digits(addr as u64, 16, false, &mut digits);
    let number = Number {
        sign: None,
        prefix: b"0x",
        zeros: 0,
        digits: &digits[64 - count..],
    };
    emit_number(buf, directive, number, false);
}

// ---------------------------------------------------------------------------
// Value coercion
// ---------------------------------------------------------------------------

/// Raw bits of an integer reading of `arg`, with the width they occupy.
fn value_bits(arg: &Arg<'_>) -> (u64, u32) {
    let size_bits = arg.tag().size.int_bits();
    match arg.value() {
        ArgValue::Signed(v) => (v as u64, size_bits),
        ArgValue::Unsigned(v) => (v, size_bits),
        ArgValue::Float(f) => (f as i64 as u64, 64),
        // C promotes characters to int.
        ArgValue::Char(c) => (u64::from(c), 32),
        ArgValue::Narrow(text) => (text.as_ptr().addr() as u64, usize::BITS),
        ArgValue::Wide(text) => (text.as_ptr().addr() as u64, usize::BITS),
        ArgValue::Pointer(p) => (p as u64, usize::BITS),
    }
}

fn signed_value(arg: &Arg<'_>) -> i64 {
    let (raw, bits) = value_bits(arg);
    if bits >= 64 {
        raw as i64
    } else {
        let shift = 64 - bits;
        ((raw << shift) as i64) >> shift
    }
}

fn unsigned_value(arg: &Arg<'_>) -> u64 {
    let (raw, bits) = value_bits(arg);
    if bits >= 64 {
        raw
    } else {
        raw & ((1_u64 << bits) - 1)
    }
}

fn float_value(arg: &Arg<'_>) -> f64 {
    match arg.value() {
        ArgValue::Float(f) => f,
        ArgValue::Signed(v) => v as f64,
        ArgValue::Unsigned(v) => v as f64,
        ArgValue::Char(c) => f64::from(c),
        ArgValue::Pointer(p) => p as f64,
        ArgValue::Narrow(_) | ArgValue::Wide(_) => 0.0,
    }
}

fn char_code(arg: &Arg<'_>) -> u32 {
    match arg.value() {
        ArgValue::Char(c) => c,
        ArgValue::Float(f) => f as u32,
        ArgValue::Narrow(text) => text.first().map_or(0, |&b| u32::from(b)),
        ArgValue::Wide(text) => text.first().copied().unwrap_or(0),
        _ => unsigned_value(arg) as u32,
    }
}

fn address(arg: &Arg<'_>) -> usize {
    match arg.value() {
        ArgValue::Pointer(p) => p,
        ArgValue::Narrow(text) => text.as_ptr().addr(),
        ArgValue::Wide(text) => text.as_ptr().addr(),
        _ => unsigned_value(arg) as usize,
    }
}

/// The directive a non-text value would have matched, for `%s` of a
/// mismatched argument.
fn natural_directive(directive: &Directive, arg: &Arg<'_>, value: ArgValue<'_>) -> Directive {
    let conversion = match value {
        ArgValue::Signed(_) => b'd',
        ArgValue::Unsigned(_) => b'u',
        ArgValue::Float(_) => b'g',
        ArgValue::Char(_) => b'c',
        _ => b'p',
    };
    Directive {
        flags: directive.flags,
        width: directive.width,
        precision: None,
        size: arg.tag().size,
        conversion,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Sign, prefix, leading zeros and digits of one number.
struct Number<'a> {
    sign: Option<u8>,
    prefix: &'a [u8],
    zeros: usize,
    digits: &'a [u8],
}

fn emit_number<U: FmtUnit>(buf: &mut Vec<U>, directive: &Directive, number: Number<'_>, zero_pad: bool) {
    let content = usize::from(number.sign.is_some())
        + number.prefix.len()
        + number.zeros
        + number.digits.len();
    let pad_total = directive.width.saturating_sub(content);
    let left = directive.flags.left_justify;

    if !left && !zero_pad {
        pad(buf, b' ', pad_total);
    }
    if let Some(s) = number.sign {
        buf.push(U::from_ascii(s));
    }
    push_ascii(buf, number.prefix);
    if !left && zero_pad {
        pad(buf, b'0', pad_total);
    }
    pad(buf, b'0', number.zeros);
    push_ascii(buf, number.digits);
    if left {
        pad(buf, b' ', pad_total);
    }
}

fn emit_field<U: FmtUnit>(buf: &mut Vec<U>, directive: &Directive, body: &[U]) {
    let pad_total = directive.width.saturating_sub(body.len());
    if !directive.flags.left_justify {
        pad(buf, b' ', pad_total);
    }
    buf.extend_from_slice(body);
    if directive.flags.left_justify {
        pad(buf, b' ', pad_total);
    }
}

fn sign_char(negative: bool, flags: FormatFlags) -> Option<u8> {
    if negative {
        Some(b'-')
    } else if flags.force_sign {
        Some(b'+')
    } else if flags.space_sign {
        Some(b' ')
    } else {
        None
    }
}

/// Digits to print: none for a zero value at precision 0.
fn visible_digits<'a>(
    digits: &'a [u8; 64],
    count: usize,
    is_zero: bool,
    directive: &Directive,
) -> &'a [u8] {
    if is_zero && directive.precision == Some(0) {
        &[]
    } else {
        &digits[64 - count..]
    }
}

fn int_base(conversion: u8) -> (u64, bool) {
    match conversion {
        b'o' => (8, false),
        b'x' => (16, false),
        b'X' => (16, true),
        _ => (10, false),
    }
}

/// Render `value` in the given `base` into the END of `buf`.
/// Returns the number of digits written.
fn render_digits(mut value: u64, base: u64, uppercase: bool, buf: &mut [u8; 64]) -> usize {
    if value == 0 {
        buf[63] = b'0';
        return 1;
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = 64;
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    64 - pos
}

fn push_ascii<U: FmtUnit>(buf: &mut Vec<U>, bytes: &[u8]) {
    buf.extend(bytes.iter().map(|&b| U::from_ascii(b)));
}

fn pad<U: FmtUnit>(buf: &mut Vec<U>, byte: u8, count: usize) {
    buf.extend(std::iter::repeat_n(U::from_ascii(byte), count));
}

/// Largest precision `core::fmt` accepts.
const FMT_PRECISION_LIMIT: usize = u16::MAX as usize;

/// `value` with `precision` fractional digits. Past the `core::fmt` limit
/// the digits are zeros: a double's exact expansion ends well before it.
fn fixed_digits(value: f64, precision: usize) -> String {
    let shown = precision.min(FMT_PRECISION_LIMIT);
    let mut s = format!("{value:.shown$}");
    s.extend(std::iter::repeat_n('0', precision - shown));
    s
}

/// Rust's `1.5e-7` form with `precision` mantissa digits, zero-extended
/// past the `core::fmt` limit.
fn exponent_digits(value: f64, precision: usize) -> String {
    let shown = precision.min(FMT_PRECISION_LIMIT);
    let mut s = format!("{value:.shown$e}");
    if precision > shown {
        let exp = s.find('e').map_or_else(String::new, |e_pos| s.split_off(e_pos));
        s.extend(std::iter::repeat_n('0', precision - shown));
        s.push_str(&exp);
    }
    s
}

/// `%f`: fixed-point decimal.
fn format_f(value: f64, precision: usize, alt_form: bool) -> String {
    let mut s = fixed_digits(value, precision);
    if alt_form && precision == 0 {
        s.push('.');
    }
    s
}

/// `%e`: one leading digit, at least two exponent digits.
fn format_e(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> String {
    let raw = exponent_digits(value, precision);
    let (mantissa, exp) = split_exponent(&raw);
    let dot = if alt_form && precision == 0 { "." } else { "" };
    let e_char = if uppercase { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{dot}{e_char}{sign}{:02}", exp.unsigned_abs())
}

/// `%g`: `%e` when the exponent is below -4 or at least the precision,
/// `%f` otherwise; trailing zeros dropped unless `#`.
fn format_g(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> String {
    let p = precision.max(1);
    let probe = exponent_digits(value, p - 1);
    let (_, exp) = split_exponent(&probe);
    let p_exp = i64::try_from(p).unwrap_or(i64::MAX);
    let exp = i64::from(exp);

    let mut s = if exp < -4 || exp >= p_exp {
        format_e(value, p - 1, uppercase, alt_form)
    } else {
        let frac_digits = usize::try_from(p_exp - 1 - exp).unwrap_or(0);
        format_f(value, frac_digits, alt_form)
    };
    if !alt_form {
        match s.find(['e', 'E']) {
            Some(e_pos) => {
                let exp_part = s.split_off(e_pos);
                strip_trailing_zeros(&mut s);
                s.push_str(&exp_part);
            }
            None => strip_trailing_zeros(&mut s),
        }
    }
    s
}

/// Split Rust's `1.5e-7` form into mantissa and exponent.
fn split_exponent(raw: &str) -> (&str, i32) {
    match raw.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (raw, 0),
    }
}

/// Remove trailing zeros after the decimal point.
fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}
