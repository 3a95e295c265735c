//! Directive parser.
//!
//! Grammar of one directive:
//!
//! ```text
//! directive := '%' flags* width? ('.' precision?)? size? conv
//! flags     := '-' | '+' | '0' | ' ' | '#'
//! size      := 'h' | 'l' | 'L' | "I64"
//! conv      := d i o x X u e E f g G c s p C S
//! ```
//!
//! `L` reads as `l`. Without a size marker, `c`/`s` take the format string's
//! own width and `C`/`S` the other one; `C`/`S` are then rewritten to `c`/`s`.

use crate::arg::Size;
use crate::error::{FormatError, MalformedReason};
use crate::unit::{CharWidth, FmtUnit};

/// Units available for one directive's text, `%` included.
pub const DIRECTIVE_CAPACITY: usize = 30;

/// Largest width or precision accepted (C `int`).
pub const MAX_FIELD: usize = i32::MAX as usize;

/// Flags parsed from a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// A parsed directive with its size marker resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub flags: FormatFlags,
    pub width: usize,
    pub precision: Option<usize>,
    pub size: Size,
    /// One of `d i o x X u e E f g G c s p`.
    pub conversion: u8,
}

impl Directive {
    /// A bare `%<conversion>` directive.
    #[must_use]
    pub const fn new(conversion: u8) -> Self {
        Self {
            flags: FormatFlags {
                left_justify: false,
                force_sign: false,
                space_sign: false,
                alt_form: false,
                zero_pad: false,
            },
            width: 0,
            precision: None,
            size: Size::Default,
            conversion,
        }
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: FormatFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub const fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }
}

/// Fixed-capacity copy of a directive's source text.
#[derive(Clone, Copy)]
pub struct DirectiveText<U: FmtUnit> {
    units: [U; DIRECTIVE_CAPACITY],
    len: usize,
}

impl<U: FmtUnit> DirectiveText<U> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: [U::from_ascii(0); DIRECTIVE_CAPACITY],
            len: 0,
        }
    }

    /// Append one unit; `position` is the directive's offset for the error.
    pub fn push(&mut self, unit: U, position: usize) -> Result<(), FormatError> {
        let slot = self
            .units
            .get_mut(self.len)
            .ok_or(FormatError::malformed(position, MalformedReason::DirectiveTooLong))?;
        *slot = unit;
        self.len += 1;
        Ok(())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[U] {
        &self.units[..self.len]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<U: FmtUnit> Default for DirectiveText<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: FmtUnit> std::fmt::Display for DirectiveText<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        for &unit in self.as_slice() {
            f.write_char(unit.to_char())?;
        }
        Ok(())
    }
}

impl<U: FmtUnit> std::fmt::Debug for DirectiveText<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DirectiveText({:?})", self.to_string())
    }
}

/// Result of [`parse_directive`].
#[derive(Debug, Clone, Copy)]
pub struct ParsedDirective<U: FmtUnit> {
    pub directive: Directive,
    pub text: DirectiveText<U>,
    /// Offset just past the conversion character.
    pub end: usize,
}

/// Parse the directive whose `%` sits at `fmt[start]`.
pub fn parse_directive<U: FmtUnit>(
    fmt: &[U],
    start: usize,
) -> Result<ParsedDirective<U>, FormatError> {
    let peek = |pos: usize| fmt.get(pos).copied();
    let ascii = |pos: usize| peek(pos).and_then(FmtUnit::to_ascii);
    let mut text = DirectiveText::new();
    let mut pos = start;

    match peek(pos) {
        Some(unit) if unit.to_ascii() == Some(b'%') => text.push(unit, start)?,
        _ => return Err(FormatError::malformed(start, MalformedReason::MissingConversion)),
    }
    pos += 1;
    if pos >= fmt.len() {
        return Err(FormatError::malformed(start, MalformedReason::TrailingPercent));
    }

    // --- flags ---
    let mut flags = FormatFlags::default();
    while let Some(byte) = ascii(pos) {
        match byte {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        text.push(fmt[pos], start)?;
        pos += 1;
    }
    // POSIX: '+' overrides ' '; '-' overrides '0'.
    if flags.force_sign {
        flags.space_sign = false;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }

    // --- width ---
    let mut width = 0_usize;
    while let Some(digit) = ascii(pos).filter(u8::is_ascii_digit) {
        text.push(fmt[pos], start)?;
        width = accumulate(width, digit, start)?;
        pos += 1;
    }

    // --- precision ---
    let mut precision = None;
    if ascii(pos) == Some(b'.') {
        text.push(fmt[pos], start)?;
        pos += 1;
        let mut value = 0_usize;
        while let Some(digit) = ascii(pos).filter(u8::is_ascii_digit) {
            text.push(fmt[pos], start)?;
            value = accumulate(value, digit, start)?;
            pos += 1;
        }
        precision = Some(value);
    }

    // --- size marker ---
    let mut marker = None;
    match ascii(pos) {
        Some(b'h') => {
            text.push(fmt[pos], start)?;
            pos += 1;
            marker = Some(Size::Short);
        }
        Some(b'l' | b'L') => {
            text.push(U::from_ascii(b'l'), start)?;
            pos += 1;
            marker = Some(Size::Long);
        }
        Some(b'I') if ascii(pos + 1) == Some(b'6') && ascii(pos + 2) == Some(b'4') => {
            for offset in 0..3 {
                text.push(fmt[pos + offset], start)?;
            }
            pos += 3;
            marker = Some(Size::Int64);
        }
        _ => {}
    }

    // --- conversion ---
    let Some(unit) = peek(pos) else {
        return Err(FormatError::malformed(start, MalformedReason::MissingConversion));
    };
    let raw = match unit.to_ascii() {
        Some(
            byte @ (b'd' | b'i' | b'o' | b'x' | b'X' | b'u' | b'e' | b'E' | b'f' | b'g' | b'G'
            | b'c' | b's' | b'p' | b'C' | b'S'),
        ) => byte,
        _ => {
            return Err(FormatError::malformed(
                start,
                MalformedReason::UnknownConversion(unit.to_char()),
            ));
        }
    };
    text.push(unit, start)?;
    pos += 1;

    let native = match U::WIDTH {
        CharWidth::Narrow => Size::Short,
        CharWidth::Wide => Size::Long,
    };
    let foreign = match U::WIDTH {
        CharWidth::Narrow => Size::Long,
        CharWidth::Wide => Size::Short,
    };
    let (conversion, size) = match (raw, marker) {
        (b'c' | b's', None) => (raw, native),
        (b'C', None) => (b'c', foreign),
        (b'S', None) => (b's', foreign),
        (b'C', Some(size)) => (b'c', size),
        (b'S', Some(size)) => (b's', size),
        (_, size) => (raw, size.unwrap_or_default()),
    };

    Ok(ParsedDirective {
        directive: Directive {
            flags,
            width,
            precision,
            size,
            conversion,
        },
        text,
        end: pos,
    })
}

fn accumulate(value: usize, digit: u8, start: usize) -> Result<usize, FormatError> {
    value
        .checked_mul(10)
        .and_then(|v| v.checked_add(usize::from(digit - b'0')))
        .filter(|&v| v <= MAX_FIELD)
        .ok_or(FormatError::malformed(start, MalformedReason::FieldOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(fmt: &str) -> Result<ParsedDirective<u8>, FormatError> {
        parse_directive(fmt.as_bytes(), 0)
    }

    fn wide(fmt: &str) -> Vec<u32> {
        fmt.chars().map(u32::from).collect()
    }

    #[test]
    fn simple_int() {
        let parsed = parse("%d").unwrap();
        assert_eq!(parsed.end, 2);
        assert_eq!(parsed.directive, Directive::new(b'd'));
        assert_eq!(parsed.text.to_string(), "%d");
    }

    #[test]
    fn width_precision() {
        let parsed = parse("%10.5f").unwrap();
        assert_eq!(parsed.end, 6);
        assert_eq!(parsed.directive.width, 10);
        assert_eq!(parsed.directive.precision, Some(5));
    }

    #[test]
    fn bare_dot_is_zero_precision() {
        let parsed = parse("%.d").unwrap();
        assert_eq!(parsed.directive.precision, Some(0));
    }

    #[test]
    fn flags() {
        let parsed = parse("%-+#010d").unwrap();
        let flags = parsed.directive.flags;
        assert!(flags.left_justify);
        assert!(flags.force_sign);
        assert!(flags.alt_form);
        assert!(!flags.zero_pad); // overridden by '-'
        assert_eq!(parsed.directive.width, 10);
    }

    #[test]
    fn plus_overrides_space() {
        let flags = parse("% +d").unwrap().directive.flags;
        assert!(flags.force_sign);
        assert!(!flags.space_sign);
    }

    #[test]
    fn size_markers() {
        assert_eq!(parse("%hd").unwrap().directive.size, Size::Short);
        assert_eq!(parse("%ld").unwrap().directive.size, Size::Long);
        assert_eq!(parse("%Lf").unwrap().directive.size, Size::Long);
        assert_eq!(parse("%I64d").unwrap().directive.size, Size::Int64);
        assert_eq!(parse("%Lf").unwrap().text.to_string(), "%lf");
    }

    #[test]
    fn char_and_string_default_to_format_width() {
        assert_eq!(parse("%s").unwrap().directive.size, Size::Short);
        assert_eq!(parse("%c").unwrap().directive.size, Size::Short);
        let parsed = parse_directive(&wide("%s"), 0).unwrap();
        assert_eq!(parsed.directive.size, Size::Long);
    }

    #[test]
    fn upper_case_char_and_string_take_the_other_width() {
        let parsed = parse("%S").unwrap();
        assert_eq!(parsed.directive.conversion, b's');
        assert_eq!(parsed.directive.size, Size::Long);
        let parsed = parse_directive(&wide("%C"), 0).unwrap();
        assert_eq!(parsed.directive.conversion, b'c');
        assert_eq!(parsed.directive.size, Size::Short);
    }

    #[test]
    fn explicit_marker_wins_over_width_default() {
        let parsed = parse("%ls").unwrap();
        assert_eq!(parsed.directive.size, Size::Long);
        let parsed = parse_directive(&wide("%hs"), 0).unwrap();
        assert_eq!(parsed.directive.size, Size::Short);
    }

    #[test]
    fn parse_starts_mid_string() {
        let parsed = parse_directive(b"ab %5s cd", 3).unwrap();
        assert_eq!(parsed.end, 6);
        assert_eq!(parsed.directive.width, 5);
    }

    #[test]
    fn missing_conversion() {
        let err = parse("%5").unwrap_err();
        assert!(matches!(
            err,
            FormatError::MalformedFormat {
                position: 0,
                reason: MalformedReason::MissingConversion
            }
        ));
    }

    #[test]
    fn trailing_percent() {
        let err = parse_directive(b"abc%", 3).unwrap_err();
        assert!(matches!(
            err,
            FormatError::MalformedFormat {
                position: 3,
                reason: MalformedReason::TrailingPercent
            }
        ));
    }

    #[test]
    fn unknown_conversion() {
        let err = parse("%y").unwrap_err();
        assert!(matches!(
            err,
            FormatError::MalformedFormat {
                reason: MalformedReason::UnknownConversion('y'),
                ..
            }
        ));
        // '*' widths are not supported.
        assert!(parse("%*d").is_err());
        // 'I' alone is not a size marker.
        assert!(parse("%I32d").is_err());
    }

    #[test]
    fn unknown_wide_conversion_names_the_character() {
        let err = parse_directive(&wide("%é"), 0).unwrap_err();
        assert!(matches!(
            err,
            FormatError::MalformedFormat {
                reason: MalformedReason::UnknownConversion('é'),
                ..
            }
        ));
    }

    #[test]
    fn directive_too_long() {
        let long = format!("%{}d", "0".repeat(DIRECTIVE_CAPACITY));
        let err = parse(&long).unwrap_err();
        assert!(matches!(
            err,
            FormatError::MalformedFormat {
                reason: MalformedReason::DirectiveTooLong,
                ..
            }
        ));
        // Exactly at capacity still fits.
        let fits = format!("%{}d", "-".repeat(DIRECTIVE_CAPACITY - 2));
        assert!(parse(&fits).is_ok());
    }

    #[test]
    fn field_overflow() {
        let err = parse("%2147483648d").unwrap_err();
        assert!(matches!(
            err,
            FormatError::MalformedFormat {
                reason: MalformedReason::FieldOverflow,
                ..
            }
        ));
        assert_eq!(
            parse("%.2147483647d").unwrap().directive.precision,
            Some(MAX_FIELD)
        );
    }
}
