//! Code units of narrow and wide format strings.
//!
//! Narrow strings are UTF-8 bytes. Wide strings hold one `u32` per character
//! (the `wchar_t` layout on Unix). Text of the other width is converted on the
//! way into the output: narrow → wide decodes UTF-8 (invalid sequences become
//! U+FFFD), wide → narrow encodes UTF-8 (invalid scalars become U+FFFD).

use std::borrow::Cow;

/// Character width of a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharWidth {
    /// 8-bit units.
    Narrow,
    /// 32-bit units.
    Wide,
}

/// One element of a format string and of rendered output.
pub trait FmtUnit: Copy + Eq + std::fmt::Debug + 'static {
    /// Width of this unit type.
    const WIDTH: CharWidth;

    /// Unit for an ASCII byte.
    fn from_ascii(byte: u8) -> Self;

    /// The ASCII byte this unit encodes, if any.
    fn to_ascii(self) -> Option<u8>;

    /// The unit as a character, U+FFFD if it is not one on its own.
    fn to_char(self) -> char;

    /// Narrow text in this width.
    fn narrow_text(text: &[u8]) -> Cow<'_, [Self]>;

    /// Wide text in this width.
    fn wide_text(text: &[u32]) -> Cow<'_, [Self]>;

    /// Largest `n <= limit` that does not split a character of `text`.
    fn char_boundary(text: &[Self], limit: usize) -> usize;

    /// Append one Unicode character.
    fn push_char(ch: char, out: &mut Vec<Self>);

    /// Append one byte character.
    fn push_byte(byte: u8, out: &mut Vec<Self>);
}

impl FmtUnit for u8 {
    const WIDTH: CharWidth = CharWidth::Narrow;

    fn from_ascii(byte: u8) -> Self {
        byte
    }

    fn to_ascii(self) -> Option<u8> {
        self.is_ascii().then_some(self)
    }

    fn to_char(self) -> char {
        self.to_ascii()
            .map_or(char::REPLACEMENT_CHARACTER, char::from)
    }

    fn narrow_text(text: &[u8]) -> Cow<'_, [Self]> {
        Cow::Borrowed(text)
    }

    fn wide_text(text: &[u32]) -> Cow<'_, [Self]> {
        let mut out = Vec::with_capacity(text.len());
        for &unit in text {
            Self::push_char(wide_char(unit), &mut out);
        }
        Cow::Owned(out)
    }

    fn char_boundary(text: &[Self], limit: usize) -> usize {
        if limit >= text.len() {
            return text.len();
        }
        let mut n = limit;
        while n > 0 && (text[n] & 0xC0) == 0x80 {
            n -= 1;
        }
        n
    }

    fn push_char(ch: char, out: &mut Vec<Self>) {
        let mut encoded = [0_u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut encoded).as_bytes());
    }

    fn push_byte(byte: u8, out: &mut Vec<Self>) {
        out.push(byte);
    }
}

impl FmtUnit for u32 {
    const WIDTH: CharWidth = CharWidth::Wide;

    fn from_ascii(byte: u8) -> Self {
        u32::from(byte)
    }

    fn to_ascii(self) -> Option<u8> {
        u8::try_from(self).ok().filter(u8::is_ascii)
    }

    fn to_char(self) -> char {
        wide_char(self)
    }

    fn narrow_text(text: &[u8]) -> Cow<'_, [Self]> {
        Cow::Owned(
            String::from_utf8_lossy(text)
                .chars()
                .map(u32::from)
                .collect(),
        )
    }

    fn wide_text(text: &[u32]) -> Cow<'_, [Self]> {
        Cow::Borrowed(text)
    }

    fn char_boundary(text: &[Self], limit: usize) -> usize {
        limit.min(text.len())
    }

    fn push_char(ch: char, out: &mut Vec<Self>) {
        out.push(u32::from(ch));
    }

    fn push_byte(byte: u8, out: &mut Vec<Self>) {
        out.push(u32::from(byte));
    }
}

/// Decode one wide unit, substituting U+FFFD for non-scalar values.
#[must_use]
pub fn wide_char(unit: u32) -> char {
    char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Length of a NUL-terminated unit string (the whole slice if no NUL).
#[must_use]
pub fn terminated_len<U: Copy + Default + PartialEq>(s: &[U]) -> usize {
    let nul = U::default();
    s.iter().position(|&c| c == nul).unwrap_or(s.len())
}
