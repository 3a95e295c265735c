//! Type-tagged formatting arguments.
//!
//! Every argument carries a [`TypeTag`] naming its size class and category.
//! The tag is what the compatibility matrix checks a directive against; the
//! [`ArgValue`] is what the renderer formats.

use std::ffi::CStr;
use std::fmt;

use crate::unit::terminated_len;

/// Size class of an argument, and of a directive's size marker.
///
/// As a directive marker: `Default` is no marker, `Short` is `h`, `Long` is
/// `l` (or `L`), `Int64` is `I64`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    #[default]
    Default,
    Short,
    Long,
    Int64,
}

impl Size {
    /// Marker text as it appears in a directive.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Default => "",
            Self::Short => "h",
            Self::Long => "l",
            Self::Int64 => "I64",
        }
    }

    /// Stable lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Short => "short",
            Self::Long => "long",
            Self::Int64 => "int64",
        }
    }

    /// Bit width of an integer of this size class.
    #[must_use]
    pub const fn int_bits(self) -> u32 {
        match self {
            Self::Short => 16,
            Self::Default => 32,
            Self::Long => usize::BITS,
            Self::Int64 => 64,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad kind of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Int,
    Unsigned,
    Float,
    Char,
    String,
    WideString,
    Pointer,
}

impl Category {
    /// Stable lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "signed-integer",
            Self::Unsigned => "unsigned-integer",
            Self::Float => "float",
            Self::Char => "char",
            Self::String => "string",
            Self::WideString => "wide-string",
            Self::Pointer => "pointer",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(Size, Category)` classification of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub size: Size,
    pub category: Category,
}

impl TypeTag {
    #[must_use]
    pub const fn new(size: Size, category: Category) -> Self {
        Self { size, category }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.size, self.category)
    }
}

/// Borrowed value of one argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgValue<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    /// Character code: a byte for `Short` chars, a Unicode scalar otherwise.
    Char(u32),
    /// UTF-8 (or raw byte) text.
    Narrow(&'a [u8]),
    /// One `u32` per character.
    Wide(&'a [u32]),
    Pointer(usize),
}

/// One formatting argument: a type tag plus its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arg<'a> {
    tag: TypeTag,
    value: ArgValue<'a>,
}

impl<'a> Arg<'a> {
    /// Build an argument from an explicit tag.
    ///
    /// The tag is trusted: it is what validation checks, regardless of the
    /// value's variant.
    #[must_use]
    pub const fn new(tag: TypeTag, value: ArgValue<'a>) -> Self {
        Self { tag, value }
    }

    #[must_use]
    pub const fn tag(&self) -> TypeTag {
        self.tag
    }

    #[must_use]
    pub const fn value(&self) -> ArgValue<'a> {
        self.value
    }

    /// Length in units of a text argument, zero otherwise.
    #[must_use]
    pub const fn text_len(&self) -> usize {
        match self.value {
            ArgValue::Narrow(s) => s.len(),
            ArgValue::Wide(s) => s.len(),
            _ => 0,
        }
    }
}

/// Conversion of a call-site value into a tagged [`Arg`].
///
/// The formatting macros call `ToArg::to_arg(value)`, which does not
/// autoref: pass owned `String`s and `Vec<u32>`s by reference.
pub trait ToArg<'a> {
    fn to_arg(self) -> Arg<'a>;
}

impl<'a> ToArg<'a> for Arg<'a> {
    fn to_arg(self) -> Arg<'a> {
        self
    }
}

macro_rules! impl_to_arg_signed {
    ($($ty:ty => $size:ident),* $(,)?) => {
        $(
            impl<'a> ToArg<'a> for $ty {
                fn to_arg(self) -> Arg<'a> {
                    Arg::new(
                        TypeTag::new(Size::$size, Category::Int),
                        ArgValue::Signed(self as i64),
                    )
                }
            }
        )*
    };
}

macro_rules! impl_to_arg_unsigned {
    ($($ty:ty => $size:ident),* $(,)?) => {
        $(
            impl<'a> ToArg<'a> for $ty {
                fn to_arg(self) -> Arg<'a> {
                    Arg::new(
                        TypeTag::new(Size::$size, Category::Unsigned),
                        ArgValue::Unsigned(self as u64),
                    )
                }
            }
        )*
    };
}

impl_to_arg_signed!(i16 => Short, i32 => Default, isize => Long, i64 => Int64);
impl_to_arg_unsigned!(u16 => Short, u32 => Default, usize => Long, u64 => Int64);

impl<'a> ToArg<'a> for bool {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(
            TypeTag::new(Size::Default, Category::Int),
            ArgValue::Signed(i64::from(self)),
        )
    }
}

impl<'a> ToArg<'a> for f64 {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(
            TypeTag::new(Size::Default, Category::Float),
            ArgValue::Float(self),
        )
    }
}

impl<'a> ToArg<'a> for f32 {
    fn to_arg(self) -> Arg<'a> {
        f64::from(self).to_arg()
    }
}

impl<'a> ToArg<'a> for u8 {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(
            TypeTag::new(Size::Short, Category::Char),
            ArgValue::Char(u32::from(self)),
        )
    }
}

impl<'a> ToArg<'a> for i8 {
    fn to_arg(self) -> Arg<'a> {
        (self as u8).to_arg()
    }
}

impl<'a> ToArg<'a> for char {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(
            TypeTag::new(Size::Long, Category::Char),
            ArgValue::Char(u32::from(self)),
        )
    }
}

const NARROW_TEXT: TypeTag = TypeTag::new(Size::Short, Category::String);
const WIDE_TEXT: TypeTag = TypeTag::new(Size::Long, Category::WideString);

impl<'a> ToArg<'a> for &'a str {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(NARROW_TEXT, ArgValue::Narrow(self.as_bytes()))
    }
}

impl<'a> ToArg<'a> for &'a String {
    fn to_arg(self) -> Arg<'a> {
        self.as_str().to_arg()
    }
}

/// Byte strings are C strings: text ends at the first NUL.
impl<'a> ToArg<'a> for &'a [u8] {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(NARROW_TEXT, ArgValue::Narrow(&self[..terminated_len(self)]))
    }
}

impl<'a, const N: usize> ToArg<'a> for &'a [u8; N] {
    fn to_arg(self) -> Arg<'a> {
        self.as_slice().to_arg()
    }
}

impl<'a> ToArg<'a> for &'a CStr {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(NARROW_TEXT, ArgValue::Narrow(self.to_bytes()))
    }
}

/// Wide strings end at the first NUL unit.
impl<'a> ToArg<'a> for &'a [u32] {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(WIDE_TEXT, ArgValue::Wide(&self[..terminated_len(self)]))
    }
}

impl<'a, const N: usize> ToArg<'a> for &'a [u32; N] {
    fn to_arg(self) -> Arg<'a> {
        self.as_slice().to_arg()
    }
}

impl<'a> ToArg<'a> for &'a Vec<u32> {
    fn to_arg(self) -> Arg<'a> {
        self.as_slice().to_arg()
    }
}

impl<'a, T: ?Sized> ToArg<'a> for *const T {
    fn to_arg(self) -> Arg<'a> {
        Arg::new(
            TypeTag::new(Size::Default, Category::Pointer),
            ArgValue::Pointer(self.addr()),
        )
    }
}

impl<'a, T: ?Sized> ToArg<'a> for *mut T {
    fn to_arg(self) -> Arg<'a> {
        self.cast_const().to_arg()
    }
}
