//! Directive/argument compatibility rules.

use std::sync::OnceLock;

use crate::arg::{Category, Size, TypeTag};
use crate::config::{FormatConfig, global_config};
use crate::error::MismatchReason;

/// Legal conversions per category and required size marker per size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompatibilityMatrix {
    strict_sign: bool,
    strict_int_size: bool,
}

impl CompatibilityMatrix {
    #[must_use]
    pub const fn new(strict_sign: bool, strict_int_size: bool) -> Self {
        Self {
            strict_sign,
            strict_int_size,
        }
    }

    #[must_use]
    pub const fn from_config(config: &FormatConfig) -> Self {
        Self::new(config.strict_sign, config.strict_int_size)
    }

    #[must_use]
    pub const fn strict_sign(&self) -> bool {
        self.strict_sign
    }

    #[must_use]
    pub const fn strict_int_size(&self) -> bool {
        self.strict_int_size
    }

    /// Conversion characters accepted for `category`.
    #[must_use]
    pub const fn legal_conversions(&self, category: Category) -> &'static [u8] {
        match category {
            Category::Int if self.strict_sign => b"dioxX",
            Category::Unsigned if self.strict_sign => b"uoxX",
            Category::Int | Category::Unsigned => b"diuoxX",
            Category::Float => b"eEfgG",
            Category::Char => b"c",
            Category::String | Category::WideString => b"sp",
            Category::Pointer => b"p",
        }
    }

    /// Check an argument tag against a directive's resolved size marker and
    /// conversion.
    ///
    /// An unsigned short doubles as a wide character: with `c` it needs the
    /// `l` marker, with anything else the `h` marker.
    pub fn check(&self, tag: TypeTag, marker: Size, conversion: u8) -> Result<(), MismatchReason> {
        let text = matches!(tag.category, Category::String | Category::WideString);
        let unsigned_short = tag.category == Category::Unsigned && tag.size == Size::Short;

        if text && conversion == b'p' {
            if marker != Size::Default {
                return Err(MismatchReason::PointerSizeMarker);
            }
        } else if unsigned_short {
            let required = if conversion == b'c' {
                Size::Long
            } else {
                Size::Short
            };
            if marker != required {
                return Err(MismatchReason::SizeClass);
            }
        } else if !self.size_matches(tag.size, marker) {
            return Err(MismatchReason::SizeClass);
        }

        let legal = self.legal_conversions(tag.category).contains(&conversion)
            || (unsigned_short && conversion == b'c');
        if legal {
            Ok(())
        } else {
            Err(MismatchReason::Conversion)
        }
    }

    /// `int` and `long` are interchangeable unless strict int size is on.
    const fn size_matches(&self, actual: Size, marker: Size) -> bool {
        match (actual, marker) {
            (Size::Default, Size::Default)
            | (Size::Short, Size::Short)
            | (Size::Long, Size::Long)
            | (Size::Int64, Size::Int64) => true,
            (Size::Default, Size::Long) | (Size::Long, Size::Default) => !self.strict_int_size,
            _ => false,
        }
    }
}

impl Default for CompatibilityMatrix {
    fn default() -> Self {
        Self::from_config(&FormatConfig::default())
    }
}

static GLOBAL_MATRIX: OnceLock<CompatibilityMatrix> = OnceLock::new();

/// The process-wide matrix, built once from [`global_config`].
#[must_use]
pub fn compatibility_matrix() -> &'static CompatibilityMatrix {
    GLOBAL_MATRIX.get_or_init(|| CompatibilityMatrix::from_config(&global_config()))
}
