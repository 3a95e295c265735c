//! Output sinks.
//!
//! A sink receives the rendered text of one call, one segment at a time: each
//! literal run and each rendered directive is a single write.

use std::io::{self, Write};

use crate::unit::{FmtUnit, wide_char};

/// Destination of formatted output in units of `U`.
pub trait Sink<U: FmtUnit> {
    /// Accept one segment of output.
    fn write_units(&mut self, units: &[U]) -> io::Result<()>;
}

impl<U: FmtUnit> Sink<U> for Vec<U> {
    fn write_units(&mut self, units: &[U]) -> io::Result<()> {
        self.extend_from_slice(units);
        Ok(())
    }
}

/// Narrow output into a `String`. Invalid UTF-8 becomes U+FFFD.
impl Sink<u8> for String {
    fn write_units(&mut self, units: &[u8]) -> io::Result<()> {
        self.push_str(&String::from_utf8_lossy(units));
        Ok(())
    }
}

/// Wide output into a `String`. Non-scalar units become U+FFFD.
impl Sink<u32> for String {
    fn write_units(&mut self, units: &[u32]) -> io::Result<()> {
        self.extend(units.iter().map(|&u| wide_char(u)));
        Ok(())
    }
}

impl<U: FmtUnit, S: Sink<U> + ?Sized> Sink<U> for &mut S {
    fn write_units(&mut self, units: &[U]) -> io::Result<()> {
        (**self).write_units(units)
    }
}

/// Adapter writing narrow output to any [`io::Write`].
#[derive(Debug)]
pub struct IoSink<W: Write> {
    inner: W,
}

impl<W: Write> IoSink<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink<u8> for IoSink<W> {
    fn write_units(&mut self, units: &[u8]) -> io::Result<()> {
        self.inner.write_all(units)
    }
}
