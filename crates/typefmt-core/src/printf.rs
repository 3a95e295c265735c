//! The format-string scanner.
//!
//! A [`Printf`] walks its format string one directive per argument.
//! Construction emits the leading literal text; every pushed argument parses
//! the next directive, validates the argument against it, renders it and emits
//! the literal run that follows. [`Printf::finish`] checks that no directive
//! is left over. Structural errors (a trailing `%`, a malformed directive) are
//! found up front, before any output, whatever the arguments.
//!
//! Dropping a `Printf` that still has directives left, without calling
//! `finish`, panics with the too-few-arguments error when validation is on.

use crate::arg::{Arg, ToArg};
use crate::config::{FormatConfig, global_config};
use crate::directive::parse_directive;
use crate::error::{FormatError, MalformedReason};
use crate::matrix::{CompatibilityMatrix, compatibility_matrix};
use crate::metrics::{FormatMetrics, global_metrics};
use crate::render::render;
use crate::sink::Sink;
use crate::unit::FmtUnit;

/// Headroom added to every render buffer beyond width, precision and string
/// length (sign, prefix, exponent, digits).
pub const RENDER_MARGIN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallState {
    Active,
    Finished,
    Failed,
}

/// One formatting call in progress.
pub struct Printf<'s, 'f, U: FmtUnit, S: Sink<U> + ?Sized> {
    sink: &'s mut S,
    fmt: &'f [U],
    pos: usize,
    supplied: usize,
    config: FormatConfig,
    matrix: CompatibilityMatrix,
    state: CallState,
}

impl<'s, 'f, U: FmtUnit, S: Sink<U> + ?Sized> Printf<'s, 'f, U, S> {
    /// Start a call under the process-wide configuration.
    pub fn new<F>(sink: &'s mut S, fmt: &'f F) -> Result<Self, FormatError>
    where
        F: AsRef<[U]> + ?Sized,
    {
        Self::unstarted(sink, fmt.as_ref(), global_config(), *compatibility_matrix()).start()
    }

    /// Start a call under an explicit configuration.
    pub fn with_config<F>(
        sink: &'s mut S,
        fmt: &'f F,
        config: FormatConfig,
    ) -> Result<Self, FormatError>
    where
        F: AsRef<[U]> + ?Sized,
    {
        let matrix = CompatibilityMatrix::from_config(&config);
        Self::unstarted(sink, fmt.as_ref(), config, matrix).start()
    }

    fn unstarted(
        sink: &'s mut S,
        fmt: &'f [U],
        config: FormatConfig,
        matrix: CompatibilityMatrix,
    ) -> Self {
        Self {
            sink,
            fmt,
            pos: 0,
            supplied: 0,
            config,
            matrix,
            state: CallState::Active,
        }
    }

    fn start(mut self) -> Result<Self, FormatError> {
        FormatMetrics::inc(&global_metrics().calls);
        if let Err(err) = check_structure(self.fmt) {
            return Err(self.fail(err));
        }
        match self.emit_static_text() {
            Ok(()) => Ok(self),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Supply the next argument.
    pub fn arg<'a, A: ToArg<'a>>(self, value: A) -> Result<Self, FormatError> {
        self.push(value.to_arg())
    }

    /// Supply the next argument, already tagged.
    pub fn push(mut self, arg: Arg<'_>) -> Result<Self, FormatError> {
        let index = self.supplied;
        self.supplied += 1;
        let validate = self.config.validation_enabled();

        if self.pos >= self.fmt.len() {
            if !validate {
                return Ok(self);
            }
            return Err(self.fail(FormatError::TooManyArguments { index }));
        }

        let parsed = match parse_directive(self.fmt, self.pos) {
            Ok(parsed) => parsed,
            Err(err) => return Err(self.fail(err)),
        };
        let directive = parsed.directive;

        if validate {
            let tag = arg.tag();
            if let Err(reason) = self
                .matrix
                .check(tag, directive.size, directive.conversion)
            {
                let err = FormatError::TypeMismatch {
                    position: self.pos,
                    directive: parsed.text.to_string(),
                    size: directive.size,
                    conversion: char::from(directive.conversion),
                    index,
                    actual: tag,
                    reason,
                };
                return Err(self.fail(err));
            }
        }

        let mut rendered = Vec::with_capacity(render_capacity(
            directive.width,
            directive.precision,
            (directive.conversion == b's').then(|| arg.text_len()),
        ));
        render(&directive, &arg, &mut rendered);
        self.pos = parsed.end;
        FormatMetrics::inc(&global_metrics().directives);

        if let Err(err) = self.sink.write_units(&rendered) {
            return Err(self.fail(err.into()));
        }
        match self.emit_static_text() {
            Ok(()) => Ok(self),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// End the call, checking that every directive received an argument.
    pub fn finish(mut self) -> Result<(), FormatError> {
        if self.pos < self.fmt.len() && self.config.validation_enabled() {
            let err = self.too_few();
            return Err(self.fail(err));
        }
        self.state = CallState::Finished;
        Ok(())
    }

    /// Offset of the next unconsumed unit.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Arguments pushed so far.
    pub fn supplied(&self) -> usize {
        self.supplied
    }

    pub fn config(&self) -> FormatConfig {
        self.config
    }

    /// Copy literal text up to the next directive, collapsing `%%`.
    fn emit_static_text(&mut self) -> Result<(), FormatError> {
        let fmt = self.fmt;
        let mut run_start = self.pos;

        while self.pos < fmt.len() {
            if fmt[self.pos].to_ascii() != Some(b'%') {
                self.pos += 1;
                continue;
            }
            match fmt.get(self.pos + 1) {
                None => {
                    self.write_literal(&fmt[run_start..self.pos])?;
                    return Err(FormatError::malformed(
                        self.pos,
                        MalformedReason::TrailingPercent,
                    ));
                }
                Some(next) if next.to_ascii() == Some(b'%') => {
                    // Emit through the first '%', skip the second.
                    self.write_literal(&fmt[run_start..=self.pos])?;
                    self.pos += 2;
                    run_start = self.pos;
                }
                Some(_) => break,
            }
        }
        self.write_literal(&fmt[run_start..self.pos])
    }

    fn write_literal(&mut self, units: &[U]) -> Result<(), FormatError> {
        if units.is_empty() {
            return Ok(());
        }
        self.sink.write_units(units)?;
        FormatMetrics::add(&global_metrics().literal_units, units.len() as u64);
        Ok(())
    }

    fn too_few(&self) -> FormatError {
        FormatError::TooFewArguments {
            supplied: self.supplied,
            position: self.pos,
        }
    }

    fn fail(mut self, err: FormatError) -> FormatError {
        self.state = CallState::Failed;
        global_metrics().record_failure(err.kind());
        err
    }
}

impl<U: FmtUnit, S: Sink<U> + ?Sized> Drop for Printf<'_, '_, U, S> {
    fn drop(&mut self) {
        if self.state == CallState::Active
            && self.pos < self.fmt.len()
            && self.config.validation_enabled()
            && !std::thread::panicking()
        {
            self.state = CallState::Failed;
            let err = self.too_few();
            global_metrics().record_failure(err.kind());
            panic!("{err}");
        }
    }
}

/// Walk the whole format string once and return its directive count, or the
/// first structural error.
pub fn check_structure<U: FmtUnit>(fmt: &[U]) -> Result<usize, FormatError> {
    let mut pos = 0;
    let mut directives = 0;
    while pos < fmt.len() {
        if fmt[pos].to_ascii() != Some(b'%') {
            pos += 1;
            continue;
        }
        match fmt.get(pos + 1) {
            None => {
                return Err(FormatError::malformed(
                    pos,
                    MalformedReason::TrailingPercent,
                ));
            }
            Some(next) if next.to_ascii() == Some(b'%') => pos += 2,
            Some(_) => {
                pos = parse_directive(fmt, pos)?.end;
                directives += 1;
            }
        }
    }
    Ok(directives)
}

/// Buffer size for one rendered directive.
#[must_use]
pub fn render_capacity(width: usize, precision: Option<usize>, text_len: Option<usize>) -> usize {
    width
        .max(precision.unwrap_or(0))
        .max(text_len.unwrap_or(0))
        .saturating_add(RENDER_MARGIN)
}

/// Run one whole call: format `fmt` with `args` into `sink`.
pub fn format_to<U, S>(
    sink: &mut S,
    fmt: &[U],
    args: &[Arg<'_>],
    config: FormatConfig,
) -> Result<(), FormatError>
where
    U: FmtUnit,
    S: Sink<U> + ?Sized,
{
    let mut printf = Printf::with_config(sink, fmt, config)?;
    for &arg in args {
        printf = printf.push(arg)?;
    }
    printf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, MismatchReason};

    fn run(fmt: &str, args: &[Arg<'_>], config: FormatConfig) -> (Vec<u8>, Result<(), FormatError>) {
        let mut out = Vec::new();
        let result = format_to(&mut out, fmt.as_bytes(), args, config);
        (out, result)
    }

    #[test]
    fn builder_formats_in_order() {
        let mut out: Vec<u8> = Vec::new();
        Printf::with_config(&mut out, "x=%d y=%s!", FormatConfig::lenient())
            .and_then(|p| p.arg(1))
            .and_then(|p| p.arg("two"))
            .and_then(Printf::finish)
            .unwrap();
        assert_eq!(out, b"x=1 y=two!");
    }

    #[test]
    fn leading_text_is_emitted_on_construction() {
        let mut out: Vec<u8> = Vec::new();
        let printf = Printf::with_config(&mut out, "ab%%c%d", FormatConfig::lenient()).unwrap();
        assert_eq!(printf.position(), 5);
        printf.arg(1).unwrap().finish().unwrap();
        assert_eq!(out, b"ab%c1");
    }

    #[test]
    fn escapes_consume_no_arguments() {
        let (out, result) = run("100%% of %d%%", &[7_i32.to_arg()], FormatConfig::lenient());
        result.unwrap();
        assert_eq!(out, b"100% of 7%");
    }

    #[test]
    fn too_many_arguments() {
        let (out, result) = run("%d", &[1_i32.to_arg(), 2_i32.to_arg()], FormatConfig::lenient());
        assert!(matches!(
            result,
            Err(FormatError::TooManyArguments { index: 1 })
        ));
        assert_eq!(out, b"1");
    }

    #[test]
    fn too_few_arguments_after_rendering_supplied_ones() {
        let (out, result) = run("%d-%d", &[1_i32.to_arg()], FormatConfig::lenient());
        assert!(matches!(
            result,
            Err(FormatError::TooFewArguments {
                supplied: 1,
                position: 3
            })
        ));
        assert_eq!(out, b"1-");
    }

    #[test]
    fn type_mismatch_reports_directive() {
        let (_, result) = run("ab %5s", &[42_i32.to_arg()], FormatConfig::lenient());
        match result {
            Err(FormatError::TypeMismatch {
                position,
                directive,
                conversion,
                index,
                reason,
                ..
            }) => {
                assert_eq!(position, 3);
                assert_eq!(directive, "%5s");
                assert_eq!(conversion, 's');
                assert_eq!(index, 0);
                assert_eq!(reason, MismatchReason::SizeClass);
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn trailing_percent_fails_before_any_output() {
        let mut out: Vec<u8> = Vec::new();
        let err = Printf::with_config(&mut out, "abc%", FormatConfig::lenient())
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::MalformedFormat);
        assert_eq!(err.position(), Some(3));
        assert!(out.is_empty());
    }

    #[test]
    fn trailing_percent_wins_over_missing_arguments() {
        let (_, result) = run("%d%", &[], FormatConfig::lenient());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedFormat);
    }

    #[test]
    fn structure_check_counts_directives() {
        assert_eq!(check_structure(b"a%db%%c%5.2f").unwrap(), 2);
        assert_eq!(check_structure(b"no directives %%").unwrap(), 0);
        assert!(check_structure(b"%d %").is_err());
        assert!(check_structure(b"%d %y").is_err());
    }

    #[test]
    fn trailing_percent_after_directive() {
        let (_, result) = run("%d%", &[1_i32.to_arg()], FormatConfig::lenient());
        assert!(matches!(
            result,
            Err(FormatError::MalformedFormat {
                position: 2,
                reason: MalformedReason::TrailingPercent
            })
        ));
    }

    #[test]
    fn unchecked_ignores_count_and_type_errors() {
        let config = FormatConfig::unchecked();
        let (out, result) = run("%d", &[1_i32.to_arg(), 2_i32.to_arg()], config);
        result.unwrap();
        assert_eq!(out, b"1");

        let (out, result) = run("a%db%d", &[1_i32.to_arg()], config);
        result.unwrap();
        assert_eq!(out, b"a1b");

        let (out, result) = run("[%s]", &[42_i32.to_arg()], config);
        result.unwrap();
        assert_eq!(out, b"[42]");
    }

    #[test]
    fn unchecked_still_reports_malformed_formats() {
        let (_, result) = run("%q", &[1_i32.to_arg()], FormatConfig::unchecked());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedFormat);
    }

    #[test]
    fn wide_format_into_wide_sink() {
        let fmt: Vec<u32> = "n=%d %hs %c".chars().map(u32::from).collect();
        let mut out: Vec<u32> = Vec::new();
        format_to(
            &mut out,
            &fmt,
            &[5_i32.to_arg(), "ok".to_arg(), 'é'.to_arg()],
            FormatConfig::lenient(),
        )
        .unwrap();
        let text: String = out.into_iter().filter_map(char::from_u32).collect();
        assert_eq!(text, "n=5 ok é");
    }

    #[test]
    fn narrow_text_in_wide_format_needs_short_marker() {
        let fmt: Vec<u32> = "%s".chars().map(u32::from).collect();
        let mut out: Vec<u32> = Vec::new();
        let err = format_to(&mut out, &fmt, &["x".to_arg()], FormatConfig::lenient())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn render_capacity_covers_widest_field() {
        assert_eq!(render_capacity(0, None, None), RENDER_MARGIN);
        assert_eq!(render_capacity(10, Some(4), None), 10 + RENDER_MARGIN);
        assert_eq!(render_capacity(3, Some(40), Some(7)), 40 + RENDER_MARGIN);
        assert_eq!(render_capacity(3, None, Some(70)), 70 + RENDER_MARGIN);
        assert_eq!(render_capacity(usize::MAX, None, None), usize::MAX);
    }

    #[cfg(not(feature = "unchecked"))]
    #[test]
    #[should_panic(expected = "printf: too few arguments")]
    fn dropping_unfinished_call_panics() {
        let mut out: Vec<u8> = Vec::new();
        let printf = Printf::with_config(&mut out, "%d %d", FormatConfig::lenient()).unwrap();
        let _half = printf.arg(1).unwrap();
    }

    #[test]
    fn dropping_completed_call_is_silent() {
        let mut out: Vec<u8> = Vec::new();
        let printf = Printf::with_config(&mut out, "%d", FormatConfig::lenient()).unwrap();
        drop(printf.arg(1).unwrap());
        assert_eq!(out, b"1");
    }

    #[test]
    fn new_uses_process_wide_matrix() {
        let mut out: Vec<u8> = Vec::new();
        let printf = Printf::new(&mut out, "x").unwrap();
        assert_eq!(printf.matrix, *compatibility_matrix());
        printf.finish().unwrap();

        let printf = Printf::with_config(&mut out, "y", FormatConfig::strict()).unwrap();
        assert_eq!(printf.matrix, CompatibilityMatrix::from_config(&FormatConfig::strict()));
        printf.finish().unwrap();
        assert_eq!(out, b"xy");
    }
}
