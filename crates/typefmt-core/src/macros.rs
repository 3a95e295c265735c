/// Format narrow output into a sink, panicking on programmer errors.
///
/// Arguments are anything implementing [`ToArg`](crate::ToArg); owned
/// strings are passed by reference (`&owned`). Evaluates to `std::io::Result<()>`.
///
/// ```
/// let mut out: Vec<u8> = Vec::new();
/// typefmt_core::oprintf!(&mut out, "%s=%d\n", "answer", 42).unwrap();
/// assert_eq!(out, b"answer=42\n");
/// ```
#[macro_export]
macro_rules! oprintf {
    ($sink:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::oprintf($sink, $fmt, &[$($crate::ToArg::to_arg($arg)),*])
    }};
}

/// Format narrow text into a [`FormattedString`](crate::FormattedString),
/// panicking on programmer errors.
///
/// ```
/// let s = typefmt_core::strprintf!("%5.2f|%-3s|", 3.14159, "ab");
/// assert_eq!(s.as_str(), " 3.14|ab |");
/// ```
#[macro_export]
macro_rules! strprintf {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::strprintf($fmt, &[$($crate::ToArg::to_arg($arg)),*])
    }};
}

/// Format wide text into a [`WideString`](crate::WideString), panicking on
/// programmer errors. The format literal is converted to wide units first,
/// so narrow text arguments need `%hs`.
///
/// ```
/// let w = typefmt_core::wstrprintf!("%hs:%d", "k", 7);
/// assert_eq!(w.to_string_lossy(), "k:7");
/// ```
#[macro_export]
macro_rules! wstrprintf {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::wstrprintf(&$crate::WideString::from($fmt), &[$($crate::ToArg::to_arg($arg)),*])
    }};
}
