//! Diff rendering for fixture comparison.

use std::fmt::Write;

/// Render a line diff between expected and actual output. Each differing
/// line names the first differing column; control characters are escaped.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let actual_lines: Vec<&str> = actual.split('\n').collect();
    let mut out = String::from("--- expected\n+++ actual\n");
    for i in 0..expected_lines.len().max(actual_lines.len()) {
        let e = expected_lines.get(i).copied();
        let a = actual_lines.get(i).copied();
        if e == a {
            continue;
        }
        let column = first_difference(e.unwrap_or(""), a.unwrap_or("")) + 1;
        let _ = writeln!(out, "@@ line {}, column {column} @@", i + 1);
        if let Some(e) = e {
            let _ = writeln!(out, "-{}", e.escape_debug());
        }
        if let Some(a) = a {
            let _ = writeln!(out, "+{}", a.escape_debug());
        }
    }
    out
}

/// Index, in characters, of the first position where `a` and `b` differ.
#[must_use]
pub fn first_difference(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs() {
        assert_eq!(render_diff("same", "same"), "[identical]");
    }

    #[test]
    fn single_line_difference_reports_column() {
        let diff = render_diff("  3.14", "  3.15");
        assert!(diff.contains("@@ line 1, column 6 @@"), "{diff}");
        assert!(diff.contains("-  3.14\n"));
        assert!(diff.contains("+  3.15\n"));
    }

    #[test]
    fn extra_lines_are_shown() {
        let diff = render_diff("a", "a\nb");
        assert!(diff.contains("@@ line 2, column 1 @@"), "{diff}");
        assert!(diff.contains("+b\n"));
        assert!(!diff.contains("-a"));
    }

    #[test]
    fn control_characters_are_escaped() {
        let diff = render_diff("x\t", "x ");
        assert!(diff.contains("-x\\t"), "{diff}");
    }

    #[test]
    fn first_difference_counts_chars() {
        assert_eq!(first_difference("héllo", "hélp"), 3);
        assert_eq!(first_difference("", "x"), 0);
        assert_eq!(first_difference("ab", "ab"), 2);
    }
}
