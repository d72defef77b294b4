//! Duration tag parser.
//!
//! Extracts a month count from the free-text `Duration` tag. The tag is
//! operator-supplied and frequently messy; anything that does not contain
//! a digit run followed by "month"/"months" simply yields no result, which
//! is a normal outcome and not an error.

use regex_lite::Regex;
use std::sync::OnceLock;

fn month_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)(\d+)\s*months?").expect("static pattern is valid"))
}

/// Parse the first `<digits> month(s)` occurrence out of `text`.
///
/// Returns `None` when no such pattern exists, or when the digit run
/// overflows `u32` (a value that large is never a usable lifetime).
pub fn parse_duration_months(text: &str) -> Option<u32> {
    let captures = month_pattern().captures(text)?;
    captures.get(1)?.as_str().parse().ok()
}
