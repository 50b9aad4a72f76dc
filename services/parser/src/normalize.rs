//! Cell cleanup and code fragment padding.
//!
//! All functions here are total: malformed input degrades to a default.

/// Width of the territory (region) fragment
pub const TERRITORY_WIDTH: usize = 2;

/// Width of the level-1..3 fragments
pub const LEVEL_WIDTH: usize = 3;

/// Trim whitespace and one layer of enclosing quotes, then collapse runs of
/// spaces into one.
pub fn clean_string(s: &str) -> String {
    let trimmed = s.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted).trim();

    let mut out = String::with_capacity(unquoted.len());
    let mut previous_space = false;
    for c in unquoted.chars() {
        if c == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        out.push(c);
    }
    out
}

/// Keep only ASCII digits and left-pad with zeroes to `width`.
///
/// Longer digit strings are kept as-is, never truncated.
pub fn pad_digits(s: &str, width: usize) -> String {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{:0>width$}", digits, width = width)
}

/// Level fragment normalization: digits only, three wide. Empty → `"000"`.
pub fn clean_code_part(s: &str) -> String {
    pad_digits(s, LEVEL_WIDTH)
}

/// Territory fragment normalization: digits only, two wide. Empty → `"00"`.
pub fn clean_territory(s: &str) -> String {
    pad_digits(s, TERRITORY_WIDTH)
}

/// Parse the leading digits of a status-like field. Garbage → 0.
pub fn parse_number(s: &str) -> u32 {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Cut `s` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
