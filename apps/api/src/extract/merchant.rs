//! Merchant rule: the store name is almost always a short alphabetic line at
//! the top of the receipt, while numeric header lines are addresses, phone
//! numbers, or tax ids.

/// Scans the first `scan_lines` non-empty lines and returns the first one
/// that contains no digit and is longer than `min_len` after trimming.
pub fn detect_merchant(text: &str, scan_lines: usize, min_len: usize) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(scan_lines)
        .find(|line| line.chars().count() > min_len && !line.chars().any(|c| c.is_ascii_digit()))
        .map(str::to_string)
}
