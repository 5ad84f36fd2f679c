//! Amount rule: finds the purchase total among the currency-shaped tokens in
//! the text.
//!
//! Policy: line-prioritized. The first line containing `TOTAL`
//! (case-insensitive) or a `$` wins, and the last currency token on that line
//! is taken. Only when no such line exists does the rule fall back to the
//! last token in the whole text. Receipts list item prices before the total,
//! so within a candidate region the last token is the better guess.

use regex::Regex;

/// Optional `$`, 1-3 digits, optional comma-separated thousands groups,
/// optional 2-digit fraction.
const AMOUNT_PATTERN: &str = r"\$?\s*(\d{1,3}(?:,\d{3})*(?:\.\d{2})?)";

#[derive(Debug, Clone)]
pub struct AmountRule {
    re: Regex,
}

impl AmountRule {
    pub fn new() -> Self {
        AmountRule {
            re: Regex::new(AMOUNT_PATTERN).expect("amount pattern is valid"),
        }
    }

    pub fn apply(&self, text: &str) -> Option<f64> {
        let total_line = text
            .lines()
            .find(|line| line.to_uppercase().contains("TOTAL") || line.contains('$'));

        match total_line {
            Some(line) => self.last_token(line),
            None => self.last_token(text),
        }
    }

    fn last_token(&self, haystack: &str) -> Option<f64> {
        let capture = self.re.captures_iter(haystack).last()?;
        parse_amount(capture.get(1)?.as_str())
    }
}

impl Default for AmountRule {
    fn default() -> Self {
        AmountRule::new()
    }
}

/// Strips thousands separators and converts. A token that fails conversion
/// is discarded, never coerced to zero.
fn parse_amount(token: &str) -> Option<f64> {
    token.replace(',', "").parse::<f64>().ok()
}
