//! Date rule: day-first dates with `/` or `-` separators, as printed on
//! Latin American receipts. Two-digit years are read as 20YY.

use chrono::NaiveDate;
use regex::Regex;

const DATE_PATTERN: &str = r"(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})";

#[derive(Debug, Clone)]
pub struct DateRule {
    re: Regex,
}

impl DateRule {
    pub fn new() -> Self {
        DateRule {
            re: Regex::new(DATE_PATTERN).expect("date pattern is valid"),
        }
    }

    /// Returns the first date-shaped token that forms a valid calendar date.
    /// Impossible components (month 13, day 32) leave the field absent.
    pub fn apply(&self, text: &str) -> Option<NaiveDate> {
        let capture = self.re.captures(text)?;

        let day: u32 = capture.get(1)?.as_str().parse().ok()?;
        let month: u32 = capture.get(2)?.as_str().parse().ok()?;
        let year_str = capture.get(3)?.as_str();
        let year: i32 = if year_str.len() == 2 {
            format!("20{year_str}").parse().ok()?
        } else {
            year_str.parse().ok()?
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }
}

impl Default for DateRule {
    fn default() -> Self {
        DateRule::new()
    }
}
