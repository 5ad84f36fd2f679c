//! Extraction engine — turns recognized receipt text into a structured guess.
//!
//! Three independent rules (merchant, amount, date), each pure and total,
//! composed by `ReceiptExtractor`. A rule that finds nothing leaves its field
//! absent; no input can make extraction fail.

pub mod amount;
pub mod date;
pub mod merchant;

use chrono::NaiveDate;

use crate::extract::amount::AmountRule;
use crate::extract::date::DateRule;

/// Tunables for the extraction heuristics. Carried explicitly so tests and
/// callers construct engines with known behavior instead of reading globals.
#[derive(Debug, Clone, Copy)]
pub struct ExtractorConfig {
    /// Confidence reported whenever the recognized text is non-blank.
    /// Independent of how many fields actually matched.
    pub baseline_confidence: f64,
    /// How many non-empty header lines the merchant rule inspects.
    pub header_scan_lines: usize,
    /// Minimum trimmed length for a line to qualify as a merchant name.
    pub min_merchant_len: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            baseline_confidence: 0.85,
            header_scan_lines: 5,
            min_merchant_len: 3,
        }
    }
}

/// The structured guess produced for one receipt text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub merchant: Option<String>,
    pub total_amount: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub confidence: f64,
}

impl ExtractedFields {
    fn empty() -> Self {
        ExtractedFields {
            merchant: None,
            total_amount: None,
            purchase_date: None,
            confidence: 0.0,
        }
    }
}

/// Deterministic, side-effect-free extractor. Regexes compile once here.
#[derive(Debug, Clone)]
pub struct ReceiptExtractor {
    config: ExtractorConfig,
    amount: AmountRule,
    date: DateRule,
}

impl ReceiptExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        ReceiptExtractor {
            config,
            amount: AmountRule::new(),
            date: DateRule::new(),
        }
    }

    /// Runs every rule over the recognized text. Blank input short-circuits
    /// to an all-absent result with zero confidence.
    pub fn extract(&self, text: &str) -> ExtractedFields {
        if text.trim().is_empty() {
            return ExtractedFields::empty();
        }

        ExtractedFields {
            merchant: merchant::detect_merchant(
                text,
                self.config.header_scan_lines,
                self.config.min_merchant_len,
            ),
            total_amount: self.amount.apply(text),
            purchase_date: self.date.apply(text),
            confidence: self.config.baseline_confidence,
        }
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        ReceiptExtractor::new(ExtractorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_zero_confidence() {
        let result = ReceiptExtractor::default().extract("");
        assert_eq!(result, ExtractedFields::empty());
    }

    #[test]
    fn test_whitespace_text_yields_zero_confidence() {
        let result = ReceiptExtractor::default().extract("   \n\t  \n");
        assert_eq!(result.confidence, 0.0);
        assert!(result.merchant.is_none());
        assert!(result.total_amount.is_none());
        assert!(result.purchase_date.is_none());
    }

    #[test]
    fn test_nonempty_text_gets_baseline_confidence() {
        let result = ReceiptExtractor::default().extract("just some words");
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_confidence_independent_of_matched_fields() {
        let extractor = ReceiptExtractor::default();
        let nothing = extractor.extract("zz zz");
        let everything = extractor.extract("SUPERMERCADO ABC\n20-12-2023\nTotal: $50.00");
        assert_eq!(nothing.confidence, everything.confidence);
    }

    #[test]
    fn test_supermarket_scenario() {
        let result =
            ReceiptExtractor::default().extract("SUPERMERCADO ABC\nDireccion 123\nTotal: $50.00");
        assert_eq!(result.merchant.as_deref(), Some("SUPERMERCADO ABC"));
        assert_eq!(result.total_amount, Some(50.00));
    }

    #[test]
    fn test_dated_receipt_scenario() {
        let result =
            ReceiptExtractor::default().extract("Tienda ABC\nFecha: 20-12-2023\nTotal: $75.25");
        assert_eq!(
            result.purchase_date,
            NaiveDate::from_ymd_opt(2023, 12, 20)
        );
        assert_eq!(result.total_amount, Some(75.25));
    }

    #[test]
    fn test_non_text_garbage_never_panics() {
        let extractor = ReceiptExtractor::default();
        for input in ["\u{0}\u{1}\u{2}", "€€€€", "////----", "\n\n\n$"] {
            let result = extractor.extract(input);
            assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
        }
    }

    #[test]
    fn test_custom_baseline_is_respected() {
        let extractor = ReceiptExtractor::new(ExtractorConfig {
            baseline_confidence: 0.5,
            ..ExtractorConfig::default()
        });
        assert_eq!(extractor.extract("Tienda").confidence, 0.5);
    }
}
