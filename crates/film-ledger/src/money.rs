//! Currency text → whole currency units.

/// Result of reading a currency cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    /// Nothing left after stripping formatting.
    Blank,
    Value(u64),
    /// Text that is not a whole non-negative number.
    Invalid,
}

impl Amount {
    /// Blank counts as zero; invalid text has no value.
    pub fn or_zero(self) -> Option<u64> {
        match self {
            Amount::Blank => Some(0),
            Amount::Value(v) => Some(v),
            Amount::Invalid => None,
        }
    }
}

/// Remove `$` and `,` and surrounding whitespace.
pub fn strip_currency(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse text such as `"$20,000,000"`.
pub fn parse_amount(raw: &str) -> Amount {
    let digits = strip_currency(raw);
    if digits.is_empty() {
        return Amount::Blank;
    }
    match digits.parse::<u64>() {
        Ok(v) => Amount::Value(v),
        Err(_) => Amount::Invalid,
    }
}

/// Parse a budget cell, ignoring a trailing annotation such as
/// `"$2,000,000 (Estimated)"`.
pub fn parse_budget_text(raw: &str) -> Amount {
    let head = raw.trim().split(" (").next().unwrap_or_default();
    parse_amount(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formatted_amount() {
        assert_eq!(parse_amount("$20,000,000"), Amount::Value(20_000_000));
        assert_eq!(parse_amount(" 1,234 "), Amount::Value(1_234));
        assert_eq!(parse_amount("42"), Amount::Value(42));
    }

    #[test]
    fn test_blank_amount_is_zero() {
        assert_eq!(parse_amount(""), Amount::Blank);
        assert_eq!(parse_amount("$"), Amount::Blank);
        assert_eq!(parse_amount("").or_zero(), Some(0));
    }

    #[test]
    fn test_invalid_amount() {
        assert_eq!(parse_amount("Error accessing the page"), Amount::Invalid);
        assert_eq!(parse_amount("-$5"), Amount::Invalid);
        assert_eq!(parse_amount("$1.5 million"), Amount::Invalid);
        assert_eq!(parse_amount("n/a").or_zero(), None);
    }

    #[test]
    fn test_budget_annotation_is_ignored() {
        assert_eq!(
            parse_budget_text("$2,000,000 (Estimated)"),
            Amount::Value(2_000_000)
        );
        assert_eq!(parse_budget_text("  $63,000,000  "), Amount::Value(63_000_000));
        assert_eq!(parse_budget_text("$ (Estimated)"), Amount::Blank);
        assert_eq!(parse_budget_text("(unknown)"), Amount::Invalid);
    }
}
