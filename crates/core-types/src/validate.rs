//! Shared validation for trade input.
//!
//! The buy path, the sell path, and the quote lookup all share this one
//! contract. It runs before any oracle call or balance read, so rejections
//! are deterministic whether or not the quote provider is reachable.

use crate::error::CoreError;

/// Parses a share quantity from raw request text.
///
/// Valid iff the trimmed text consists solely of base-10 digits (no sign, no
/// fractional part, no exponent) and denotes a strictly positive integer.
pub fn parse_share_quantity(raw: &str) -> Result<i64, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_shares("must be a positive whole number"));
    }
    let shares: i64 = trimmed
        .parse()
        .map_err(|_| invalid_shares("is out of range"))?;
    if shares == 0 {
        return Err(invalid_shares("must be greater than zero"));
    }
    Ok(shares)
}

/// Validates and normalizes a ticker symbol: non-empty after trimming,
/// uppercased.
pub fn normalize_symbol(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput(
            "symbol".to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_uppercase())
}

fn invalid_shares(reason: &str) -> CoreError {
    CoreError::InvalidInput("shares".to_string(), reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_positive_integers() {
        assert_eq!(parse_share_quantity("10").unwrap(), 10);
        assert_eq!(parse_share_quantity("1").unwrap(), 1);
        // Leading zeros are still all-digits.
        assert_eq!(parse_share_quantity("007").unwrap(), 7);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_share_quantity(" 25 ").unwrap(), 25);
    }

    #[test]
    fn rejects_zero_and_negatives() {
        assert!(parse_share_quantity("0").is_err());
        assert!(parse_share_quantity("-5").is_err());
    }

    #[test]
    fn rejects_non_integer_notation() {
        assert!(parse_share_quantity("1.5").is_err());
        assert!(parse_share_quantity("1e3").is_err());
        assert!(parse_share_quantity("+4").is_err());
        assert!(parse_share_quantity("ten").is_err());
        assert!(parse_share_quantity("").is_err());
        assert!(parse_share_quantity("  ").is_err());
    }

    #[test]
    fn rejects_quantities_beyond_i64() {
        assert!(parse_share_quantity("99999999999999999999").is_err());
    }

    #[test]
    fn normalizes_symbols_to_uppercase() {
        assert_eq!(normalize_symbol("aapl").unwrap(), "AAPL");
        assert_eq!(normalize_symbol(" nflx ").unwrap(), "NFLX");
        assert_eq!(normalize_symbol("MSFT").unwrap(), "MSFT");
    }

    #[test]
    fn rejects_blank_symbols() {
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("   ").is_err());
    }
}
