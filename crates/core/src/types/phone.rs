//! Customer phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is empty or only whitespace.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not exactly ten digits once whitespace is removed.
    #[error("phone number must be exactly {expected} digits")]
    InvalidDigits {
        /// Required digit count.
        expected: usize,
    },
}

/// A ten-digit domestic phone number.
///
/// Whitespace is stripped on parse, so `"98765 43210"` and `"9876543210"`
/// produce the same value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Number of digits a valid phone number has.
    pub const DIGITS: usize = 10;

    /// Parse a phone number, ignoring any whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::InvalidDigits`] unless exactly ten ASCII digits remain.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        if compact.is_empty() {
            return Err(PhoneError::Empty);
        }

        if compact.len() != Self::DIGITS || !compact.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::InvalidDigits {
                expected: Self::DIGITS,
            });
        }

        Ok(Self(compact))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_digits() {
        assert_eq!(PhoneNumber::parse("9876543210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_parse_strips_whitespace() {
        let phone = PhoneNumber::parse(" 98765 43210\t").unwrap();
        assert_eq!(phone.to_string(), "9876543210");
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            PhoneNumber::parse("12345"),
            Err(PhoneError::InvalidDigits { expected: 10 })
        ));
        assert!(PhoneNumber::parse("98765432100").is_err());
    }

    #[test]
    fn test_parse_rejects_punctuation() {
        assert!(PhoneNumber::parse("98765-4321").is_err());
        assert!(PhoneNumber::parse("+919876543").is_err());
    }
}
