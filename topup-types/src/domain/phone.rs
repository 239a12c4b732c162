//! Colombian mobile phone number value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

const REQUIRED_LENGTH: usize = 10;
const REQUIRED_PREFIX: char = '3';

/// A validated mobile phone number: exactly 10 ASCII digits starting with `3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validates and wraps a raw phone number. Surrounding whitespace is ignored.
    pub fn of(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();

        if value.is_empty() {
            return Err(ValidationError::PhoneEmpty);
        }
        if value.chars().count() != REQUIRED_LENGTH {
            return Err(ValidationError::PhoneLength);
        }
        if !value.starts_with(REQUIRED_PREFIX) {
            return Err(ValidationError::PhonePrefix);
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::PhoneNotNumeric);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three-digit operator prefix, e.g. `"300"`.
    pub fn prefix(&self) -> &str {
        &self.0[..3]
    }

    pub fn has_prefix_in(&self, prefixes: &[&str]) -> bool {
        prefixes.contains(&self.prefix())
    }

    pub fn is_claro_number(&self) -> bool {
        self.has_prefix_in(super::supplier::CLARO_PREFIXES)
    }

    pub fn is_movistar_number(&self) -> bool {
        self.has_prefix_in(super::supplier::MOVISTAR_PREFIXES)
    }

    pub fn is_tigo_number(&self) -> bool {
        self.has_prefix_in(super::supplier::TIGO_PREFIXES)
    }

    pub fn is_wom_number(&self) -> bool {
        self.has_prefix_in(super::supplier::WOM_PREFIXES)
    }

    /// Formats as `(300) 123-4567`.
    pub fn to_display_format(&self) -> String {
        format!("({}) {}-{}", &self.0[..3], &self.0[3..6], &self.0[6..])
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_phone() {
        let phone = PhoneNumber::of("3001234567").unwrap();
        assert_eq!(phone.as_str(), "3001234567");
    }

    #[test]
    fn test_phone_is_trimmed() {
        let phone = PhoneNumber::of("  3001234567 ").unwrap();
        assert_eq!(phone.as_str(), "3001234567");
    }

    #[test]
    fn test_phone_failure_causes_are_distinct() {
        assert_eq!(PhoneNumber::of("   "), Err(ValidationError::PhoneEmpty));
        assert_eq!(PhoneNumber::of("300123456"), Err(ValidationError::PhoneLength));
        assert_eq!(PhoneNumber::of("30012345678"), Err(ValidationError::PhoneLength));
        assert_eq!(PhoneNumber::of("2001234567"), Err(ValidationError::PhonePrefix));
        assert_eq!(PhoneNumber::of("300123456a"), Err(ValidationError::PhoneNotNumeric));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // Arabic-Indic digits are numeric but not ASCII.
        assert!(PhoneNumber::of("3٠٠1234567").is_err());
    }

    #[test]
    fn test_operator_classification() {
        assert!(PhoneNumber::of("3051234567").unwrap().is_claro_number());
        assert!(PhoneNumber::of("3151234567").unwrap().is_movistar_number());
        assert!(PhoneNumber::of("3231234567").unwrap().is_tigo_number());
        assert!(PhoneNumber::of("3311234567").unwrap().is_wom_number());

        let unassigned = PhoneNumber::of("3501234567").unwrap();
        assert!(!unassigned.is_claro_number());
        assert!(!unassigned.is_movistar_number());
        assert!(!unassigned.is_tigo_number());
        assert!(!unassigned.is_wom_number());
    }

    #[test]
    fn test_display_format() {
        let phone = PhoneNumber::of("3001234567").unwrap();
        assert_eq!(phone.to_display_format(), "(300) 123-4567");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<PhoneNumber, _> = serde_json::from_str("\"3101234567\"");
        assert!(ok.is_ok());

        let bad: Result<PhoneNumber, _> = serde_json::from_str("\"123\"");
        assert!(bad.is_err());
    }
}
