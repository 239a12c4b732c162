//! Validated top-up request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Amount, PhoneNumber, SupplierId};
use crate::error::ValidationError;

/// The three validated inputs of a top-up.
///
/// Only constructible from value objects, so holding one proves the
/// inputs passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopUpRequest {
    phone_number: PhoneNumber,
    amount: Amount,
    supplier_id: SupplierId,
}

impl TopUpRequest {
    pub fn new(phone_number: PhoneNumber, amount: Amount, supplier_id: SupplierId) -> Self {
        Self {
            phone_number,
            amount,
            supplier_id,
        }
    }

    /// Validates raw inputs in order: phone, amount, supplier.
    pub fn from_raw(
        raw_phone: &str,
        raw_amount: Decimal,
        raw_supplier_id: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            phone_number: PhoneNumber::of(raw_phone)?,
            amount: Amount::of(raw_amount)?,
            supplier_id: SupplierId::of(raw_supplier_id)?,
        })
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn supplier_id(&self) -> &SupplierId {
        &self.supplier_id
    }

    pub fn supplier_name(&self) -> &'static str {
        self.supplier_id.supplier_name()
    }

    pub fn is_supplier_compatible(&self) -> bool {
        self.supplier_id.supports_phone_number(&self.phone_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_raw_valid() {
        let req = TopUpRequest::from_raw("3001234567", dec!(5000), "8753").unwrap();
        assert_eq!(req.supplier_name(), "Claro");
        assert!(req.is_supplier_compatible());
    }

    #[test]
    fn test_from_raw_reports_first_failure() {
        let err = TopUpRequest::from_raw("123", dec!(10), "9999").unwrap_err();
        assert_eq!(err, ValidationError::PhoneLength);
    }

    #[test]
    fn test_incompatible_supplier_is_still_valid() {
        let req = TopUpRequest::from_raw("3201234567", dec!(5000), "8753").unwrap();
        assert!(!req.is_supplier_compatible());
    }
}
