//! Supplier catalog: the four mobile operators eligible for top-ups.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::phone::PhoneNumber;
use crate::error::ValidationError;

pub(crate) const CLARO_PREFIXES: &[&str] = &["300", "301", "302", "303", "304", "305"];
pub(crate) const MOVISTAR_PREFIXES: &[&str] = &["310", "311", "312", "313", "314", "315"];
pub(crate) const TIGO_PREFIXES: &[&str] = &["320", "321", "322", "323"];
pub(crate) const WOM_PREFIXES: &[&str] = &["330", "331"];

/// Closed set of supported suppliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupplierType {
    Claro,
    Movistar,
    Tigo,
    Wom,
}

impl SupplierType {
    const ALL: [SupplierType; 4] = [
        SupplierType::Claro,
        SupplierType::Movistar,
        SupplierType::Tigo,
        SupplierType::Wom,
    ];

    /// Resolves a supplier from its gateway id. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "8753" => Some(SupplierType::Claro),
            "9773" => Some(SupplierType::Movistar),
            "3398" => Some(SupplierType::Tigo),
            "4689" => Some(SupplierType::Wom),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            SupplierType::Claro => "8753",
            SupplierType::Movistar => "9773",
            SupplierType::Tigo => "3398",
            SupplierType::Wom => "4689",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SupplierType::Claro => "Claro",
            SupplierType::Movistar => "Movistar",
            SupplierType::Tigo => "Tigo",
            SupplierType::Wom => "WOM",
        }
    }

    pub fn all() -> &'static [SupplierType] {
        &Self::ALL
    }

    pub fn valid_ids() -> Vec<&'static str> {
        Self::ALL.iter().map(SupplierType::id).collect()
    }

    /// `"8753 (Claro), 9773 (Movistar), ..."`, used in error messages.
    pub fn valid_ids_display() -> String {
        Self::ALL
            .iter()
            .map(|t| format!("{} ({})", t.id(), t.name()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Phone number prefixes served by this supplier's network.
    pub fn allowed_prefixes(&self) -> &'static [&'static str] {
        match self {
            SupplierType::Claro => CLARO_PREFIXES,
            SupplierType::Movistar => MOVISTAR_PREFIXES,
            SupplierType::Tigo => TIGO_PREFIXES,
            SupplierType::Wom => WOM_PREFIXES,
        }
    }

    pub fn supports_phone_number(&self, phone: &PhoneNumber) -> bool {
        phone.has_prefix_in(self.allowed_prefixes())
    }

    /// The supplier whose range contains the number, if any.
    pub fn recommended_for_phone(phone: &PhoneNumber) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.supports_phone_number(phone))
    }
}

impl fmt::Display for SupplierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

/// A validated supplier id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SupplierId {
    value: String,
    supplier_type: SupplierType,
}

impl SupplierId {
    pub fn of(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValidationError::SupplierRequired);
        }

        let supplier_type =
            SupplierType::from_id(value).ok_or_else(|| ValidationError::UnknownSupplier {
                id: value.to_string(),
                valid: SupplierType::valid_ids_display(),
            })?;

        Ok(Self {
            value: value.to_string(),
            supplier_type,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn supplier_type(&self) -> SupplierType {
        self.supplier_type
    }

    pub fn supplier_name(&self) -> &'static str {
        self.supplier_type.name()
    }

    pub fn supports_phone_number(&self, phone: &PhoneNumber) -> bool {
        self.supplier_type.supports_phone_number(phone)
    }
}

impl From<SupplierType> for SupplierId {
    fn from(supplier_type: SupplierType) -> Self {
        Self {
            value: supplier_type.id().to_string(),
            supplier_type,
        }
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for SupplierId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(&value)
    }
}

impl From<SupplierId> for String {
    fn from(id: SupplierId) -> Self {
        id.value
    }
}

/// A supplier as listed by a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
}

impl From<SupplierType> for Supplier {
    fn from(supplier_type: SupplierType) -> Self {
        Self {
            id: supplier_type.id().to_string(),
            name: supplier_type.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids_resolve() {
        assert_eq!(SupplierId::of("8753").unwrap().supplier_name(), "Claro");
        assert_eq!(SupplierId::of("9773").unwrap().supplier_name(), "Movistar");
        assert_eq!(SupplierId::of("3398").unwrap().supplier_name(), "Tigo");
        assert_eq!(SupplierId::of("4689").unwrap().supplier_name(), "WOM");
    }

    #[test]
    fn test_unknown_supplier_fails() {
        let err = SupplierId::of("9999").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownSupplier { ref id, .. } if id == "9999"));
        assert!(err.to_string().contains("8753 (Claro)"));
    }

    #[test]
    fn test_empty_supplier_fails() {
        assert_eq!(SupplierId::of("  "), Err(ValidationError::SupplierRequired));
    }

    #[test]
    fn test_id_table_round_trips() {
        for t in SupplierType::all() {
            assert_eq!(SupplierType::from_id(t.id()), Some(*t));
        }
        assert_eq!(SupplierType::valid_ids(), vec!["8753", "9773", "3398", "4689"]);
    }

    #[test]
    fn test_prefix_lists() {
        assert_eq!(
            SupplierType::Claro.allowed_prefixes(),
            &["300", "301", "302", "303", "304", "305"]
        );
        assert_eq!(
            SupplierType::Movistar.allowed_prefixes(),
            &["310", "311", "312", "313", "314", "315"]
        );
        assert_eq!(SupplierType::Tigo.allowed_prefixes(), &["320", "321", "322", "323"]);
        assert_eq!(SupplierType::Wom.allowed_prefixes(), &["330", "331"]);
    }

    #[test]
    fn test_supports_phone_number() {
        let claro_phone = PhoneNumber::of("3001234567").unwrap();
        let claro = SupplierId::of("8753").unwrap();
        let tigo = SupplierId::of("3398").unwrap();

        assert!(claro.supports_phone_number(&claro_phone));
        assert!(!tigo.supports_phone_number(&claro_phone));
    }

    #[test]
    fn test_recommended_for_phone() {
        let wom = PhoneNumber::of("3311234567").unwrap();
        assert_eq!(SupplierType::recommended_for_phone(&wom), Some(SupplierType::Wom));

        let unassigned = PhoneNumber::of("3501234567").unwrap();
        assert_eq!(SupplierType::recommended_for_phone(&unassigned), None);
    }
}
