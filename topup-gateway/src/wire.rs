//! JSON bodies exchanged with the payment gateway.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest<'a> {
    pub cell_phone: &'a str,
    /// The gateway expects a JSON number here, not a string.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub supplier_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyResponse {
    pub message: Option<String>,
    #[serde(rename = "transactionalID")]
    pub transactional_id: Option<String>,
    #[allow(dead_code)]
    pub cell_phone: Option<String>,
    #[allow(dead_code)]
    pub value: Option<Decimal>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierDto {
    pub id: String,
    pub name: String,
}
