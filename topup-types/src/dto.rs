//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! DTOs carry primitives; value objects are built from them inside the
//! service so that validation has a single entry point.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Page, Supplier, TransactionDomain};

// ─────────────────────────────────────────────────────────────────────────────
// Top-up DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/topups`. Field names follow the gateway's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpRequestDto {
    /// Colombian mobile number, 10 digits starting with 3
    pub cell_phone: String,
    /// Amount in pesos
    pub value: Decimal,
    pub supplier_id: String,
}

/// A transaction as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub user_id: i64,
    pub phone_number: String,
    pub formatted_phone_number: String,
    pub amount: Decimal,
    pub formatted_amount: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub status: String,
    pub status_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

impl From<&TransactionDomain> for TransactionResponse {
    fn from(tx: &TransactionDomain) -> Self {
        Self {
            // Unsaved transactions never reach the API; 0 marks "no id".
            id: tx.id().map(|id| id.value()).unwrap_or_default(),
            user_id: tx.user_id().value(),
            phone_number: tx.phone_number().as_str().to_string(),
            formatted_phone_number: tx.formatted_phone_number(),
            amount: tx.amount().value(),
            formatted_amount: tx.formatted_amount(),
            supplier_id: tx.supplier_id().value().to_string(),
            supplier_name: tx.supplier_name().to_string(),
            status: tx.status().code().to_string(),
            status_display: tx.status().display_name().to_string(),
            external_transaction_id: tx.external_transaction_id().map(str::to_string),
            response_message: tx.response_message().map(str::to_string),
            created_at: tx.created_at(),
            updated_at: tx.updated_at(),
            active: tx.is_active(),
        }
    }
}

impl From<TransactionDomain> for TransactionResponse {
    fn from(tx: TransactionDomain) -> Self {
        Self::from(&tx)
    }
}

/// Paged list of transactions.
pub type TransactionPageResponse = Page<TransactionResponse>;

// ─────────────────────────────────────────────────────────────────────────────
// Query DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// `?page=&size=` query parameters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Supplier DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierResponse {
    pub id: String,
    pub name: String,
}

impl From<Supplier> for SupplierResponse {
    fn from(s: Supplier) -> Self {
        Self {
            id: s.id,
            name: s.name,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error DTO
// ─────────────────────────────────────────────────────────────────────────────

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TopUpRequest, TransactionId, UserId};
    use rust_decimal_macros::dec;

    #[test]
    fn test_top_up_request_accepts_number_or_string_value() {
        let body = r#"{"cellPhone":"3001234567","value":5000,"supplierId":"8753"}"#;
        let dto: TopUpRequestDto = serde_json::from_str(body).unwrap();
        assert_eq!(dto.value, dec!(5000));
        assert_eq!(dto.supplier_id, "8753");

        let body = r#"{"cellPhone":"3001234567","value":"5000.50","supplierId":"8753"}"#;
        let dto: TopUpRequestDto = serde_json::from_str(body).unwrap();
        assert_eq!(dto.value, dec!(5000.50));
    }

    #[test]
    fn test_transaction_response_from_domain() {
        let req = TopUpRequest::from_raw("3001234567", dec!(5000), "8753").unwrap();
        let mut tx = TransactionDomain::create_pending(&req, UserId::new(7).unwrap(), "Claro");
        tx.assign_id(TransactionId::new(42));

        let resp = TransactionResponse::from(&tx);
        assert_eq!(resp.id, 42);
        assert_eq!(resp.user_id, 7);
        assert_eq!(resp.status, "PENDING");
        assert_eq!(resp.status_display, "Pendiente");
        assert_eq!(resp.formatted_amount, "$ 5.000,00");
        assert_eq!(resp.formatted_phone_number, "(300) 123-4567");
        assert!(resp.external_transaction_id.is_none());
    }
}
