//! Shared database types with feature-gated fields for SQLite and PostgreSQL.

use sqlx::FromRow;

use topup_types::{
    Amount, DomainError, PhoneNumber, RepoError, SupplierId, TransactionDomain, TransactionId,
    TransactionStatus, UserId,
};

// ─────────────────────────────────────────────────────────────────────────────
// Feature-gated imports
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(not(feature = "sqlite"))]
use chrono::{DateTime, Utc};
#[cfg(not(feature = "sqlite"))]
use rust_decimal::Decimal;

/// Column list shared by every SELECT, in `DbTransaction` field order.
pub const TRANSACTION_COLUMNS: &str = "id, user_id, phone_number, amount, supplier_id, \
     supplier_name, status, external_transaction_id, response_message, response_data, \
     created_at, updated_at, active";

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Transaction row from database.
#[derive(FromRow)]
pub struct DbTransaction {
    pub id: i64,
    pub user_id: i64,
    pub phone_number: String,

    #[cfg(not(feature = "sqlite"))]
    pub amount: Decimal,
    #[cfg(feature = "sqlite")]
    pub amount: String,

    pub supplier_id: String,
    pub supplier_name: String,
    pub status: String,
    pub external_transaction_id: Option<String>,
    pub response_message: Option<String>,
    pub response_data: Option<String>,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,

    #[cfg(not(feature = "sqlite"))]
    pub updated_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub updated_at: String,

    #[cfg(not(feature = "sqlite"))]
    pub active: bool,
    #[cfg(feature = "sqlite")]
    pub active: i64,
}

/// Amount-only row, summed in Rust on SQLite where amounts are text.
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct DbAmount {
    pub amount: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_status(s: &str) -> Result<TransactionStatus, RepoError> {
    TransactionStatus::from_code(s)
        .ok_or_else(|| RepoError::Database(format!("Unknown transaction status: {}", s)))
}

#[cfg(feature = "sqlite")]
pub fn parse_decimal(s: &str) -> Result<rust_decimal::Decimal, RepoError> {
    s.parse()
        .map_err(|e| RepoError::Database(format!("Invalid stored amount {}: {}", s, e)))
}

#[cfg(feature = "sqlite")]
pub fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, RepoError> {
    Ok(chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| RepoError::Database(e.to_string()))?
        .with_timezone(&chrono::Utc))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
#[cfg(feature = "sqlite")]
pub fn format_timestamp(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

fn invalid(e: topup_types::ValidationError) -> RepoError {
    RepoError::Domain(DomainError::Validation(e))
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion (feature-gated implementations)
// ─────────────────────────────────────────────────────────────────────────────

impl DbTransaction {
    /// Convert database row to domain TransactionDomain.
    ///
    /// Stored values go back through value object validation, so a row
    /// that no longer satisfies the business rules surfaces as an error.
    pub fn into_domain(self) -> Result<TransactionDomain, RepoError> {
        let status = parse_status(&self.status)?;
        let user_id = UserId::new(self.user_id).map_err(invalid)?;
        let phone_number = PhoneNumber::of(&self.phone_number).map_err(invalid)?;
        let supplier_id = SupplierId::of(&self.supplier_id).map_err(invalid)?;

        #[cfg(not(feature = "sqlite"))]
        let (amount, created_at, updated_at, active) =
            (self.amount, self.created_at, self.updated_at, self.active);

        #[cfg(feature = "sqlite")]
        let (amount, created_at, updated_at, active) = (
            parse_decimal(&self.amount)?,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
            self.active != 0,
        );

        let amount = Amount::of(amount).map_err(invalid)?;

        Ok(TransactionDomain::from_parts(
            TransactionId::new(self.id),
            user_id,
            phone_number,
            amount,
            supplier_id,
            self.supplier_name,
            status,
            self.external_transaction_id,
            self.response_message,
            self.response_data,
            created_at,
            updated_at,
            active,
        ))
    }
}
