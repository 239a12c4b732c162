//! Top-up transaction aggregate and its status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, PhoneNumber, SupplierId, TopUpRequest};
use crate::error::{DomainError, ValidationError};

/// Store-assigned identifier of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Identifier of the user owning a transaction. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id <= 0 {
            return Err(ValidationError::InvalidUserId(id));
        }
        Ok(Self(id))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for UserId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Lifecycle status of a top-up.
///
/// `Pending` is the only state that accepts a transition; the other two
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn code(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(TransactionStatus::Pending),
            "COMPLETED" => Some(TransactionStatus::Completed),
            "FAILED" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pendiente",
            TransactionStatus::Completed => "Completada",
            TransactionStatus::Failed => "Fallida",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A single top-up attempt, from request to settlement.
///
/// Created PENDING right before the provider is called and moved exactly
/// once to COMPLETED or FAILED afterwards. `active` is a soft-delete flag
/// and is independent from `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDomain {
    id: Option<TransactionId>,
    user_id: UserId,
    phone_number: PhoneNumber,
    amount: Amount,
    supplier_id: SupplierId,
    supplier_name: String,
    status: TransactionStatus,
    external_transaction_id: Option<String>,
    response_message: Option<String>,
    response_data: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    active: bool,
}

impl TransactionDomain {
    /// Creates a new, unsaved PENDING transaction.
    pub fn create_pending(
        request: &TopUpRequest,
        user_id: UserId,
        supplier_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            user_id,
            phone_number: request.phone_number().clone(),
            amount: request.amount(),
            supplier_id: request.supplier_id().clone(),
            supplier_name: supplier_name.into(),
            status: TransactionStatus::Pending,
            external_transaction_id: None,
            response_message: None,
            response_data: None,
            created_at: now,
            updated_at: now,
            active: true,
        }
    }

    /// Reconstructs a transaction from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: TransactionId,
        user_id: UserId,
        phone_number: PhoneNumber,
        amount: Amount,
        supplier_id: SupplierId,
        supplier_name: String,
        status: TransactionStatus,
        external_transaction_id: Option<String>,
        response_message: Option<String>,
        response_data: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        active: bool,
    ) -> Self {
        Self {
            id: Some(id),
            user_id,
            phone_number,
            amount,
            supplier_id,
            supplier_name,
            status,
            external_transaction_id,
            response_message,
            response_data,
            created_at,
            updated_at,
            active,
        }
    }

    /// Records the identity assigned by the store on first insert.
    pub fn assign_id(&mut self, id: TransactionId) {
        self.id = Some(id);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // State transitions
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn complete(
        &mut self,
        external_transaction_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_pending("complete")?;
        self.status = TransactionStatus::Completed;
        self.external_transaction_id = Some(external_transaction_id.into());
        self.response_message = Some(message.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn fail(&mut self, error_message: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_pending("fail")?;
        self.status = TransactionStatus::Failed;
        self.response_message = Some(error_message.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    fn ensure_pending(&self, action: &'static str) -> Result<(), DomainError> {
        if !self.can_be_modified() {
            return Err(DomainError::IllegalState {
                action,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Stores the raw provider payload for support and audit.
    pub fn record_response_data(&mut self, raw: impl Into<String>) {
        self.response_data = Some(raw.into());
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    pub fn reactivate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Predicates
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn is_successful(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == TransactionStatus::Failed
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    pub fn can_be_modified(&self) -> bool {
        self.is_pending()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn belongs_to_user(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn is_supplier_compatible(&self) -> bool {
        self.supplier_id.supports_phone_number(&self.phone_number)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> Option<TransactionId> {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
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

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn external_transaction_id(&self) -> Option<&str> {
        self.external_transaction_id.as_deref()
    }

    pub fn response_message(&self) -> Option<&str> {
        self.response_message.as_deref()
    }

    pub fn response_data(&self) -> Option<&str> {
        self.response_data.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn formatted_amount(&self) -> String {
        self.amount.to_currency_string()
    }

    pub fn formatted_phone_number(&self) -> String {
        self.phone_number.to_display_format()
    }
}
