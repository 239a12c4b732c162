//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite) implement this trait.

use rust_decimal::Decimal;

use crate::domain::{
    Page, PageRequest, PhoneNumber, TransactionDomain, TransactionId, TransactionStatus, UserId,
};
use crate::error::RepoError;

/// Persistence contract for top-up transactions.
///
/// `save` is an upsert keyed on the aggregate's id: the first call inserts
/// and assigns the id, later calls update that same row.
#[async_trait::async_trait]
pub trait TransactionRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Inserts (no id yet) or updates (id present) a transaction.
    async fn save(&self, transaction: TransactionDomain) -> Result<TransactionDomain, RepoError>;

    /// Overwrites the status column. Administrative use only; bypasses the
    /// aggregate's transition rules.
    async fn update_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<Option<TransactionDomain>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────────

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<TransactionDomain>, RepoError>;

    async fn find_by_external_transaction_id(
        &self,
        external_id: &str,
    ) -> Result<Option<TransactionDomain>, RepoError>;

    /// Active transactions of a user, newest first.
    async fn find_by_user_id_and_active(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<TransactionDomain>, RepoError>;

    /// Active transactions for a phone number, newest first.
    async fn find_by_phone_number_and_active(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Vec<TransactionDomain>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Aggregates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Number of active transactions in the given status.
    async fn count_by_status(&self, status: TransactionStatus) -> Result<i64, RepoError>;

    /// Sum of the amounts of a user's active, completed transactions.
    async fn total_completed_amount_by_user(&self, user_id: UserId)
    -> Result<Decimal, RepoError>;
}
