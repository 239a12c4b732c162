//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use topup_types::{
    Page, PageRequest, PhoneNumber, RepoError, TransactionDomain, TransactionId,
    TransactionRepository, TransactionStatus, UserId,
};

use crate::types::{
    DbAmount, DbTransaction, TRANSACTION_COLUMNS, format_timestamp, parse_decimal,
};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if !in_memory {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Each in-memory connection is its own database, so pin the pool to
        // a single connection that never expires.
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_transactions.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn insert(&self, mut tx: TransactionDomain) -> Result<TransactionDomain, RepoError> {
        let row: (i64,) = sqlx::query_as(
            r#"INSERT INTO transactions (user_id, phone_number, amount, supplier_id, supplier_name, status,
                   external_transaction_id, response_message, response_data, created_at, updated_at, active)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING id"#,
        )
        .bind(tx.user_id().value())
        .bind(tx.phone_number().as_str())
        .bind(tx.amount().value().to_string())
        .bind(tx.supplier_id().value())
        .bind(tx.supplier_name())
        .bind(tx.status().code())
        .bind(tx.external_transaction_id())
        .bind(tx.response_message())
        .bind(tx.response_data())
        .bind(format_timestamp(tx.created_at()))
        .bind(format_timestamp(tx.updated_at()))
        .bind(tx.is_active() as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        tx.assign_id(TransactionId::new(row.0));
        tracing::debug!(transaction_id = row.0, "inserted transaction");
        Ok(tx)
    }

    async fn update(
        &self,
        id: TransactionId,
        tx: TransactionDomain,
    ) -> Result<TransactionDomain, RepoError> {
        let result = sqlx::query(
            r#"UPDATE transactions
               SET user_id = ?, phone_number = ?, amount = ?, supplier_id = ?, supplier_name = ?,
                   status = ?, external_transaction_id = ?, response_message = ?, response_data = ?,
                   updated_at = ?, active = ?
               WHERE id = ?"#,
        )
        .bind(tx.user_id().value())
        .bind(tx.phone_number().as_str())
        .bind(tx.amount().value().to_string())
        .bind(tx.supplier_id().value())
        .bind(tx.supplier_name())
        .bind(tx.status().code())
        .bind(tx.external_transaction_id())
        .bind(tx.response_message())
        .bind(tx.response_data())
        .bind(format_timestamp(tx.updated_at()))
        .bind(tx.is_active() as i64)
        .bind(id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(tx)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl TransactionRepository for SqliteRepo {
    async fn save(&self, tx: TransactionDomain) -> Result<TransactionDomain, RepoError> {
        match tx.id() {
            None => self.insert(tx).await,
            Some(id) => self.update(id, tx).await,
        }
    }

    async fn update_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<Option<TransactionDomain>, RepoError> {
        let result =
            sqlx::query(r#"UPDATE transactions SET status = ?, updated_at = ? WHERE id = ?"#)
                .bind(status.code())
                .bind(format_timestamp(chrono::Utc::now()))
                .bind(id.value())
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<TransactionDomain>, RepoError> {
        let sql = format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS);
        let row: Option<DbTransaction> = sqlx::query_as(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbTransaction::into_domain).transpose()
    }

    async fn find_by_external_transaction_id(
        &self,
        external_id: &str,
    ) -> Result<Option<TransactionDomain>, RepoError> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE external_transaction_id = ? ORDER BY id DESC LIMIT 1",
            TRANSACTION_COLUMNS
        );
        let row: Option<DbTransaction> = sqlx::query_as(&sql)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbTransaction::into_domain).transpose()
    }

    async fn find_by_user_id_and_active(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<TransactionDomain>, RepoError> {
        let total: (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM transactions WHERE user_id = ? AND active = 1"#)
                .bind(user_id.value())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        let sql = format!(
            "SELECT {} FROM transactions WHERE user_id = ? AND active = 1 \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS
        );
        let rows: Vec<DbTransaction> = sqlx::query_as(&sql)
            .bind(user_id.value())
            .bind(i64::from(page.size()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let content = rows
            .into_iter()
            .map(DbTransaction::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, page, total.0 as u64))
    }

    async fn find_by_phone_number_and_active(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Vec<TransactionDomain>, RepoError> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE phone_number = ? AND active = 1 \
             ORDER BY created_at DESC, id DESC",
            TRANSACTION_COLUMNS
        );
        let rows: Vec<DbTransaction> = sqlx::query_as(&sql)
            .bind(phone.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }

    async fn count_by_status(&self, status: TransactionStatus) -> Result<i64, RepoError> {
        let row: (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM transactions WHERE status = ? AND active = 1"#)
                .bind(status.code())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(row.0)
    }

    async fn total_completed_amount_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Decimal, RepoError> {
        let rows: Vec<DbAmount> = sqlx::query_as(
            r#"SELECT amount FROM transactions WHERE user_id = ? AND status = 'COMPLETED' AND active = 1"#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.iter()
            .try_fold(Decimal::ZERO, |acc, row| Ok(acc + parse_decimal(&row.amount)?))
    }
}
