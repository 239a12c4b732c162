//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use topup_types::{
    Page, PageRequest, PhoneNumber, RepoError, TransactionDomain, TransactionId,
    TransactionRepository, TransactionStatus, UserId,
};

use crate::types::{DbTransaction, TRANSACTION_COLUMNS};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

const CREATE_TRANSACTIONS: &str = include_str!("../migrations/0001_create_transactions_pg.sql");

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(pool, CREATE_TRANSACTIONS, "0001").await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }

    async fn insert(&self, mut tx: TransactionDomain) -> Result<TransactionDomain, RepoError> {
        let row: (i64,) = sqlx::query_as(
            r#"INSERT INTO transactions (user_id, phone_number, amount, supplier_id, supplier_name, status,
                   external_transaction_id, response_message, response_data, created_at, updated_at, active)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING id"#,
        )
        .bind(tx.user_id().value())
        .bind(tx.phone_number().as_str())
        .bind(tx.amount().value())
        .bind(tx.supplier_id().value())
        .bind(tx.supplier_name())
        .bind(tx.status().code())
        .bind(tx.external_transaction_id())
        .bind(tx.response_message())
        .bind(tx.response_data())
        .bind(tx.created_at())
        .bind(tx.updated_at())
        .bind(tx.is_active())
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
               SET user_id = $1, phone_number = $2, amount = $3, supplier_id = $4, supplier_name = $5,
                   status = $6, external_transaction_id = $7, response_message = $8, response_data = $9,
                   updated_at = $10, active = $11
               WHERE id = $12"#,
        )
        .bind(tx.user_id().value())
        .bind(tx.phone_number().as_str())
        .bind(tx.amount().value())
        .bind(tx.supplier_id().value())
        .bind(tx.supplier_name())
        .bind(tx.status().code())
        .bind(tx.external_transaction_id())
        .bind(tx.response_message())
        .bind(tx.response_data())
        .bind(tx.updated_at())
        .bind(tx.is_active())
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
impl TransactionRepository for PostgresRepo {
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
        let sql = format!(
            "UPDATE transactions SET status = $1, updated_at = $2 WHERE id = $3 RETURNING {}",
            TRANSACTION_COLUMNS
        );
        let row: Option<DbTransaction> = sqlx::query_as(&sql)
            .bind(status.code())
            .bind(Utc::now())
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbTransaction::into_domain).transpose()
    }

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<TransactionDomain>, RepoError> {
        let sql = format!("SELECT {} FROM transactions WHERE id = $1", TRANSACTION_COLUMNS);
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
            "SELECT {} FROM transactions WHERE external_transaction_id = $1 ORDER BY id DESC LIMIT 1",
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
        let total: (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM transactions WHERE user_id = $1 AND active = TRUE"#,
        )
        .bind(user_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let sql = format!(
            "SELECT {} FROM transactions WHERE user_id = $1 AND active = TRUE \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
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
            "SELECT {} FROM transactions WHERE phone_number = $1 AND active = TRUE \
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
        let row: (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM transactions WHERE status = $1 AND active = TRUE"#,
        )
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
        let row: (Decimal,) = sqlx::query_as(
            r#"SELECT COALESCE(SUM(amount), 0) FROM transactions
               WHERE user_id = $1 AND status = 'COMPLETED' AND active = TRUE"#,
        )
        .bind(user_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::CREATE_TRANSACTIONS;

    fn column_definition(name: &str) -> String {
        CREATE_TRANSACTIONS
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with(&format!("{} ", name)))
            .unwrap_or_else(|| panic!("column {} missing", name))
            .to_string()
    }

    #[test]
    fn test_provider_text_columns_are_unbounded() {
        for column in [
            "external_transaction_id",
            "response_message",
            "response_data",
            "supplier_name",
        ] {
            let definition = column_definition(column);
            assert!(
                definition.contains(" TEXT") && !definition.contains("VARCHAR"),
                "{} must be TEXT, got: {}",
                column,
                definition
            );
        }
    }
}
