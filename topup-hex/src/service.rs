//! Top-Up Application Service
//!
//! Orchestrates a recharge through the repository and provider ports.
//! Contains NO infrastructure logic - pure business orchestration.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use topup_types::{
    DomainError, Page, PageRequest, PhoneNumber, ProviderError, StaticSupplierCatalog, Supplier,
    SupplierCatalog, TopUpError, TopUpProvider, TopUpReceipt, TopUpRequest, TransactionDomain,
    TransactionId, TransactionRepository, UserId,
};

const UNKNOWN_SUPPLIER_NAME: &str = "Desconocido";
const DEFAULT_SUCCESS_MESSAGE: &str = "Recarga exitosa";

/// Tunables for the service.
#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    /// Upper bound for authenticate + buy together.
    pub provider_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(30),
        }
    }
}

/// Application service for top-up operations.
///
/// Generic over `R: TransactionRepository` and `P: TopUpProvider` - the
/// adapters are injected at compile time. The supplier catalog is only used
/// for display names, so it sits behind a trait object.
pub struct TopUpService<R: TransactionRepository, P: TopUpProvider> {
    repo: R,
    provider: P,
    catalog: Arc<dyn SupplierCatalog>,
    config: ServiceConfig,
}

impl<R: TransactionRepository, P: TopUpProvider> TopUpService<R, P> {
    /// Creates a service backed by the static supplier table.
    pub fn new(repo: R, provider: P) -> Self {
        Self {
            repo,
            provider,
            catalog: Arc::new(StaticSupplierCatalog),
            config: ServiceConfig::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn SupplierCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Top-up execution
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates the inputs, records a PENDING transaction, calls the provider
    /// once and records the outcome.
    ///
    /// Validation failures never touch the repository. A provider failure
    /// is persisted as FAILED and returned as `TopUpError::ExecutionFailed`
    /// carrying that record.
    #[instrument(skip(self))]
    pub async fn execute_top_up(
        &self,
        raw_phone: &str,
        raw_amount: Decimal,
        raw_supplier_id: &str,
        user_id: i64,
    ) -> Result<TransactionDomain, TopUpError> {
        let request = TopUpRequest::from_raw(raw_phone, raw_amount, raw_supplier_id)?;
        let user_id = UserId::new(user_id)?;

        if !request.is_supplier_compatible() {
            warn!(
                supplier = request.supplier_name(),
                "phone prefix is outside the supplier's range"
            );
        }

        let supplier_name = self.resolve_supplier_name(request.supplier_id().value()).await;
        let pending = TransactionDomain::create_pending(&request, user_id, supplier_name);
        let mut transaction = self.repo.save(pending).await?;

        // Saved rows always carry an id; 0 only shows up in logs if a
        // repository breaks that contract.
        let transaction_id = transaction.id().unwrap_or(TransactionId::new(0));
        info!(%transaction_id, amount = %request.amount(), "pending transaction recorded");

        match self.call_provider(&request).await {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());

                if let Err(e) = transaction.complete(&receipt.external_transaction_id, message) {
                    return Err(Self::illegal_transition(transaction_id, e));
                }
                if let Some(raw) = receipt.raw_response {
                    transaction.record_response_data(raw);
                }

                let saved = self.repo.save(transaction).await.map_err(|source| {
                    error!(
                        %transaction_id,
                        external_transaction_id = %receipt.external_transaction_id,
                        error = %source,
                        "top-up succeeded but could not be recorded; row left PENDING"
                    );
                    TopUpError::FinalizeFailed {
                        transaction_id,
                        external_transaction_id: Some(receipt.external_transaction_id.clone()),
                        source,
                    }
                })?;

                info!(
                    %transaction_id,
                    external_transaction_id = %receipt.external_transaction_id,
                    "top-up completed"
                );
                Ok(saved)
            }
            Err(provider_error) => {
                let message = provider_error.to_string();
                warn!(%transaction_id, error = %message, "top-up failed at provider");

                if let Err(e) = transaction.fail(&message) {
                    return Err(Self::illegal_transition(transaction_id, e));
                }

                let saved = self.repo.save(transaction).await.map_err(|source| {
                    error!(
                        %transaction_id,
                        error = %source,
                        "top-up failure could not be recorded; row left PENDING"
                    );
                    TopUpError::FinalizeFailed {
                        transaction_id,
                        external_transaction_id: None,
                        source,
                    }
                })?;

                Err(TopUpError::ExecutionFailed {
                    transaction: Box::new(saved),
                    message,
                })
            }
        }
    }

    /// Returns whether the raw inputs would pass validation.
    pub fn validate_top_up_request(
        &self,
        raw_phone: &str,
        raw_amount: Decimal,
        raw_supplier_id: &str,
    ) -> bool {
        TopUpRequest::from_raw(raw_phone, raw_amount, raw_supplier_id).is_ok()
    }

    /// Authenticates and buys under a single deadline. No retries.
    async fn call_provider(&self, request: &TopUpRequest) -> Result<TopUpReceipt, ProviderError> {
        let timeout = self.config.provider_timeout;
        let call = async {
            let token = self.provider.authenticate().await?;
            self.provider.execute_top_up(request, &token).await
        };

        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(timeout.as_secs())),
        }
    }

    async fn resolve_supplier_name(&self, supplier_id: &str) -> String {
        match self.catalog.find_by_id(supplier_id).await {
            Ok(Some(supplier)) => supplier.name,
            Ok(None) => UNKNOWN_SUPPLIER_NAME.to_string(),
            Err(e) => {
                warn!(error = %e, "supplier catalog unavailable");
                UNKNOWN_SUPPLIER_NAME.to_string()
            }
        }
    }

    fn illegal_transition(transaction_id: TransactionId, e: DomainError) -> TopUpError {
        error!(%transaction_id, error = %e, "illegal transaction state transition");
        TopUpError::Domain(e)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transaction queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Active transactions of a user, newest first.
    #[instrument(skip(self))]
    pub async fn get_user_transactions(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Page<TransactionDomain>, TopUpError> {
        let user_id = UserId::new(user_id)?;
        Ok(self.repo.find_by_user_id_and_active(user_id, page).await?)
    }

    /// A single transaction, visible only to its owner and only while active.
    #[instrument(skip(self))]
    pub async fn get_transaction(
        &self,
        id: TransactionId,
        user_id: i64,
    ) -> Result<TransactionDomain, TopUpError> {
        let transaction = self.owned_transaction(id, user_id).await?;
        if !transaction.is_active() {
            return Err(TopUpError::Inactive);
        }
        Ok(transaction)
    }

    /// Active transactions sent to a phone number.
    #[instrument(skip(self))]
    pub async fn get_transactions_by_phone(
        &self,
        raw_phone: &str,
    ) -> Result<Vec<TransactionDomain>, TopUpError> {
        let phone = PhoneNumber::of(raw_phone)?;
        Ok(self.repo.find_by_phone_number_and_active(&phone).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Soft delete
    // ─────────────────────────────────────────────────────────────────────────────

    /// Hides a transaction from normal queries. History is kept.
    #[instrument(skip(self))]
    pub async fn deactivate_transaction(
        &self,
        id: TransactionId,
        user_id: i64,
    ) -> Result<TransactionDomain, TopUpError> {
        let mut transaction = self.owned_transaction(id, user_id).await?;
        transaction.deactivate();
        let saved = self.repo.save(transaction).await?;
        info!(transaction_id = %id, "transaction deactivated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn reactivate_transaction(
        &self,
        id: TransactionId,
        user_id: i64,
    ) -> Result<TransactionDomain, TopUpError> {
        let mut transaction = self.owned_transaction(id, user_id).await?;
        transaction.reactivate();
        let saved = self.repo.save(transaction).await?;
        info!(transaction_id = %id, "transaction reactivated");
        Ok(saved)
    }

    async fn owned_transaction(
        &self,
        id: TransactionId,
        user_id: i64,
    ) -> Result<TransactionDomain, TopUpError> {
        let user_id = UserId::new(user_id)?;
        let transaction = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(TopUpError::NotFound(id))?;

        if !transaction.belongs_to_user(user_id) {
            warn!(transaction_id = %id, %user_id, "access to another user's transaction denied");
            return Err(TopUpError::Forbidden);
        }
        Ok(transaction)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Suppliers
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists suppliers from the catalog, falling back to the static table
    /// when the catalog is unavailable.
    pub async fn list_suppliers(&self) -> Vec<Supplier> {
        match self.catalog.list_suppliers().await {
            Ok(suppliers) => suppliers,
            Err(e) => {
                warn!(error = %e, "supplier catalog unavailable, using static list");
                StaticSupplierCatalog
                    .list_suppliers()
                    .await
                    .unwrap_or_default()
            }
        }
    }
}
