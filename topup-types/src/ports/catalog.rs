//! Supplier catalog port.

use crate::domain::{Supplier, SupplierType};
use crate::error::ProviderError;

/// Source of supplier display data.
///
/// The engine only uses it best-effort to resolve display names; the
/// authoritative id check is `SupplierId::of`.
#[async_trait::async_trait]
pub trait SupplierCatalog: Send + Sync {
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ProviderError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Supplier>, ProviderError> {
        Ok(self
            .list_suppliers()
            .await?
            .into_iter()
            .find(|s| s.id == id))
    }
}

/// Catalog backed by the fixed `SupplierType` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSupplierCatalog;

#[async_trait::async_trait]
impl SupplierCatalog for StaticSupplierCatalog {
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ProviderError> {
        Ok(SupplierType::all().iter().copied().map(Supplier::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Supplier>, ProviderError> {
        Ok(SupplierType::from_id(id).map(Supplier::from))
    }
}
