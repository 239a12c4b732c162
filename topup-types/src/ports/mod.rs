//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod catalog;
mod provider;
mod repository;

pub use catalog::{StaticSupplierCatalog, SupplierCatalog};
pub use provider::{AuthToken, TopUpProvider, TopUpReceipt};
pub use repository::TransactionRepository;
