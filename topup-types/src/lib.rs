//! # Top-Up Types
//!
//! Domain types and port traits for the mobile top-up service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Value objects and the transaction aggregate
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Amount, Page, PageRequest, PhoneNumber, Supplier, SupplierId, SupplierType, TopUpRequest,
    TransactionDomain, TransactionId, TransactionStatus, UserId,
};
pub use dto::*;
pub use error::{
    AppError, DomainError, ProviderError, RepoError, TopUpError, ValidationError,
};
pub use ports::{
    AuthToken, StaticSupplierCatalog, SupplierCatalog, TopUpProvider, TopUpReceipt,
    TransactionRepository,
};
