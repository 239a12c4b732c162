//! Domain models for the top-up service.

pub mod amount;
pub mod pagination;
pub mod phone;
pub mod request;
pub mod supplier;
pub mod transaction;

pub use amount::Amount;
pub use pagination::{Page, PageRequest};
pub use phone::PhoneNumber;
pub use request::TopUpRequest;
pub use supplier::{Supplier, SupplierId, SupplierType};
pub use transaction::{TransactionDomain, TransactionId, TransactionStatus, UserId};
