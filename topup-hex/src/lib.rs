//! # Top-Up Hex
//!
//! Application service layer and HTTP adapter for the top-up service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates domain operations)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `R: TransactionRepository` and
//! `P: TopUpProvider`, allowing different adapters to be injected.

pub mod inbound;
pub mod service;


pub use service::{ServiceConfig, TopUpService};
