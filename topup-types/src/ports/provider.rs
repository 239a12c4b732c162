//! External top-up provider port.
//!
//! Implemented by the payment gateway adapter. Every top-up authenticates
//! afresh; no session is cached between calls.

use std::fmt;

use crate::domain::TopUpRequest;
use crate::error::{ProviderError, ValidationError};

/// Short-lived bearer credential issued by the gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(ValidationError::EmptyToken);
        }
        Ok(Self(value))
    }

    /// Token prefixed with `Bearer ` unless it already is.
    pub fn to_authorization_header(&self) -> String {
        if self.0.to_lowercase().starts_with("bearer ") {
            self.0.clone()
        } else {
            format!("Bearer {}", self.0)
        }
    }

    /// Token without any `Bearer ` prefix.
    pub fn raw_value(&self) -> &str {
        if self.0.to_lowercase().starts_with("bearer ") {
            self.0[7..].trim()
        } else {
            &self.0
        }
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// What the gateway reports back for an accepted top-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUpReceipt {
    pub external_transaction_id: String,
    pub message: Option<String>,
    pub raw_response: Option<String>,
}

/// Port trait for the payment gateway that executes recharges.
#[async_trait::async_trait]
pub trait TopUpProvider: Send + Sync + 'static {
    /// Obtains a fresh credential.
    async fn authenticate(&self) -> Result<AuthToken, ProviderError>;

    /// Executes the recharge. Transport, auth and business failures all
    /// come back as `Err`.
    async fn execute_top_up(
        &self,
        request: &TopUpRequest,
        token: &AuthToken,
    ) -> Result<TopUpReceipt, ProviderError>;

    fn provider_name(&self) -> &str;
}
