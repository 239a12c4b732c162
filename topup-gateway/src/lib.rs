//! # Top-Up Gateway
//!
//! HTTP adapter for the third-party payment gateway. Implements the
//! `TopUpProvider` port (authenticate + buy) and a live `SupplierCatalog`.
//!
//! The gateway is stateless from our side: every operation authenticates
//! first and the token is never cached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{error, info, instrument, warn};

use topup_types::{
    AuthToken, ProviderError, Supplier, SupplierCatalog, TopUpProvider, TopUpReceipt,
    TopUpRequest,
};

mod wire;

use wire::{AuthRequest, AuthResponse, BuyRequest, BuyResponse, ErrorBody, SupplierDto};

const PROVIDER_NAME: &str = "Puntored";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Connection settings for the gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            username: username.into(),
            password: password.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Gateway client implementing the provider and catalog ports.
pub struct GatewayClient {
    config: GatewayConfig,
    http: Client,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn transport_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.config.timeout.as_secs())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }

    /// Extracts the gateway's `message` from an error response, falling
    /// back to the HTTP status.
    async fn error_message(resp: Response) -> String {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TopUpProvider implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl TopUpProvider for GatewayClient {
    #[instrument(skip(self))]
    async fn authenticate(&self) -> Result<AuthToken, ProviderError> {
        let resp = self
            .http
            .post(self.url("/auth"))
            .header("x-api-key", &self.config.api_key)
            .json(&AuthRequest {
                user: &self.config.username,
                password: &self.config.password,
            })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let message = Self::error_message(resp).await;
            error!(%message, "gateway authentication rejected");
            return Err(ProviderError::Authentication(message));
        }

        let body: AuthResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Authentication(e.to_string()))?;

        let token = body
            .token
            .ok_or_else(|| ProviderError::Authentication("respuesta sin token".to_string()))?;

        AuthToken::new(token).map_err(|e| ProviderError::Authentication(e.to_string()))
    }

    #[instrument(
        skip(self, request, token),
        fields(phone = %request.phone_number(), supplier_id = %request.supplier_id())
    )]
    async fn execute_top_up(
        &self,
        request: &TopUpRequest,
        token: &AuthToken,
    ) -> Result<TopUpReceipt, ProviderError> {
        let body = BuyRequest {
            cell_phone: request.phone_number().as_str(),
            value: request.amount().value(),
            supplier_id: request.supplier_id().value(),
        };

        info!(supplier = request.supplier_name(), "calling gateway /buy");

        let resp = self
            .http
            .post(self.url("/buy"))
            .header(reqwest::header::AUTHORIZATION, token.raw_value())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let message = Self::error_message(resp).await;
            warn!(status = status.as_u16(), %message, "gateway declined top-up");
            return Err(ProviderError::Declined(message));
        }

        let raw = resp.text().await.map_err(|e| self.transport_error(e))?;
        let parsed: BuyResponse = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let external_transaction_id = parsed
            .transactional_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("la respuesta no contiene transactionalID".into())
            })?;

        info!(%external_transaction_id, "gateway accepted top-up");

        Ok(TopUpReceipt {
            external_transaction_id,
            message: parsed.message,
            raw_response: Some(raw),
        })
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SupplierCatalog implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl SupplierCatalog for GatewayClient {
    #[instrument(skip(self))]
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ProviderError> {
        let token = self.authenticate().await?;

        let resp = self
            .http
            .get(self.url("/getSuppliers"))
            .header(reqwest::header::AUTHORIZATION, token.raw_value())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        match resp.status() {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProviderError::Authentication(
                    Self::error_message(resp).await,
                ));
            }
            _ => return Err(ProviderError::Transport(Self::error_message(resp).await)),
        }

        let suppliers: Vec<SupplierDto> = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(suppliers
            .into_iter()
            .map(|s| Supplier {
                id: s.id,
                name: s.name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = GatewayConfig::new("http://gateway.local/", "key", "user", "pass");
        assert_eq!(config.base_url, "http://gateway.local");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_debug_hides_secrets() {
        let config = GatewayConfig::new("http://gateway.local", "api-secret", "user", "pw-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("api-secret"));
        assert!(!debug.contains("pw-secret"));
    }

    #[test]
    fn test_buy_request_serializes_value_as_number() {
        let body = BuyRequest {
            cell_phone: "3001234567",
            value: rust_decimal_macros::dec!(5000.00),
            supplier_id: "8753",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["cellPhone"], "3001234567");
        assert_eq!(json["supplierId"], "8753");
        assert_eq!(json["value"].as_f64(), Some(5000.0));
    }
}
