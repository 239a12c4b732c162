//! # Top-Up Client SDK
//!
//! A typed Rust client for the Top-Up API.

use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use topup_types::{
    SupplierResponse, TopUpRequestDto, TransactionPageResponse, TransactionResponse,
};

/// Header the API reads the caller's identity from.
const USER_ID_HEADER: &str = "X-User-Id";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        /// Set when the server recorded a failed top-up.
        transaction_id: Option<i64>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-Up API client.
pub struct TopUpClient {
    base_url: String,
    user_id: Option<i64>,
    http: Client,
}

impl TopUpClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: None,
            http: Client::new(),
        }
    }

    /// Sets the user the requests are made on behalf of.
    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Requests a recharge.
    pub async fn top_up(
        &self,
        cell_phone: &str,
        value: Decimal,
        supplier_id: &str,
    ) -> Result<TransactionResponse, ClientError> {
        let req = TopUpRequestDto {
            cell_phone: cell_phone.to_string(),
            value,
            supplier_id: supplier_id.to_string(),
        };
        let builder = self.http.post(self.url("/api/topups")).json(&req);
        self.send(builder).await
    }

    /// Lists the caller's active transactions, newest first.
    pub async fn list_transactions(
        &self,
        page: u32,
        size: u32,
    ) -> Result<TransactionPageResponse, ClientError> {
        let builder = self
            .http
            .get(self.url("/api/transactions"))
            .query(&[("page", page), ("size", size)]);
        self.send(builder).await
    }

    pub async fn get_transaction(&self, id: i64) -> Result<TransactionResponse, ClientError> {
        let builder = self.http.get(self.url(&format!("/api/transactions/{}", id)));
        self.send(builder).await
    }

    /// Soft-deletes a transaction.
    pub async fn delete_transaction(&self, id: i64) -> Result<(), ClientError> {
        let builder = self
            .http
            .delete(self.url(&format!("/api/transactions/{}", id)));
        let resp = self.authorize(builder).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(resp).await)
        }
    }

    pub async fn reactivate_transaction(
        &self,
        id: i64,
    ) -> Result<TransactionResponse, ClientError> {
        let builder = self
            .http
            .post(self.url(&format!("/api/transactions/{}/reactivate", id)));
        self.send(builder).await
    }

    /// Active transactions sent to a phone number.
    pub async fn transactions_by_phone(
        &self,
        phone: &str,
    ) -> Result<Vec<TransactionResponse>, ClientError> {
        let builder = self
            .http
            .get(self.url(&format!("/api/transactions/phone/{}", phone)));
        self.send(builder).await
    }

    pub async fn list_suppliers(&self) -> Result<Vec<SupplierResponse>, ClientError> {
        let builder = self.http.get(self.url("/api/suppliers"));
        self.send(builder).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.user_id {
            Some(user_id) => builder.header(USER_ID_HEADER, user_id.to_string()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let resp = self.authorize(builder).send().await?;
        if resp.status().is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Self::api_error(resp).await)
        }
    }

    async fn api_error(resp: reqwest::Response) -> ClientError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);
        let transaction_id = parsed
            .as_ref()
            .and_then(|v| v.get("transaction_id"))
            .and_then(|id| id.as_i64());
        ClientError::Api {
            status,
            message,
            transaction_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TopUpClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
        assert_eq!(client.user_id, None);
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = TopUpClient::new("http://localhost:3000/");
        assert_eq!(client.url("/health"), "http://localhost:3000/health");
    }

    #[test]
    fn test_client_with_user_id() {
        let client = TopUpClient::new("http://localhost:3000").with_user_id(42);
        assert_eq!(client.user_id, Some(42));
    }

    #[test]
    fn test_user_header_is_attached() {
        let client = TopUpClient::new("http://localhost:3000").with_user_id(7);
        let req = client
            .authorize(client.http.get(client.url("/api/transactions")))
            .build()
            .unwrap();
        assert_eq!(req.headers().get(USER_ID_HEADER).unwrap(), "7");
    }
}
