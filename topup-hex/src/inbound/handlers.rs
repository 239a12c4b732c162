//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use topup_types::{
    AppError, ErrorResponse, PageQuery, PageRequest, SupplierResponse, TopUpProvider,
    TopUpRequestDto, TransactionId, TransactionRepository, TransactionResponse,
};

use super::auth::CallerId;
use crate::TopUpService;

/// Application state shared across handlers.
pub struct AppState<R: TransactionRepository, P: TopUpProvider> {
    pub service: TopUpService<R, P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<topup_types::TopUpError> for ApiError {
    fn from(err: topup_types::TopUpError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, transaction_id) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::BadGateway {
                message,
                transaction_id,
            } => (StatusCode::BAD_GATEWAY, message, transaction_id),
            AppError::Unrecorded {
                message,
                transaction_id,
            } => {
                tracing::error!(error = %message, %transaction_id, "top-up outcome not recorded");
                (StatusCode::INTERNAL_SERVER_ERROR, message, Some(transaction_id))
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
        };

        let body = ErrorResponse {
            error: message,
            code: status.as_u16(),
            transaction_id: transaction_id.map(|id| id.value()),
        };

        (status, Json(body)).into_response()
    }
}

fn parse_transaction_id(raw: &str) -> Result<TransactionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(AppError::BadRequest("ID de transacción inválido".into())))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Top-ups
// ─────────────────────────────────────────────────────────────────────────────

/// Execute a top-up for the calling user.
#[tracing::instrument(skip(state, body), fields(user_id = caller.0))]
pub async fn create_top_up<R: TransactionRepository, P: TopUpProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    caller: CallerId,
    body: Result<Json<TopUpRequestDto>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(|e| ApiError(AppError::BadRequest(e.body_text())))?;

    let tx = state
        .service
        .execute_top_up(&req.cell_phone, req.value, &req.supplier_id, caller.0)
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionResponse::from(tx))))
}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions
// ─────────────────────────────────────────────────────────────────────────────

/// Page through the caller's active transactions.
#[tracing::instrument(skip(state), fields(user_id = caller.0))]
pub async fn list_transactions<R: TransactionRepository, P: TopUpProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    caller: CallerId,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(defaults.page()),
        query.size.unwrap_or(defaults.size()),
    )
    .map_err(|e| ApiError(AppError::BadRequest(e.to_string())))?;

    let page = state.service.get_user_transactions(caller.0, page).await?;
    Ok(Json(page.map(TransactionResponse::from)))
}

/// Get one of the caller's transactions.
#[tracing::instrument(skip(state), fields(user_id = caller.0))]
pub async fn get_transaction<R: TransactionRepository, P: TopUpProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    caller: CallerId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_transaction_id(&id)?;
    let tx = state.service.get_transaction(id, caller.0).await?;
    Ok(Json(TransactionResponse::from(tx)))
}

/// Soft-delete one of the caller's transactions.
#[tracing::instrument(skip(state), fields(user_id = caller.0))]
pub async fn delete_transaction<R: TransactionRepository, P: TopUpProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    caller: CallerId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_transaction_id(&id)?;
    state.service.deactivate_transaction(id, caller.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Undo a soft delete.
#[tracing::instrument(skip(state), fields(user_id = caller.0))]
pub async fn reactivate_transaction<R: TransactionRepository, P: TopUpProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    caller: CallerId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_transaction_id(&id)?;
    let tx = state.service.reactivate_transaction(id, caller.0).await?;
    Ok(Json(TransactionResponse::from(tx)))
}

/// Active transactions sent to a phone number.
#[tracing::instrument(skip(state, _caller))]
pub async fn transactions_by_phone<R: TransactionRepository, P: TopUpProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    _caller: CallerId,
    Path(phone): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.service.get_transactions_by_phone(&phone).await?;
    let body: Vec<TransactionResponse> = transactions
        .iter()
        .map(TransactionResponse::from)
        .collect();
    Ok(Json(body))
}

// ─────────────────────────────────────────────────────────────────────────────
// Suppliers
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_suppliers<R: TransactionRepository, P: TopUpProvider>(
    State(state): State<Arc<AppState<R, P>>>,
) -> impl IntoResponse {
    let suppliers: Vec<SupplierResponse> = state
        .service
        .list_suppliers()
        .await
        .into_iter()
        .map(SupplierResponse::from)
        .collect();
    Json(suppliers)
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn test_unrecorded_outcome_reports_transaction_id() {
        let response = ApiError(AppError::Unrecorded {
            message: "No se pudo registrar el resultado de la transacción 12".into(),
            transaction_id: TransactionId::new(12),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, 500);
        assert_eq!(body.transaction_id, Some(12));
    }
}
