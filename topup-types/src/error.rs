//! Error types for the top-up service.

use crate::domain::{TransactionDomain, TransactionId, TransactionStatus};

/// Input validation failures raised by value object construction.
///
/// One variant per failure cause so callers can tell them apart; the
/// messages are the Spanish business texts shown to end users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("El número de teléfono no puede estar vacío")]
    PhoneEmpty,

    #[error("El número de teléfono debe tener exactamente 10 dígitos")]
    PhoneLength,

    #[error("El número de teléfono debe empezar con 3")]
    PhonePrefix,

    #[error("El número de teléfono debe contener solo dígitos")]
    PhoneNotNumeric,

    #[error("El valor no es un número válido: {0}")]
    AmountNotNumeric(String),

    #[error("El valor debe ser mayor o igual a {minimum}")]
    AmountBelowMinimum { minimum: String },

    #[error("El valor debe ser menor o igual a {maximum}")]
    AmountAboveMaximum { maximum: String },

    #[error("El valor debe ser positivo")]
    AmountNotPositive,

    #[error("El ID del proveedor es requerido")]
    SupplierRequired,

    #[error("Proveedor desconocido: {id}. Los IDs válidos son: {valid}")]
    UnknownSupplier { id: String, valid: String },

    #[error("ID de usuario inválido: {0}")]
    InvalidUserId(i64),

    #[error("Parámetros de paginación inválidos: página {page}, tamaño {size}")]
    InvalidPage { page: u32, size: u32 },

    #[error("El token de autenticación no puede estar vacío")]
    EmptyToken,
}

/// Domain-level errors (business rule violations on the aggregate).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Cannot {action} a transaction that is not pending (status: {status})")]
    IllegalState {
        action: &'static str,
        status: TransactionStatus,
    },
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Failures reported by the external top-up provider.
///
/// The orchestration treats every variant the same way: the transaction
/// is finalized as FAILED with the error text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Error de autenticación: {0}")]
    Authentication(String),

    #[error("Error del servicio externo: {0}")]
    Transport(String),

    #[error("Recarga rechazada: {0}")]
    Declined(String),

    #[error("Respuesta inválida del proveedor: {0}")]
    InvalidResponse(String),

    #[error("Tiempo de espera agotado tras {0} segundos")]
    Timeout(u64),
}

/// Errors returned by the top-up orchestration service.
#[derive(Debug, thiserror::Error)]
pub enum TopUpError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepoError),

    /// The provider call failed; the FAILED record has already been persisted.
    #[error("Error procesando la recarga: {message}")]
    ExecutionFailed {
        transaction: Box<TransactionDomain>,
        message: String,
    },

    /// The outcome is known but could not be written; the row is still PENDING.
    #[error("No se pudo registrar el resultado de la transacción {transaction_id}: {source}")]
    FinalizeFailed {
        transaction_id: TransactionId,
        external_transaction_id: Option<String>,
        #[source]
        source: RepoError,
    },

    #[error("Transacción no encontrada: {0}")]
    NotFound(TransactionId),

    #[error("No tienes acceso a esta transacción")]
    Forbidden,

    #[error("Transacción no disponible")]
    Inactive,
}

impl TopUpError {
    /// Returns the persisted transaction id, when the failure left a record behind.
    pub fn transaction_id(&self) -> Option<TransactionId> {
        match self {
            TopUpError::ExecutionFailed { transaction, .. } => transaction.id(),
            TopUpError::FinalizeFailed { transaction_id, .. } => Some(*transaction_id),
            _ => None,
        }
    }
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad gateway: {message}")]
    BadGateway {
        message: String,
        transaction_id: Option<TransactionId>,
    },

    /// The provider call finished but its outcome was not stored; the row
    /// stays PENDING until reconciled.
    #[error("Unrecorded outcome: {message}")]
    Unrecorded {
        message: String,
        transaction_id: TransactionId,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(DomainError::Validation(e)) => AppError::BadRequest(e.to_string()),
            RepoError::Domain(e) => AppError::Internal(e.to_string()),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Conflict(e) => AppError::BadRequest(e),
        }
    }
}

impl From<TopUpError> for AppError {
    fn from(err: TopUpError) -> Self {
        let transaction_id = err.transaction_id();
        match err {
            TopUpError::Validation(e) => AppError::BadRequest(e.to_string()),
            TopUpError::Domain(DomainError::Validation(e)) => AppError::BadRequest(e.to_string()),
            TopUpError::Domain(e) => AppError::Internal(e.to_string()),
            TopUpError::Repository(e) => e.into(),
            e @ TopUpError::ExecutionFailed { .. } => AppError::BadGateway {
                message: e.to_string(),
                transaction_id,
            },
            e @ TopUpError::FinalizeFailed { transaction_id, .. } => AppError::Unrecorded {
                message: e.to_string(),
                transaction_id,
            },
            e @ TopUpError::NotFound(_) => AppError::NotFound(e.to_string()),
            e @ TopUpError::Forbidden => AppError::Forbidden(e.to_string()),
            e @ TopUpError::Inactive => AppError::NotFound(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: AppError = TopUpError::Validation(ValidationError::PhoneLength).into();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("10 dígitos")));
    }

    #[test]
    fn test_inactive_maps_to_not_found() {
        let err: AppError = TopUpError::Inactive.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_finalize_failure_keeps_transaction_id() {
        let err: AppError = TopUpError::FinalizeFailed {
            transaction_id: TransactionId::new(7),
            external_transaction_id: Some("EXT-7".into()),
            source: RepoError::Database("connection reset".into()),
        }
        .into();

        assert!(matches!(
            err,
            AppError::Unrecorded { transaction_id, ref message }
                if transaction_id == TransactionId::new(7) && message.contains("connection reset")
        ));
    }

    #[test]
    fn test_repo_not_found_maps_to_not_found() {
        let err: AppError = RepoError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
