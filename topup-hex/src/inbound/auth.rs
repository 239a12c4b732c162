//! Caller identity extraction.
//!
//! Token validation happens upstream; requests reach this service with the
//! authenticated user id in the `X-User-Id` header.

use axum::{extract::FromRequestParts, http::request::Parts};

use topup_types::{AppError, UserId};

use super::handlers::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Id of the authenticated user making the request.
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub i64);

fn parse_user_id(header: Option<&str>) -> Option<i64> {
    let id: i64 = header?.trim().parse().ok()?;
    UserId::new(id).ok().map(|u| u.value())
}

impl<S: Send + Sync> FromRequestParts<S> for CallerId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok());

        parse_user_id(header).map(CallerId).ok_or_else(|| {
            ApiError(AppError::Unauthorized(
                "Usuario no autenticado".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id(Some("42")), Some(42));
        assert_eq!(parse_user_id(Some(" 7 ")), Some(7));
    }

    #[test]
    fn test_parse_user_id_rejects_invalid() {
        assert_eq!(parse_user_id(None), None);
        assert_eq!(parse_user_id(Some("abc")), None);
        assert_eq!(parse_user_id(Some("0")), None);
        assert_eq!(parse_user_id(Some("-3")), None);
    }
}
