use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::{ErrorKind, ShortenerError};
use thiserror::Error;
use tracing::{error, info};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

pub const REALM: &str = r#"Basic realm="burrow""#;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("empty request")]
    EmptyBody,
    #[error("failed to decode request")]
    InvalidBody(#[source] serde_json::Error),
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::EmptyBody | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Shortener(err) => match err.kind() {
                ErrorKind::InvalidDestination | ErrorKind::InvalidShortCode => {
                    StatusCode::BAD_REQUEST
                }
                ErrorKind::AlreadyExists => StatusCode::CONFLICT,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// The message shown to the client. Store faults are logged, not echoed.
    fn public_message(&self) -> String {
        match self {
            AppError::Shortener(err) => match err.kind() {
                ErrorKind::InvalidDestination => "field URL is not a valid URL".to_string(),
                ErrorKind::InvalidShortCode => err.to_string(),
                ErrorKind::AlreadyExists => "alias already exists".to_string(),
                ErrorKind::NotFound => "not found".to_string(),
                ErrorKind::Store => "internal error".to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = ?self, "request failed");
        } else {
            info!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(ErrorResponse::new(self.public_message()));
        let mut response = (status, body).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(REALM));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::StorageError;

    #[test]
    fn shortener_kinds_map_to_statuses() {
        let cases = [
            (ShortenerError::InvalidUrl("x".into()), StatusCode::BAD_REQUEST),
            (ShortenerError::InvalidShortCode("x".into()), StatusCode::BAD_REQUEST),
            (ShortenerError::AliasConflict("x".into()), StatusCode::CONFLICT),
            (ShortenerError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ShortenerError::GenerationExhausted { attempts: 5 },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ShortenerError::Storage(StorageError::Query("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn store_details_are_not_exposed() {
        let err = AppError::from(ShortenerError::Storage(StorageError::Query(
            "no such table: url".into(),
        )));
        assert_eq!(err.public_message(), "internal error");
    }

    #[test]
    fn unauthorized_carries_challenge() {
        let response = AppError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], REALM);
    }
}
