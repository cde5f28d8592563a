use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// The caller identity presented with a mutating request.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
    password: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Extracts HTTP Basic credentials from the `Authorization` header.
    ///
    /// Returns `None` if the header is missing, uses another scheme, or is
    /// not valid base64-encoded `user:password`.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let (scheme, encoded) = value.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Self::new(username, password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Decides whether a caller may create or delete aliases.
#[async_trait]
pub trait Authorizer: Send + Sync + 'static {
    async fn is_authorized(&self, identity: &Identity) -> bool;
}

/// Authorizes exactly one configured user/password pair.
pub struct StaticCredentials {
    expected: Identity,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            expected: Identity::new(username, password),
        }
    }
}

#[async_trait]
impl Authorizer for StaticCredentials {
    async fn is_authorized(&self, identity: &Identity) -> bool {
        let user = identity
            .username
            .as_bytes()
            .ct_eq(self.expected.username.as_bytes());
        let password = identity
            .password
            .as_bytes()
            .ct_eq(self.expected.password.as_bytes());

        (user & password).into()
    }
}

/// Middleware rejecting requests whose caller the authorizer does not accept.
pub async fn require_authorization(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let Some(identity) = Identity::from_headers(request.headers()) else {
        return Err(AppError::Unauthorized);
    };

    if !state.authorizer().is_authorized(&identity).await {
        warn!(user = %identity.username(), "rejected credentials");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
