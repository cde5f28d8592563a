use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors returned by repository backends.
///
/// `Conflict` is the only variant callers are expected to branch on; every
/// other variant is a backend fault.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("alias already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors returned by the shortener service.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("alias already exists: {0}")]
    AliasConflict(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("alias not found: {0}")]
    NotFound(String),
    #[error("no free alias found after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
    #[error("storage operation failed")]
    Storage(#[source] StorageError),
}

/// The outcome classes a caller can observe from the shortener.
///
/// Boundary layers map these onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyExists,
    InvalidDestination,
    InvalidShortCode,
    NotFound,
    Store,
}

impl ShortenerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShortenerError::AliasConflict(_) => ErrorKind::AlreadyExists,
            ShortenerError::InvalidUrl(_) => ErrorKind::InvalidDestination,
            ShortenerError::InvalidShortCode(_) => ErrorKind::InvalidShortCode,
            ShortenerError::NotFound(_) => ErrorKind::NotFound,
            ShortenerError::GenerationExhausted { .. } | ShortenerError::Storage(_) => {
                ErrorKind::Store
            }
        }
    }
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::AliasConflict(code),
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn conflict_maps_to_alias_conflict() {
        let err = ShortenerError::from(StorageError::Conflict("abc".to_string()));
        assert!(matches!(err, ShortenerError::AliasConflict(ref code) if code == "abc"));
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn backend_faults_keep_their_source() {
        let err = ShortenerError::from(StorageError::Unavailable("pool closed".to_string()));
        assert_eq!(err.kind(), ErrorKind::Store);

        let source = err.source().expect("storage error should be the source");
        assert_eq!(source.to_string(), "storage backend unavailable: pool closed");
    }

    #[test]
    fn exhausted_generation_is_a_store_fault() {
        let err = ShortenerError::GenerationExhausted { attempts: 5 };
        assert_eq!(err.kind(), ErrorKind::Store);
        assert_eq!(err.to_string(), "no free alias found after 5 attempts");
    }
}
