use crate::error::ShortenerError;
use crate::repository::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The destination URL to be shortened.
    pub original_url: String,
    /// Optional custom alias for the shortened URL, as requested.
    ///
    /// It is validated by the shortener after the destination, so a request
    /// with both fields malformed reports the destination.
    pub custom_alias: Option<String>,
}

impl ShortenParams {
    /// Builds parameters from the plain string pair a request carries.
    ///
    /// An empty alias means "generate one".
    pub fn new(original_url: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();

        Self {
            original_url: original_url.into(),
            custom_alias: (!alias.is_empty()).then_some(alias),
        }
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL and returns the alias actually stored.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode>;

    /// Resolves a short code to its stored URL record.
    /// Returns `Err(NotFound)` if the code does not exist.
    async fn resolve(&self, code: &ShortCode) -> Result<UrlRecord>;

    /// Removes a shortened URL by its short code.
    /// Returns `Err(NotFound)` if the code does not exist.
    async fn remove(&self, code: &ShortCode) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_alias_means_generated() {
        let params = ShortenParams::new("https://example.com", "");
        assert_eq!(params.original_url, "https://example.com");
        assert!(params.custom_alias.is_none());
    }

    #[test]
    fn non_empty_alias_is_kept() {
        let params = ShortenParams::new("https://example.com", "custom");
        assert_eq!(params.custom_alias.as_deref(), Some("custom"));
    }

    #[test]
    fn malformed_alias_is_carried_unvalidated() {
        let params = ShortenParams::new("https://example.com", "a/b");
        assert_eq!(params.custom_alias.as_deref(), Some("a/b"));
    }
}
