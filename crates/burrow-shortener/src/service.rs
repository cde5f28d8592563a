use async_trait::async_trait;
use burrow_core::{
    Repository, ShortCode, ShortenParams, Shortener, ShortenerError, StorageError, UrlRecord,
};
use burrow_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;
use url::Url;

/// Tuning knobs for [`ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// How many generated aliases to try before giving up. Values below 1
    /// are treated as 1.
    #[builder(default = 5)]
    max_attempts: usize,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ShortenerSettings {
    pub fn max_attempts(&self) -> usize {
        self.max_attempts.max(1)
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - Destination validation
/// - Alias selection (custom or generated)
/// - Translating repository outcomes into shortener outcomes
///
/// Uniqueness is left entirely to the repository's atomic insert. A custom
/// alias that is taken is reported as a conflict straight away; a generated
/// alias that collides is regenerated up to `max_attempts` times.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, ShortenerSettings::default())
    }

    pub fn with_settings(repository: R, generator: G, settings: ShortenerSettings) -> Self {
        Self::from_shared(Arc::new(repository), Arc::new(generator), settings)
    }

    /// Creates a service over handles that are also used elsewhere, e.g. a
    /// repository the process closes on shutdown.
    pub fn from_shared(repository: Arc<R>, generator: Arc<G>, settings: ShortenerSettings) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    /// Validates that the destination is an absolute URL with a host.
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        let parsed =
            Url::parse(url).map_err(|e| ShortenerError::InvalidUrl(format!("{url}: {e}")))?;

        if !parsed.has_host() {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a host: {url}"
            )));
        }

        Ok(())
    }

    async fn insert_generated(&self, record: UrlRecord) -> Result<ShortCode, ShortenerError> {
        let attempts = self.settings.max_attempts();

        for attempt in 1..=attempts {
            let code = self.generator.generate();

            match self.repository.insert(&code, record.clone()).await {
                Ok(()) => return Ok(code),
                Err(StorageError::Conflict(_)) => {
                    warn!(alias = %code, attempt, "generated alias already taken");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ShortenerError::GenerationExhausted { attempts })
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode, ShortenerError> {
        Self::validate_url(&params.original_url)?;

        let record = UrlRecord::new(params.original_url);

        let code = match params.custom_alias {
            Some(alias) => {
                let code = ShortCode::new(alias)?;
                self.repository.insert(&code, record).await?;
                code
            }
            None => self.insert_generated(record).await?,
        };

        debug!(alias = %code, "url shortened");
        Ok(code)
    }

    async fn resolve(&self, code: &ShortCode) -> Result<UrlRecord, ShortenerError> {
        trace!(alias = %code, "resolving alias");

        self.repository
            .get(code)
            .await?
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))
    }

    async fn remove(&self, code: &ShortCode) -> Result<(), ShortenerError> {
        if self.repository.delete(code).await? {
            Ok(())
        } else {
            Err(ShortenerError::NotFound(code.to_string()))
        }
    }
}
