use std::sync::Arc;

use burrow_core::Shortener;

use crate::auth::Authorizer;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    authorizer: Arc<dyn Authorizer>,
    base_url: String,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        authorizer: Arc<dyn Authorizer>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            shortener,
            authorizer,
            base_url: public_base_url.into(),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn authorizer(&self) -> &dyn Authorizer {
        self.authorizer.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
