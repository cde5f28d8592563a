//! Alias resolution service.
//!
//! [`ShortenerService`] implements [`burrow_core::Shortener`] on top of any
//! [`burrow_core::Repository`] and [`burrow_generator::Generator`].

pub mod service;

pub use burrow_core::{ShortenParams, Shortener, ShortenerError};
pub use service::{ShortenerService, ShortenerSettings};
