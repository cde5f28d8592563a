use crate::Generator;
use burrow_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use burrow_core::ShortCode;
use rand::distr::Alphanumeric;
use rand::Rng;
use thiserror::Error;

/// The 62 characters a generated alias is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("alias length {0} does not fit a short code")]
    InvalidLength(usize),
}

/// Returns `length` characters drawn uniformly from [`ALPHABET`].
///
/// A `length` of zero yields an empty string.
pub fn random_alias(length: usize) -> String {
    random_alias_with(&mut rand::rng(), length)
}

/// Same as [`random_alias`], driven by the given RNG.
pub fn random_alias_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    rng.sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generates random fixed-length aliases from the thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing aliases of `length` characters.
    ///
    /// The length must fit a [`ShortCode`], otherwise the stored alias could
    /// never be looked up again.
    pub fn new(length: usize) -> Result<Self, GeneratorError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(GeneratorError::InvalidLength(length));
        }
        Ok(Self { length })
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        ShortCode::new_unchecked(random_alias(self.length))
    }
}
