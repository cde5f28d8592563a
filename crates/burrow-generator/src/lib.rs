pub mod random;

pub use random::{random_alias, random_alias_with, GeneratorError, RandomGenerator, ALPHABET};

use burrow_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// A generated code is a candidate only: collisions are detected by the
/// repository and handled by the caller.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate short code.
    fn generate(&self) -> ShortCode;
}
