//! Download token generation.

use rand::distr::{Alphanumeric, SampleString};

/// Produces candidate download tokens.
///
/// Uniqueness is not the generator's concern; the file service retries on
/// collision.
pub trait TokenGenerator: Send + Sync + 'static {
    /// Produce one candidate token.
    fn generate(&self) -> String;
}

/// Random tokens over `[A-Za-z0-9]`.
#[derive(Debug, Clone)]
pub struct AlphanumericTokenGenerator {
    length: usize,
}

impl AlphanumericTokenGenerator {
    /// Creates a generator producing tokens of `length` characters.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for AlphanumericTokenGenerator {
    fn default() -> Self {
        Self::new(100)
    }
}

impl TokenGenerator for AlphanumericTokenGenerator {
    fn generate(&self) -> String {
        Alphanumeric.sample_string(&mut rand::rng(), self.length)
    }
}
