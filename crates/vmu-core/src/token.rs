//! Random alphanumeric tokens for correlating log records.
//!
//! Tokens are NOT cryptographically secure. Use them for correlation only.

use lazy_static::lazy_static;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Characters a token is drawn from.
pub const TOKEN_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

lazy_static! {
    static ref SHARED_GENERATOR: Mutex<TokenGenerator> = Mutex::new(TokenGenerator::new());
}

/// Owned token generator, for call sites that keep their own.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    rng: SmallRng,
}

impl TokenGenerator {
    /// Generator seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Generator that yields the same tokens for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self, length: usize) -> String {
        random_string_with(&mut self.rng, length)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Token of exactly `length` characters from the process-wide generator.
pub fn random_string(length: usize) -> String {
    SHARED_GENERATOR.lock().generate(length)
}

/// Token of exactly `length` characters drawn from `rng`.
pub fn random_string_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}
