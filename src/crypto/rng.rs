//! Cryptographically secure random number generator.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Cryptographically secure random number generator.
///
/// A thin wrapper around `OsRng` that gives the rest of the crate a single
/// named entropy source. Every generation and draw operation takes one of
/// these by `&mut` reference; nothing in the library reaches for a hidden
/// process-wide generator. Draws are independent, so the wrapper is freely
/// copyable across tasks.
#[derive(Clone, Copy, Debug)]
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl Default for SecureRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}
