//! Cryptographically secure random bytes.
//!
//! Everything random in an issued certificate (subject name, private key,
//! serial number) is drawn through [`EntropySource`], so a failing source
//! surfaces as an error at the step that needed it instead of a panic.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// The random source could not fill the requested buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("entropy source failed: {0}")]
pub struct EntropyError(pub String);

/// A source of cryptographically secure random bytes.
pub trait EntropySource {
    /// Fill `dest` completely or fail. Partial fills are errors.
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| EntropyError(e.to_string()))
    }
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        (**self).fill(dest)
    }
}
