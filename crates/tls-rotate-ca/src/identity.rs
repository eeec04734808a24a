//! Random subject names and P-256 key pairs.

use p256::elliptic_curve::zeroize::Zeroizing;
use p256::{PublicKey, SecretKey};
use std::fmt;
use tracing::debug;

use crate::entropy::EntropySource;
use crate::IssueError;

/// Random bytes behind a subject name. Rendered as twice as many hex chars.
pub const SUBJECT_NAME_BYTES: usize = 8;

/// Length of a P-256 scalar in bytes.
const SCALAR_BYTES: usize = 32;

/// Redraws allowed when a candidate scalar is zero or not below the group
/// order. Each redraw happens with probability below 2^-32.
const MAX_SCALAR_DRAWS: usize = 8;

/// A freshly generated subject name and the key pair bound to it.
pub struct Identity {
    subject_name: String,
    secret_key: SecretKey,
}

impl Identity {
    /// The certificate common name: 16 lowercase hex characters.
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    /// Public half of the key pair.
    pub fn public_key(&self) -> PublicKey {
        self.secret_key.public_key()
    }

    pub(crate) const fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("subject_name", &self.subject_name)
            .finish_non_exhaustive()
    }
}

/// Generate a random subject name and a P-256 key pair.
///
/// The name comes first: exactly [`SUBJECT_NAME_BYTES`] bytes are drawn and
/// any failure is reported as [`IssueError::RandomSource`] without retrying.
/// The key is drawn from the same source afterwards.
pub fn generate_identity<E: EntropySource + ?Sized>(
    entropy: &mut E,
) -> Result<Identity, IssueError> {
    let mut name_bytes = [0u8; SUBJECT_NAME_BYTES];
    entropy
        .fill(&mut name_bytes)
        .map_err(|e| IssueError::RandomSource(e.to_string()))?;
    let subject_name = hex::encode(name_bytes);

    let secret_key = generate_key(entropy)?;
    debug!(subject = %subject_name, "generated identity");

    Ok(Identity {
        subject_name,
        secret_key,
    })
}

fn generate_key<E: EntropySource + ?Sized>(entropy: &mut E) -> Result<SecretKey, IssueError> {
    let mut scalar = Zeroizing::new([0u8; SCALAR_BYTES]);

    for _ in 0..MAX_SCALAR_DRAWS {
        entropy
            .fill(&mut scalar[..])
            .map_err(|e| IssueError::KeyGeneration(e.to_string()))?;

        if let Ok(key) = SecretKey::from_slice(&scalar[..]) {
            return Ok(key);
        }
    }

    Err(IssueError::KeyGeneration(format!(
        "no valid P-256 scalar after {MAX_SCALAR_DRAWS} draws"
    )))
}
