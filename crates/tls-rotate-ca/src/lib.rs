//! # tls-rotate-ca
//!
//! Throwaway TLS identities for development and test endpoints.
//!
//! ## Pipeline
//!
//! ```text
//! entropy ──► identity (random CN + P-256 key)
//!                │
//!                └──► issuer (serial, validity, self-sign) ──► PEM cert + PEM key
//! ```
//!
//! ## Properties
//!
//! - Subject names are 16 lowercase hex characters from 8 random bytes
//! - Keys are ECDSA P-256, signatures ECDSA with SHA-256
//! - Certificates are self-signed server leaves valid from one hour ago
//!   until 100 days from now
//! - Keys are written as SEC1 `EC PRIVATE KEY` blocks
//!
//! ## Example
//!
//! ```rust,ignore
//! use tls_rotate_ca::{generate_identity, issue_certificate, OsEntropy};
//!
//! let mut entropy = OsEntropy;
//! let identity = generate_identity(&mut entropy)?;
//! let issued = issue_certificate(&identity, &mut entropy)?;
//! std::fs::write("tls.crt", &issued.cert_pem)?;
//! std::fs::write("tls.key", &issued.key_pem)?;
//! ```

pub mod armor;
pub mod entropy;
mod error;
pub mod identity;
pub mod issuer;

pub use armor::{armor, dearmor, CERTIFICATE_TAG, EC_PRIVATE_KEY_TAG};
pub use entropy::{EntropyError, EntropySource, OsEntropy};
pub use error::IssueError;
pub use identity::{generate_identity, Identity};
pub use issuer::{issue_certificate, issue_certificate_at, IssuedCertificate};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Certificate metadata for logging and auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInfo {
    /// Serial number (32 hex chars, zero padded)
    pub serial: String,
    /// Subject common name
    pub subject: String,
    /// Issuer common name (same as subject)
    pub issuer: String,
    /// Not valid before
    pub not_before: DateTime<Utc>,
    /// Not valid after
    pub not_after: DateTime<Utc>,
}

impl CertificateInfo {
    /// Whether `at` falls inside the validity window.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.not_before <= at && at <= self.not_after
    }
}
