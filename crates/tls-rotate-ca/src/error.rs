//! Error types for identity generation and certificate issuance.

use thiserror::Error;

/// Errors that can occur while issuing a certificate.
///
/// Each variant names the step that failed. None of them leave partial
/// output behind.
#[derive(Error, Debug)]
pub enum IssueError {
    /// The entropy source could not supply bytes for the subject name.
    #[error("unable to get random bytes for new subject name: {0}")]
    RandomSource(String),

    /// Generating the EC key pair failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Drawing the random serial number failed.
    #[error("failed to generate serial number: {0}")]
    SerialNumber(String),

    /// Building or signing the certificate failed.
    #[error("certificate creation failed: {0}")]
    CertificateBuild(String),

    /// Serializing or armoring the key or certificate failed.
    #[error("encoding failed: {0}")]
    Encoding(String),
}

impl From<rcgen::Error> for IssueError {
    fn from(err: rcgen::Error) -> Self {
        Self::CertificateBuild(err.to_string())
    }
}
