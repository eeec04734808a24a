//! The rotation pipeline: fetch, generate, issue, write back.

use thiserror::Error;
use tls_rotate_ca::{
    generate_identity, issue_certificate, CertificateInfo, EntropySource, IssueError,
};
use tls_rotate_core::{SecretStore, StoreError};
use tracing::debug;

/// Why a rotation stopped. Nothing has been written when any of these is returned.
#[derive(Error, Debug)]
pub enum RotateError {
    /// The secret could not be read
    #[error("error grabbing secret {name:?}: {source}")]
    Fetch {
        name: String,
        #[source]
        source: StoreError,
    },

    /// Identity generation or certificate issuance failed
    #[error(transparent)]
    Issue(#[from] IssueError),

    /// The secret could not be written back
    #[error("secret update failed for {name:?}: {source}")]
    Update {
        name: String,
        #[source]
        source: StoreError,
    },
}

impl RotateError {
    /// Short name of the step that failed, for logs
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch-secret",
            Self::Issue(IssueError::RandomSource(_)) => "subject-name",
            Self::Issue(IssueError::KeyGeneration(_)) => "key-generation",
            Self::Issue(IssueError::SerialNumber(_)) => "serial-number",
            Self::Issue(IssueError::CertificateBuild(_)) => "certificate",
            Self::Issue(IssueError::Encoding(_)) => "encoding",
            Self::Update { .. } => "update-secret",
        }
    }
}

/// Replace the certificate and key in `secret_name` with freshly issued ones.
///
/// Performs exactly one fetch and at most one update. The update only
/// happens after the certificate and key are fully encoded.
pub async fn rotate<S, E>(
    store: &S,
    secret_name: &str,
    entropy: &mut E,
) -> Result<CertificateInfo, RotateError>
where
    S: SecretStore + ?Sized,
    E: EntropySource + ?Sized,
{
    let mut secret = store
        .fetch(secret_name)
        .await
        .map_err(|source| RotateError::Fetch {
            name: secret_name.to_string(),
            source,
        })?;
    debug!(name = secret_name, ?secret, "fetched secret");

    let identity = generate_identity(entropy)?;
    let issued = issue_certificate(&identity, entropy)?;

    secret.set_tls(issued.cert_pem, issued.key_pem);

    store
        .update(secret_name, &secret)
        .await
        .map_err(|source| RotateError::Update {
            name: secret_name.to_string(),
            source,
        })?;

    Ok(issued.info)
}
