//! PEM armor for DER blobs.
//!
//! Output is base64 wrapped at 64 columns with LF line endings, the layout
//! most TLS tooling writes and expects in `tls.crt` / `tls.key`.

use pem::{EncodeConfig, LineEnding, Pem};

use crate::IssueError;

/// Block tag for an X.509 certificate
pub const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Block tag for a SEC1 EC private key
pub const EC_PRIVATE_KEY_TAG: &str = "EC PRIVATE KEY";

/// Wrap DER bytes in a PEM block with the given tag.
#[must_use]
pub fn armor(tag: &str, der: &[u8]) -> String {
    let block = Pem::new(tag, der);
    pem::encode_config(&block, EncodeConfig::new().set_line_ending(LineEnding::LF))
}

/// Decode a single PEM block, checking its tag.
pub fn dearmor(tag: &str, text: impl AsRef<[u8]>) -> Result<Vec<u8>, IssueError> {
    let block = pem::parse(text).map_err(|e| IssueError::Encoding(e.to_string()))?;

    if block.tag() != tag {
        return Err(IssueError::Encoding(format!(
            "expected PEM block {tag:?}, found {:?}",
            block.tag()
        )));
    }

    Ok(block.into_contents())
}
