//! Core types and traits for tls-rotate.
//!
//! This crate provides the pieces shared between the certificate issuer,
//! the Kubernetes client and the command-line tool:
//!
//! - **Secrets**: [`Secret`], a key/value record of byte blobs
//! - **Stores**: the [`SecretStore`] capability and an in-memory
//!   [`MemorySecretStore`]
//! - **Errors**: [`StoreError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use tls_rotate_core::{Secret, SecretStore, Result};
//!
//! async fn replace_tls(store: &dyn SecretStore, cert: &[u8], key: &[u8]) -> Result<()> {
//!     let mut secret = store.fetch("foobar-tls").await?;
//!     secret.set_tls(cert, key);
//!     store.update("foobar-tls", &secret).await
//! }
//! ```

mod error;
pub mod secret;

pub use error::{Result, StoreError};
pub use secret::{MemorySecretStore, ObjectMeta, Secret, SecretStore, TLS_CERT_KEY, TLS_KEY_KEY};
