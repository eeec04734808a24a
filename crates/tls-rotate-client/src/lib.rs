//! Kubernetes client for tls-rotate.
//!
//! This crate provides [`KubeSecretStore`], a [`SecretStore`] that reads and
//! replaces core/v1 Secrets through the API server, configured either
//! explicitly or from the pod's service account via [`InClusterConfig`].

mod client;
mod config;

pub use client::{KubeSecretStore, KubeSecretStoreBuilder, DEFAULT_NAMESPACE};
pub use config::{InClusterConfig, SERVICE_ACCOUNT_DIR, SERVICE_HOST_ENV, SERVICE_PORT_ENV};
pub use tls_rotate_core::{Result, SecretStore, StoreError};
