//! In-cluster connection settings.

use std::path::Path;
use tls_rotate_core::{Result, StoreError};

/// Where Kubernetes mounts the pod's service account credentials
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Environment variable holding the API server host
pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";

/// Environment variable holding the API server port
pub const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";

/// Connection settings for talking to the API server from inside a pod
#[derive(Clone)]
pub struct InClusterConfig {
    /// API server base URL, e.g. `https://10.0.0.1:443`
    pub base_url: String,

    /// Service account bearer token
    pub token: String,

    /// PEM bundle of the cluster CA, if mounted
    pub ca_pem: Option<Vec<u8>>,
}

impl InClusterConfig {
    /// Load from the process environment and the standard service account mount
    pub fn load() -> Result<Self> {
        let host = std::env::var(SERVICE_HOST_ENV).ok();
        let port = std::env::var(SERVICE_PORT_ENV).ok();
        Self::from_parts(host.as_deref(), port.as_deref(), SERVICE_ACCOUNT_DIR)
    }

    /// Build from explicit host/port values and a service account directory
    pub fn from_parts(
        host: Option<&str>,
        port: Option<&str>,
        account_dir: impl AsRef<Path>,
    ) -> Result<Self> {
        let (Some(host), Some(port)) = (non_empty(host), non_empty(port)) else {
            return Err(StoreError::Config(format!(
                "unable to load in-cluster configuration, {SERVICE_HOST_ENV} and {SERVICE_PORT_ENV} must be defined"
            )));
        };

        let base_url = if host.contains(':') {
            // IPv6 service address
            format!("https://[{host}]:{port}")
        } else {
            format!("https://{host}:{port}")
        };

        let account_dir = account_dir.as_ref();
        let token_path = account_dir.join("token");
        let token = std::fs::read_to_string(&token_path)
            .map_err(|e| {
                StoreError::Config(format!(
                    "unable to read service account token {}: {e}",
                    token_path.display()
                ))
            })?
            .trim()
            .to_string();

        if token.is_empty() {
            return Err(StoreError::Config(format!(
                "service account token {} is empty",
                token_path.display()
            )));
        }

        let ca_pem = read_optional(&account_dir.join("ca.crt"))?;

        Ok(Self {
            base_url,
            token,
            ca_pem,
        })
    }
}

// The token is a credential; keep it out of logs.
impl std::fmt::Debug for InClusterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InClusterConfig")
            .field("base_url", &self.base_url)
            .field("ca_pem", &self.ca_pem.as_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io(e)),
    }
}
