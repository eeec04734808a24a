//! Kubernetes core/v1 Secrets as a [`SecretStore`].

use async_trait::async_trait;
use reqwest::{Certificate, Client as HttpClient, RequestBuilder};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tls_rotate_core::{Result, Secret, SecretStore, StoreError};
use tracing::{debug, warn};
use url::Url;

use crate::config::InClusterConfig;

/// Namespace used when none is given
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Secret store backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeSecretStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    http: HttpClient,
    base_url: Url,
    token: Option<String>,
    namespace: String,
}

impl KubeSecretStore {
    /// Connect using the pod's service account
    pub fn in_cluster(namespace: impl Into<String>) -> Result<Self> {
        let config = InClusterConfig::load()?;
        debug!(base_url = %config.base_url, "loaded in-cluster configuration");
        Self::from_config(config, namespace)
    }

    /// Connect using explicit in-cluster settings
    pub fn from_config(config: InClusterConfig, namespace: impl Into<String>) -> Result<Self> {
        let mut builder = Self::builder(config.base_url)
            .token(config.token)
            .namespace(namespace);
        if let Some(ca_pem) = config.ca_pem {
            builder = builder.ca_pem(ca_pem);
        }
        builder.build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> KubeSecretStoreBuilder {
        KubeSecretStoreBuilder::new(base_url)
    }

    /// Namespace the secrets are read from and written to
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// `/api/v1/namespaces/{namespace}/secrets/{name}` with each segment escaped
    fn secret_url(&self, name: &str) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Config(format!("invalid API server URL: {}", self.inner.base_url)))?
            .pop_if_empty()
            .extend(["api", "v1", "namespaces", self.inner.namespace.as_str(), "secrets", name]);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.inner.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, name: &str, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::handle_error(name, status.as_u16(), response).await)
        }
    }

    /// Convert an error response to a [`StoreError`]
    async fn handle_error(name: &str, status: u16, response: reqwest::Response) -> StoreError {
        let body = response.text().await.unwrap_or_default();

        // The API server answers with a Status object
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or(body);

        match status {
            401 => StoreError::Unauthorized(message),
            403 => StoreError::Forbidden(message),
            404 => StoreError::NotFound {
                name: name.to_string(),
            },
            409 => {
                warn!(name, "secret changed during update");
                StoreError::Conflict(message)
            }
            _ => StoreError::Api {
                code: status,
                message,
            },
        }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn fetch(&self, name: &str) -> Result<Secret> {
        let url = self.secret_url(name)?;
        debug!(url = %url, "GET secret");

        let response = self.send(name, self.inner.http.get(url)).await?;
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        serde_json::from_str(&body).map_err(StoreError::Json)
    }

    async fn update(&self, name: &str, secret: &Secret) -> Result<()> {
        let url = self.secret_url(name)?;
        debug!(url = %url, "PUT secret");

        let body = serde_json::to_vec(secret)?;
        let request = self
            .inner
            .http
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        self.send(name, request).await?;
        Ok(())
    }
}

/// Builder for configuring a [`KubeSecretStore`]
pub struct KubeSecretStoreBuilder {
    base_url: String,
    token: Option<String>,
    ca_pem: Option<Vec<u8>>,
    namespace: String,
    timeout: Duration,
    user_agent: String,
}

impl KubeSecretStoreBuilder {
    /// Create a new builder for the given API server URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            ca_pem: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("tls-rotate/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the bearer token
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Trust the given PEM bundle as the API server's CA
    #[must_use]
    pub fn ca_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_pem = Some(pem.into());
        self
    }

    /// Set the namespace
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the store
    pub fn build(self) -> Result<KubeSecretStore> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| StoreError::Config(format!("invalid API server URL {:?}: {e}", self.base_url)))?;

        if self.namespace.is_empty() {
            return Err(StoreError::Config("namespace must not be empty".to_string()));
        }

        let mut http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent);

        if let Some(pem) = &self.ca_pem {
            let roots = Certificate::from_pem_bundle(pem)
                .map_err(|e| StoreError::Config(format!("invalid cluster CA bundle: {e}")))?;
            for root in roots {
                http = http.add_root_certificate(root);
            }
        }

        let http = http
            .build()
            .map_err(|e| StoreError::Config(format!("unable to build HTTP client: {e}")))?;

        Ok(KubeSecretStore {
            inner: Arc::new(StoreInner {
                http,
                base_url,
                token: self.token,
                namespace: self.namespace,
            }),
        })
    }
}
