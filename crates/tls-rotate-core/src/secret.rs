//! The secret record and the store capability it is read from and written to.
//!
//! A [`Secret`] mirrors the shape of a Kubernetes core/v1 `Secret`: a
//! metadata block, an optional `data` map of byte blobs, and whatever other
//! fields the server sent. Fields this crate does not model are kept in
//! [`Secret::extra`] so an update writes back exactly what was fetched plus
//! our changes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::{Result, StoreError};

/// Data key holding the PEM certificate
pub const TLS_CERT_KEY: &str = "tls.crt";

/// Data key holding the PEM private key
pub const TLS_KEY_KEY: &str = "tls.key";

/// Object metadata. Only the fields we log or route on are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    /// Labels, annotations, uid and the rest, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A named key/value record holding byte blobs.
///
/// `data` is `None` when the store has never held any values for this
/// secret. Use [`Secret::data_mut`] to get a map that is created on demand.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Values are base64 on the wire and raw bytes here
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_data")]
    pub data: Option<BTreeMap<String, Vec<u8>>>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Secret {
    /// Create an empty secret with the given name and no data map
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.into()),
                ..ObjectMeta::default()
            },
            ..Self::default()
        }
    }

    /// Get a value from the data map
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.data.as_ref()?.get(key).map(Vec::as_slice)
    }

    /// Mutable access to the data map, creating it if it is absent
    pub fn data_mut(&mut self) -> &mut BTreeMap<String, Vec<u8>> {
        self.data.get_or_insert_with(BTreeMap::new)
    }

    /// Insert a value, replacing any previous one under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.data_mut().insert(key.into(), value.into());
    }

    /// Replace the TLS certificate and key, leaving other entries alone
    pub fn set_tls(&mut self, cert_pem: impl Into<Vec<u8>>, key_pem: impl Into<Vec<u8>>) {
        self.insert(TLS_CERT_KEY, cert_pem);
        self.insert(TLS_KEY_KEY, key_pem);
    }
}

// Values can hold private keys, so only the key names are printed.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Option<Vec<&str>> = self
            .data
            .as_ref()
            .map(|data| data.keys().map(String::as_str).collect());

        f.debug_struct("Secret")
            .field("metadata", &self.metadata)
            .field("data_keys", &keys)
            .field("type", &self.secret_type)
            .finish_non_exhaustive()
    }
}

/// Capability to read and replace a secret by name.
///
/// Implementations perform exactly one request per call. Callers get no
/// retry or optimistic-concurrency handling from this trait.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the current state of the named secret
    async fn fetch(&self, name: &str) -> Result<Secret>;

    /// Replace the named secret with the given record
    async fn update(&self, name: &str, secret: &Secret) -> Result<()>;
}

/// A [`SecretStore`] backed by a map in process memory.
///
/// Counts update calls so callers can assert that nothing was written.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: Mutex<BTreeMap<String, Secret>>,
    updates: AtomicUsize,
    fail_updates: AtomicBool,
}

impl MemorySecretStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding one secret
    #[must_use]
    pub fn with_secret(name: impl Into<String>, secret: Secret) -> Self {
        let store = Self::new();
        store.put(name, secret);
        store
    }

    /// Insert or replace a secret without counting it as an update
    pub fn put(&self, name: impl Into<String>, secret: Secret) {
        self.secrets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), secret);
    }

    /// Current state of a secret, if present
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Secret> {
        self.secrets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Number of update calls made so far, including failed ones
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Make every subsequent update call fail
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn fetch(&self, name: &str) -> Result<Secret> {
        debug!(name, "fetching secret from memory");
        self.get(name).ok_or_else(|| StoreError::NotFound {
            name: name.to_string(),
        })
    }

    async fn update(&self, name: &str, secret: &Secret) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        debug!(name, "updating secret in memory");

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                code: 500,
                message: "update rejected".to_string(),
            });
        }

        let mut secrets = self.secrets.lock().unwrap_or_else(PoisonError::into_inner);
        match secrets.get_mut(name) {
            Some(current) => {
                *current = secret.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                name: name.to_string(),
            }),
        }
    }
}

/// Serde adapter between base64 strings on the wire and raw bytes.
mod base64_data {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        data: &Option<BTreeMap<String, Vec<u8>>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match data {
            Some(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, &STANDARD.encode(value))?;
                }
                out.end()
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BTreeMap<String, Vec<u8>>>, D::Error> {
        let Some(encoded) = Option::<BTreeMap<String, String>>::deserialize(deserializer)? else {
            return Ok(None);
        };

        encoded
            .into_iter()
            .map(|(key, value)| {
                STANDARD
                    .decode(value.as_bytes())
                    .map(|bytes| (key.clone(), bytes))
                    .map_err(|e| D::Error::custom(format!("data[{key}] is not base64: {e}")))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_map_created_on_demand() {
        let mut secret = Secret::named("foobar-tls");
        assert!(secret.data.is_none());

        secret.set_tls("cert", "key");

        let data = secret.data.as_ref().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(secret.get(TLS_CERT_KEY), Some(&b"cert"[..]));
        assert_eq!(secret.get(TLS_KEY_KEY), Some(&b"key"[..]));
    }

    #[test]
    fn test_set_tls_keeps_other_entries() {
        let mut secret = Secret::named("foobar-tls");
        secret.insert("foo", "bar");
        secret.insert(TLS_CERT_KEY, "old");

        secret.set_tls("new-cert", "new-key");

        assert_eq!(secret.get("foo"), Some(&b"bar"[..]));
        assert_eq!(secret.get(TLS_CERT_KEY), Some(&b"new-cert"[..]));
        assert_eq!(secret.data.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_wire_format_decodes_base64_and_keeps_unknown_fields() {
        let wire = json!({
            "apiVersion": "v1",
            "kind": "Secret",
            "metadata": {
                "name": "foobar-tls",
                "namespace": "default",
                "resourceVersion": "42",
                "labels": { "app": "demo" }
            },
            "type": "kubernetes.io/tls",
            "data": { "foo": "YmFy" },
            "immutable": false
        });

        let secret: Secret = serde_json::from_value(wire).unwrap();
        assert_eq!(secret.get("foo"), Some(&b"bar"[..]));
        assert_eq!(secret.metadata.resource_version.as_deref(), Some("42"));
        assert_eq!(secret.metadata.extra["labels"]["app"], "demo");
        assert_eq!(secret.extra["immutable"], false);

        let back = serde_json::to_value(&secret).unwrap();
        assert_eq!(back["data"]["foo"], "YmFy");
        assert_eq!(back["metadata"]["labels"]["app"], "demo");
        assert_eq!(back["type"], "kubernetes.io/tls");
        assert_eq!(back["immutable"], false);
    }

    #[test]
    fn test_null_and_missing_data_stay_none() {
        let missing: Secret = serde_json::from_value(json!({ "metadata": {} })).unwrap();
        assert!(missing.data.is_none());

        let null: Secret = serde_json::from_value(json!({ "data": null })).unwrap();
        assert!(null.data.is_none());

        let out = serde_json::to_value(&null).unwrap();
        assert!(out.get("data").is_none());
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let result = serde_json::from_value::<Secret>(json!({ "data": { "tls.key": "%%%" } }));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_hides_values() {
        let mut secret = Secret::named("foobar-tls");
        secret.set_tls("cert", "super-secret-key");

        let printed = format!("{secret:?}");
        assert!(printed.contains("tls.key"));
        assert!(!printed.contains("super-secret-key"));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySecretStore::with_secret("foobar-tls", Secret::named("foobar-tls"));

        let mut secret = store.fetch("foobar-tls").await.unwrap();
        secret.insert("foo", "bar");
        store.update("foobar-tls", &secret).await.unwrap();

        assert_eq!(store.update_count(), 1);
        assert_eq!(store.get("foobar-tls").unwrap().get("foo"), Some(&b"bar"[..]));
    }

    #[tokio::test]
    async fn test_memory_store_missing_secret() {
        let store = MemorySecretStore::new();

        let err = store.fetch("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref name } if name == "nope"));
        assert_eq!(err.status_code(), Some(404));

        let err = store.update("nope", &Secret::named("nope")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_memory_store_failing_updates() {
        let store = MemorySecretStore::with_secret("s", Secret::named("s"));
        store.fail_updates(true);

        let mut secret = store.fetch("s").await.unwrap();
        secret.insert("foo", "bar");

        assert!(store.update("s", &secret).await.is_err());
        assert_eq!(store.update_count(), 1);
        assert!(store.get("s").unwrap().data.is_none());
    }
}
