//! Vault KV v2 client.

use secretfill_types::{SecretfillError, Result};
use secretfill_types::config::VaultSettings;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

/// Vault client for reading and writing KV v2 secrets.
#[derive(Clone)]
pub struct VaultClient {
    settings: VaultSettings,
    client: Client,
    base_url: Url,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("url", &self.settings.url)
            .field("mount", &self.settings.mount)
            .finish()
    }
}

impl VaultClient {
    /// Create a new Vault client.
    pub fn new(settings: VaultSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.url)
            .map_err(|e| SecretfillError::Vault(format!("Invalid vault URL {}: {}", settings.url, e)))?;

        let mut builder = Client::builder();

        if settings.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()
            .map_err(|e| SecretfillError::Vault(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            settings,
            client,
            base_url,
        })
    }

    /// The vault URL.
    pub fn url(&self) -> &str {
        &self.settings.url
    }

    fn token(&self) -> Result<&str> {
        self.settings.token.as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SecretfillError::Vault("No vault token available (set VAULT_TOKEN)".to_string()))
    }

    /// API path of the KV v2 data endpoint for `key`.
    ///
    /// Keys may be given as `secret/data/a/b`, `secret/a/b` or `a/b`; all
    /// three address the same secret under the configured mount.
    pub fn data_path(&self, key: &str) -> String {
        let mount = self.settings.mount.trim_matches('/');
        let key = key.trim_matches('/');

        let rest = key
            .strip_prefix(mount)
            .and_then(|r| r.strip_prefix('/'))
            .map(|r| r.strip_prefix("data/").unwrap_or(r))
            .unwrap_or(key);

        format!("/v1/{}/data/{}", mount, rest)
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Option<reqwest::Response>> {
        let url = self.base_url.join(path)
            .map_err(|e| SecretfillError::Vault(format!("Invalid path {}: {}", path, e)))?;

        let mut req = self.client.request(method, url)
            .header("X-Vault-Token", self.token()?);

        if let Some(ns) = &self.settings.namespace {
            req = req.header("X-Vault-Namespace", ns);
        }

        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await
            .map_err(|e| SecretfillError::Vault(format!("Request to {} failed: {}", path, e)))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = resp.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SecretfillError::Vault(format!(
                "Vault request to {} failed ({}): {}",
                path, status, error_text
            )));
        }

        Ok(Some(resp))
    }

    /// Read the current properties at `key`; `None` if it does not exist.
    pub async fn read_kv(&self, key: &str) -> Result<Option<BTreeMap<String, String>>> {
        #[derive(Deserialize)]
        struct Response {
            data: Option<Inner>,
        }

        #[derive(Deserialize)]
        struct Inner {
            data: Option<BTreeMap<String, serde_json::Value>>,
        }

        let path = self.data_path(key);
        let Some(resp) = self.request(Method::GET, &path, None).await? else {
            return Ok(None);
        };

        let response: Response = resp.json().await
            .map_err(|e| SecretfillError::Vault(format!("Failed to parse response from {}: {}", path, e)))?;

        // a deleted latest version reads back with null data
        let Some(data) = response.data.and_then(|d| d.data) else {
            return Ok(None);
        };

        Ok(Some(data.into_iter()
            .map(|(k, v)| {
                let v = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect()))
    }

    /// Write a new version of `key` containing exactly `data`.
    pub async fn write_kv(&self, key: &str, data: &BTreeMap<String, String>) -> Result<()> {
        let path = self.data_path(key);
        let body = serde_json::json!({ "data": data });

        self.request(Method::POST, &path, Some(body)).await?
            .ok_or_else(|| SecretfillError::Vault(format!("mount for {} not found", path)))?;

        Ok(())
    }
}
