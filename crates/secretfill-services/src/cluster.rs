//! Kubernetes access: Secret reads and the vault pod readiness probe.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Pod, Secret};
use kube::{Api, Client};
use secretfill_types::{ReadinessProbe, SecretReader, SecretfillError, Result};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Connect using the local kubeconfig or in-cluster service account.
pub async fn connect() -> Result<Client> {
    Client::try_default()
        .await
        .map_err(|e| SecretfillError::Kube(format!("failed to create Kubernetes client: {}", e)))
}

/// Decode one entry of a Secret, checking `data` then `stringData`.
pub fn secret_entry(secret: &Secret, key: &str) -> Option<String> {
    if let Some(value) = secret.data.as_ref().and_then(|d| d.get(key)) {
        return Some(String::from_utf8_lossy(&value.0).into_owned());
    }
    secret.string_data.as_ref().and_then(|d| d.get(key)).cloned()
}

/// Reads entries of Kubernetes Secrets through the API server.
#[derive(Clone)]
pub struct KubeSecretReader {
    client: Client,
}

impl KubeSecretReader {
    /// Create a reader using `client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretReader for KubeSecretReader {
    async fn read_entry(&self, namespace: &str, name: &str, key: &str) -> Result<Option<String>> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = secrets.get_opt(name).await
            .map_err(|e| SecretfillError::Kube(format!("failed to get Secret {}/{}: {}", namespace, name, e)))?;

        Ok(secret.as_ref().and_then(|s| secret_entry(s, key)))
    }
}

/// Whether a pod is running with its `Ready` condition true.
pub fn is_pod_ready(pod: &Pod) -> bool {
    let Some(status) = pod.status.as_ref() else {
        return false;
    };
    if status.phase.as_deref() != Some("Running") {
        return false;
    }
    status.conditions.as_ref().map_or(false, |conditions| {
        conditions.iter().any(|c| c.type_ == "Ready" && c.status == "True")
    })
}

/// Polls the vault pod until it reports ready.
#[derive(Clone)]
pub struct VaultPodProbe {
    client: Client,
    namespace: String,
    pod: String,
    poll_interval: Duration,
}

impl VaultPodProbe {
    /// Create a probe for `namespace/pod`.
    pub fn new(client: Client, namespace: impl Into<String>, pod: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            pod: pod.into(),
            poll_interval: Duration::from_secs(2),
        }
    }

    /// Set the time between polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[async_trait]
impl ReadinessProbe for VaultPodProbe {
    async fn wait_until_ready(&self, max_wait: Duration) -> Result<()> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        let deadline = Instant::now() + max_wait;

        info!("waiting up to {:?} for pod {} in namespace {} to be ready", max_wait, self.pod, self.namespace);

        loop {
            match pods.get_opt(&self.pod).await {
                Ok(Some(pod)) if is_pod_ready(&pod) => {
                    info!("pod {} is ready", self.pod);
                    return Ok(());
                }
                Ok(Some(_)) => debug!("pod {} is not ready yet", self.pod),
                Ok(None) => debug!("pod {} does not exist yet", self.pod),
                // the API server may itself be settling; keep polling
                Err(e) => debug!("failed to get pod {}: {}", self.pod, e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(SecretfillError::ReadinessTimeout {
                    backend: "vault".to_string(),
                    waited: max_wait,
                });
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{PodCondition, PodStatus};
    use k8s_openapi::ByteString;
    use std::collections::BTreeMap;

    fn pod(phase: &str, ready: &str) -> Pod {
        Pod {
            status: Some(PodStatus {
                phase: Some(phase.to_string()),
                conditions: Some(vec![PodCondition {
                    type_: "Ready".to_string(),
                    status: ready.to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_pod_readiness() {
        assert!(is_pod_ready(&pod("Running", "True")));
        assert!(!is_pod_ready(&pod("Running", "False")));
        assert!(!is_pod_ready(&pod("Pending", "True")));
        assert!(!is_pod_ready(&Pod::default()));
    }

    #[test]
    fn test_secret_entry() {
        let mut data = BTreeMap::new();
        data.insert("username".to_string(), ByteString(b"jenkins-x-bot".to_vec()));
        let mut string_data = BTreeMap::new();
        string_data.insert("password".to_string(), "s3cr3t".to_string());

        let secret = Secret {
            data: Some(data),
            string_data: Some(string_data),
            ..Default::default()
        };

        assert_eq!(secret_entry(&secret, "username").as_deref(), Some("jenkins-x-bot"));
        assert_eq!(secret_entry(&secret, "password").as_deref(), Some("s3cr3t"));
        assert_eq!(secret_entry(&secret, "token"), None);
    }
}
