//! Verification of ExternalSecret resources against their Kubernetes Secrets.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::{Api, Client};
use secretfill_types::{
    DeclaredEntry, EntryDeficiency, ResolutionError, SecretDescriptor, SecretfillError, Result, Verifier,
};
use serde::Deserialize;
use tracing::debug;
use crate::cluster::secret_entry;

/// `spec` of a `kubernetes-client.io/v1` ExternalSecret.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretSpec {
    /// Backend type tag
    #[serde(default)]
    pub backend_type: String,
    /// Declared data entries
    #[serde(default)]
    pub data: Vec<ExternalSecretData>,
}

/// One `spec.data` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalSecretData {
    /// Backend key
    pub key: String,
    /// Data key in the generated Secret
    #[serde(default)]
    pub name: String,
    /// Property within the backend key
    #[serde(default)]
    pub property: String,
}

fn external_secret_resource() -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk("kubernetes-client.io", "v1", "ExternalSecret"))
}

/// Build a descriptor, recording every entry whose Secret data is missing.
///
/// An absent Secret makes every entry missing. Deficiencies are grouped by
/// key in declaration order.
pub fn describe(name: &str, namespace: &str, spec: &ExternalSecretSpec, secret: Option<&Secret>) -> SecretDescriptor {
    let mut descriptor = SecretDescriptor::new(name, spec.backend_type.clone()).with_namespace(namespace);
    let mut missing: Vec<EntryDeficiency> = Vec::new();

    for d in &spec.data {
        let data_key = if d.name.is_empty() { &d.property } else { &d.name };
        descriptor.entries.push(DeclaredEntry {
            key: d.key.clone(),
            property: d.property.clone(),
            name: data_key.clone(),
        });

        let populated = secret
            .and_then(|s| secret_entry(s, data_key))
            .map_or(false, |v| !v.is_empty());
        if populated {
            continue;
        }

        match missing.iter_mut().find(|e| e.key == d.key) {
            Some(entry) => entry.properties.push(d.property.clone()),
            None => missing.push(EntryDeficiency {
                key: d.key.clone(),
                properties: vec![d.property.clone()],
            }),
        }
    }

    if !missing.is_empty() {
        descriptor.error = Some(ResolutionError { entries: missing });
    }
    descriptor
}

/// Lists ExternalSecrets and checks their Secrets through the API server.
#[derive(Clone)]
pub struct ExternalSecretVerifier {
    client: Client,
}

impl ExternalSecretVerifier {
    /// Create a verifier using `client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Verifier for ExternalSecretVerifier {
    async fn verify(&self, namespace: Option<&str>) -> Result<Vec<SecretDescriptor>> {
        let resource = external_secret_resource();
        let api: Api<DynamicObject> = match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        };

        let list = api.list(&ListParams::default()).await
            .map_err(|e| SecretfillError::Kube(format!("failed to list ExternalSecrets: {}", e)))?;

        let mut descriptors = Vec::with_capacity(list.items.len());
        for obj in list.items {
            let name = obj.metadata.name.clone().unwrap_or_default();
            let ns = obj.metadata.namespace.clone()
                .or_else(|| namespace.map(String::from))
                .unwrap_or_else(|| "default".to_string());

            let spec: ExternalSecretSpec = obj.data.get("spec")
                .cloned()
                .map(serde_json::from_value)
                .transpose()?
                .unwrap_or_default();

            let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &ns);
            let secret = secrets.get_opt(&name).await
                .map_err(|e| SecretfillError::Kube(format!("failed to get Secret {}/{}: {}", ns, name, e)))?;

            let descriptor = describe(&name, &ns, &spec, secret.as_ref());
            debug!("verified ExternalSecret {}/{}: invalid={}", ns, name, descriptor.is_invalid());
            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }
}
