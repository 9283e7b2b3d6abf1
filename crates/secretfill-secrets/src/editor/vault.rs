use async_trait::async_trait;
use secretfill_services::VaultClient;
use secretfill_types::{Editor, KeyProperties, Result};
use std::collections::BTreeMap;
use tracing::info;

/// Writes properties into a Vault KV v2 secret, keeping other fields.
#[derive(Debug)]
pub struct VaultEditor {
    client: VaultClient,
}

impl VaultEditor {
    /// Create an editor over a client.
    pub fn new(client: VaultClient) -> Self {
        Self { client }
    }
}

/// Overlay resolved properties on a secret's existing fields.
pub fn merge_properties(
    existing: Option<BTreeMap<String, String>>,
    properties: &KeyProperties,
) -> BTreeMap<String, String> {
    let mut data = existing.unwrap_or_default();
    for p in &properties.properties {
        data.insert(p.property.clone(), p.value.clone());
    }
    data
}

#[async_trait]
impl Editor for VaultEditor {
    async fn write(&self, properties: &KeyProperties) -> Result<()> {
        let existing = self.client.read_kv(&properties.key).await?;
        let data = merge_properties(existing, properties);
        self.client.write_kv(&properties.key, &data).await?;

        info!("saved {} to vault {}", properties, self.client.url());
        Ok(())
    }
}
