use async_trait::async_trait;
use secretfill_types::config::GsmSettings;
use secretfill_types::{CommandLine, CommandRunner, Editor, KeyProperties, Result, SecretfillError};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Writes properties to Google Cloud Secret Manager through `gcloud`.
///
/// Each key is one secret. Properties are stored as a JSON object in a new
/// secret version; a single property with an empty name is stored raw.
pub struct GsmEditor {
    runner: Arc<dyn CommandRunner>,
    settings: GsmSettings,
}

impl GsmEditor {
    /// Create an editor.
    pub fn new(runner: Arc<dyn CommandRunner>, settings: GsmSettings) -> Self {
        Self { runner, settings }
    }

    fn gcloud<I, S>(&self, args: I) -> CommandLine
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut command = CommandLine::new(&self.settings.gcloud).arg("secrets").args(args);
        if let Some(project) = &self.settings.project {
            command = command.arg("--project").arg(project);
        }
        command
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let output = self
            .runner
            .run(&self.gcloud(["list", &format!("--filter=name:{}", key), "--format=value(name)"]))
            .await?;

        let suffix = format!("/secrets/{}", key);
        Ok(output.lines().map(str::trim).any(|name| name == key || name.ends_with(&suffix)))
    }

    /// The latest version's payload; `None` only when the secret has no
    /// version to read.
    async fn latest(&self, key: &str) -> Result<Option<String>> {
        match self
            .runner
            .run(&self.gcloud(["versions", "access", "latest", "--secret", key]))
            .await
        {
            Ok(value) => Ok(Some(value)),
            Err(e) if is_missing_version(&e) => {
                debug!("secret {} has no version yet: {}", key, e);
                Ok(None)
            }
            Err(e) => Err(SecretfillError::Write(format!(
                "failed to read the latest version of {}: {}",
                key, e
            ))),
        }
    }
}

fn is_missing_version(err: &SecretfillError) -> bool {
    match err {
        SecretfillError::Command(message) => {
            message.contains("NOT_FOUND") || message.contains("has no versions")
        }
        _ => false,
    }
}

/// Build the payload for a new secret version.
pub fn gsm_payload(existing: Option<&str>, properties: &KeyProperties) -> Result<String> {
    if let [only] = properties.properties.as_slice() {
        if only.property.is_empty() {
            return Ok(only.value.clone());
        }
    }

    let mut fields = match existing.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            _ => {
                return Err(SecretfillError::Write(format!(
                    "existing value of {} is not a JSON object",
                    properties.key
                )))
            }
        },
        None => Map::new(),
    };

    for p in &properties.properties {
        fields.insert(p.property.clone(), Value::String(p.value.clone()));
    }
    Ok(serde_json::to_string(&Value::Object(fields))?)
}

#[async_trait]
impl Editor for GsmEditor {
    async fn write(&self, properties: &KeyProperties) -> Result<()> {
        let key = properties.key.as_str();

        let existing = if self.exists(key).await? {
            self.latest(key).await?
        } else {
            self.runner
                .run(&self.gcloud(["create", key, "--replication-policy=automatic"]))
                .await?;
            None
        };

        let payload = gsm_payload(existing.as_deref(), properties)?;
        self.runner
            .run(&self.gcloud(["versions", "add", key, "--data-file=-"]).stdin(payload))
            .await?;

        info!("saved {} to Google Secret Manager", properties);
        Ok(())
    }
}
