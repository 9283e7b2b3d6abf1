//! Backend editors and the per-run editor cache.

mod gsm;
mod vault;

pub use gsm::{gsm_payload, GsmEditor};
pub use vault::{merge_properties, VaultEditor};

use secretfill_services::VaultClient;
use secretfill_types::config::{GsmSettings, VaultSettings};
use secretfill_types::{BackendType, CommandRunner, Editor, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Creates the editor for a backend type.
pub trait EditorFactory: Send + Sync {
    /// Create an editor. Called at most once per backend type per run.
    fn create(&self, backend: BackendType) -> Result<Arc<dyn Editor>>;
}

/// Creates the real Vault and Secret Manager editors.
pub struct BackendEditorFactory {
    vault: VaultSettings,
    gsm: GsmSettings,
    runner: Arc<dyn CommandRunner>,
}

impl BackendEditorFactory {
    /// Create a factory.
    pub fn new(vault: VaultSettings, gsm: GsmSettings, runner: Arc<dyn CommandRunner>) -> Self {
        Self { vault, gsm, runner }
    }
}

impl EditorFactory for BackendEditorFactory {
    fn create(&self, backend: BackendType) -> Result<Arc<dyn Editor>> {
        match backend {
            BackendType::Vault => {
                let client = VaultClient::new(self.vault.clone())?;
                Ok(Arc::new(VaultEditor::new(client)))
            }
            BackendType::GcpSecretsManager => {
                Ok(Arc::new(GsmEditor::new(self.runner.clone(), self.gsm.clone())))
            }
        }
    }
}

/// At most one editor per backend type for the whole run.
///
/// Creation failures are not cached.
pub struct EditorCache {
    factory: Arc<dyn EditorFactory>,
    editors: HashMap<BackendType, Arc<dyn Editor>>,
}

impl EditorCache {
    /// Create an empty cache.
    pub fn new(factory: Arc<dyn EditorFactory>) -> Self {
        Self {
            factory,
            editors: HashMap::new(),
        }
    }

    /// The editor for a `backendType` tag, creating it on first use.
    pub fn get_editor(&mut self, backend_type: &str) -> Result<Arc<dyn Editor>> {
        let backend: BackendType = backend_type.parse()?;

        if let Some(editor) = self.editors.get(&backend) {
            return Ok(editor.clone());
        }

        debug!("creating {} editor", backend);
        let editor = self.factory.create(backend)?;
        self.editors.insert(backend, editor.clone());
        Ok(editor)
    }

    /// Number of editors created so far.
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Whether no editor has been created.
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }
}
