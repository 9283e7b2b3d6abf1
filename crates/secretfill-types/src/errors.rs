//! Error types for secretfill operations.

use std::time::Duration;
use thiserror::Error;

/// The main error type for secretfill operations.
///
/// Leaf variants describe what went wrong; the context variants
/// (`Resolve`, `Commit`, `EditorCreate`, `BackendWait`) attach the
/// ExternalSecret, key and property being worked on when the failure
/// surfaced. Nothing is recovered locally: every error unwinds the run.
#[derive(Error, Debug)]
pub enum SecretfillError {
    /// The secret schema could not be read or parsed
    #[error("Schema error: {0}")]
    SchemaLookup(String),

    /// No editor exists for the requested backend type
    #[error("unsupported ExternalSecret back end {0}")]
    UnsupportedBackend(String),

    /// The schema names a generator that was never registered
    #[error("could not find generator {generator} for property {property} in object {object}")]
    GeneratorNotRegistered {
        /// Generator name from the schema
        generator: String,
        /// Schema object (ExternalSecret name)
        object: String,
        /// Property being generated
        property: String,
    },

    /// A registered generator failed to produce a value
    #[error("failed to invoke generator {generator} for property {property} in object {object}: {message}")]
    Generator {
        /// Generator name
        generator: String,
        /// Schema object (ExternalSecret name)
        object: String,
        /// Property being generated
        property: String,
        /// Underlying failure
        message: String,
    },

    /// A backend did not become ready in time
    #[error("timed out after {waited:?} waiting for the {backend} backend to be ready")]
    ReadinessTimeout {
        /// Backend type being waited on
        backend: String,
        /// How long we waited
        waited: Duration,
    },

    /// The interactive prompt failed (closed terminal, interrupted input)
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// A backend write failed
    #[error("Write error: {0}")]
    Write(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Vault operation error
    #[error("Vault error: {0}")]
    Vault(String),

    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(String),

    /// External command failed
    #[error("Command error: {0}")]
    Command(String),

    /// Resolving one property failed
    #[error("failed to resolve secret value property {property} for key {key} on ExternalSecret {secret}: {source}")]
    Resolve {
        /// ExternalSecret name
        secret: String,
        /// Entry key
        key: String,
        /// Property name
        property: String,
        /// Underlying error
        #[source]
        source: Box<SecretfillError>,
    },

    /// Writing a key's properties failed
    #[error("failed to save properties of key {key} on ExternalSecret {secret}: {source}")]
    Commit {
        /// ExternalSecret name
        secret: String,
        /// Entry key
        key: String,
        /// Underlying error
        #[source]
        source: Box<SecretfillError>,
    },

    /// Creating the editor for an ExternalSecret's backend failed
    #[error("failed to create a secret editor for ExternalSecret {secret}: {source}")]
    EditorCreate {
        /// ExternalSecret name
        secret: String,
        /// Underlying error
        #[source]
        source: Box<SecretfillError>,
    },

    /// Waiting for a backend failed
    #[error("failed to wait for backend type {backend}: {source}")]
    BackendWait {
        /// Backend type
        backend: String,
        /// Underlying error
        #[source]
        source: Box<SecretfillError>,
    },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl SecretfillError {
    /// Attach the ExternalSecret, key and property being resolved.
    pub fn resolving(
        self,
        secret: impl Into<String>,
        key: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        SecretfillError::Resolve {
            secret: secret.into(),
            key: key.into(),
            property: property.into(),
            source: Box::new(self),
        }
    }

    /// Attach the ExternalSecret and key being written.
    pub fn committing(self, secret: impl Into<String>, key: impl Into<String>) -> Self {
        SecretfillError::Commit {
            secret: secret.into(),
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping context wrappers.
    pub fn root_cause(&self) -> &SecretfillError {
        match self {
            SecretfillError::Resolve { source, .. }
            | SecretfillError::Commit { source, .. }
            | SecretfillError::EditorCreate { source, .. }
            | SecretfillError::BackendWait { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A specialized Result type for secretfill operations.
pub type Result<T> = std::result::Result<T, SecretfillError>;

/// Helper macro to bail out with a SecretfillError
///
/// # Example
///
/// ```ignore
/// if token.is_empty() {
///     bail!(Vault, "no token for {}", url);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::SecretfillError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::SecretfillError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::SecretfillError::Other($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::SecretfillError::Other(format!($fmt, $($arg)*)))
    };
}
