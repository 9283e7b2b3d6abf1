//! The secret schema: questions, defaults and generators per property.
//!
//! The schema lives in the GitOps repository (by default
//! `.jx/gitops/secret-schema.yaml`) and is keyed by ExternalSecret name,
//! then property name:
//!
//! ```yaml
//! apiVersion: secret.jenkins-x.io/v1alpha1
//! kind: Schema
//! spec:
//!   objects:
//!   - name: jx-admin-user
//!     properties:
//!     - name: username
//!       question: Jenkins X Admin Username
//!       defaultValue: admin
//!     - name: password
//!       question: Jenkins X Admin Password
//!       generator: password
//!       minLength: 8
//! ```

use secretfill_types::{SecretfillError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Label carrying a property's classification.
pub const LABEL_KIND: &str = "kind";

/// A loaded secret schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// API version
    #[serde(default)]
    pub api_version: String,
    /// Resource kind
    #[serde(default)]
    pub kind: String,
    /// Schema body
    #[serde(default)]
    pub spec: SchemaSpec,
}

/// Schema body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSpec {
    /// Described objects
    #[serde(default)]
    pub objects: Vec<SchemaObject>,
}

/// The schema for one ExternalSecret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaObject {
    /// ExternalSecret name
    pub name: String,
    /// Whether the secret must be populated
    #[serde(default)]
    pub mandatory: bool,
    /// Property specs
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

/// How to obtain one property's value.
///
/// `min_length`, `max_length`, `pattern`, `format`, `mask` and `retry` are
/// read but not enforced when prompting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    /// Property name
    pub name: String,
    /// Prompt text
    #[serde(default)]
    pub question: String,
    /// Help text shown with the prompt
    #[serde(default)]
    pub help: String,
    /// Value used verbatim when populating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Registered generator name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// Classification labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Minimum length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regex the value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Value format (e.g. `email`, `url`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Mask input
    #[serde(default)]
    pub mask: bool,
    /// Re-prompt on invalid input
    #[serde(default)]
    pub retry: bool,
}

impl PropertySpec {
    /// Create a spec with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Non-empty default value.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref().filter(|v| !v.is_empty())
    }

    /// Non-empty generator name.
    pub fn generator(&self) -> Option<&str> {
        self.generator.as_deref().filter(|g| !g.is_empty())
    }

    /// The `kind` label, if any.
    pub fn kind(&self) -> Option<&str> {
        self.labels.get(LABEL_KIND).map(String::as_str)
    }
}

/// A successful schema lookup.
#[derive(Debug, Clone, Copy)]
pub struct PropertyRef<'a> {
    /// Owning object
    pub object: &'a SchemaObject,
    /// Property spec
    pub property: &'a PropertySpec,
}

impl Schema {
    /// Load a schema file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SecretfillError::SchemaLookup(format!("failed to read schema {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| SecretfillError::SchemaLookup(format!("failed to parse schema {}: {}", path.display(), e)))
    }

    /// Parse schema YAML.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Find an object by name.
    pub fn object(&self, name: &str) -> Option<&SchemaObject> {
        self.spec.objects.iter().find(|o| o.name == name)
    }

    /// Find the spec for `object.property`.
    pub fn lookup(&self, object: &str, property: &str) -> Option<PropertyRef<'_>> {
        let object = self.object(object)?;
        let property = object.properties.iter().find(|p| p.name == property)?;
        Some(PropertyRef { object, property })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"
apiVersion: secret.jenkins-x.io/v1alpha1
kind: Schema
spec:
  objects:
  - name: jx-admin-user
    mandatory: true
    properties:
    - name: username
      question: Jenkins X Admin Username
      help: The administrator user name
      defaultValue: admin
    - name: password
      question: Jenkins X Admin Password
      generator: password
      minLength: 8
      maxLength: 41
  - name: lighthouse-oauth-token
    properties:
    - name: oauth
      question: Git token
      defaultValue: ""
      labels:
        kind: confirm
"#;

    #[test]
    fn test_parse_and_lookup() {
        let schema = Schema::parse(SCHEMA).unwrap();
        assert_eq!(schema.spec.objects.len(), 2);

        let found = schema.lookup("jx-admin-user", "password").unwrap();
        assert_eq!(found.object.name, "jx-admin-user");
        assert!(found.object.mandatory);
        assert_eq!(found.property.generator(), Some("password"));
        assert_eq!(found.property.min_length, Some(8));
        assert_eq!(found.property.max_length, Some(41));

        let username = schema.lookup("jx-admin-user", "username").unwrap();
        assert_eq!(username.property.default_value(), Some("admin"));
        assert_eq!(username.property.help, "The administrator user name");
    }

    #[test]
    fn test_lookup_misses() {
        let schema = Schema::parse(SCHEMA).unwrap();
        assert!(schema.lookup("jx-admin-user", "email").is_none());
        assert!(schema.lookup("db-creds", "password").is_none());
        // exact, case-sensitive names
        assert!(schema.lookup("JX-ADMIN-USER", "username").is_none());
    }

    #[test]
    fn test_empty_default_is_unset() {
        let schema = Schema::parse(SCHEMA).unwrap();
        let oauth = schema.lookup("lighthouse-oauth-token", "oauth").unwrap();
        assert_eq!(oauth.property.default_value(), None);
        assert_eq!(oauth.property.kind(), Some("confirm"));
    }

    #[test]
    fn test_load_errors_are_schema_lookup_failures() {
        let temp_dir = TempDir::new().unwrap();

        let missing = Schema::load(temp_dir.path().join("secret-schema.yaml")).unwrap_err();
        assert!(matches!(missing, SecretfillError::SchemaLookup(_)));

        let path = temp_dir.path().join("broken.yaml");
        fs::write(&path, "spec: [not, a, map").unwrap();
        let broken = Schema::load(&path).unwrap_err();
        assert!(matches!(broken, SecretfillError::SchemaLookup(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret-schema.yaml");
        fs::write(&path, SCHEMA).unwrap();

        let schema = Schema::load(&path).unwrap();
        assert!(schema.object("lighthouse-oauth-token").is_some());
    }
}
