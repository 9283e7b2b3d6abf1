//! The ExternalSecret descriptor model consumed by the resolution engine.
//!
//! Descriptors are produced by verification and only read here. A
//! [`KeyProperties`] is the unit of commit: all resolved properties for one
//! key of one descriptor, written with a single editor call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `{key, property}` pair an ExternalSecret expects to exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclaredEntry {
    /// Backend key (vault path, GSM secret id)
    pub key: String,
    /// Property inside the key
    #[serde(default)]
    pub property: String,
    /// Data key of the generated Kubernetes Secret
    #[serde(default)]
    pub name: String,
}

impl DeclaredEntry {
    /// Create an entry whose Kubernetes data key matches the property.
    pub fn new(key: impl Into<String>, property: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            key: key.into(),
            name: property.clone(),
            property,
        }
    }
}

/// The properties verification found missing for one key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryDeficiency {
    /// Backend key
    pub key: String,
    /// Missing property names
    pub properties: Vec<String>,
}

/// Verification result attached to an invalid descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolutionError {
    /// Per-key missing properties
    pub entries: Vec<EntryDeficiency>,
}

impl ResolutionError {
    /// Whether `(key, property)` was reported missing.
    pub fn is_missing(&self, key: &str, property: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.key == key && e.properties.iter().any(|p| p == property))
    }

    /// Whether any property at all was reported missing.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.properties.is_empty())
    }
}

/// A logical secret declared by an ExternalSecret resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretDescriptor {
    /// Resource name
    pub name: String,
    /// Resource namespace
    #[serde(default)]
    pub namespace: String,
    /// Raw `backendType` tag
    pub backend_type: String,
    /// Declared entries, in resource order
    #[serde(default)]
    pub entries: Vec<DeclaredEntry>,
    /// Verification result; `None` means fully populated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResolutionError>,
}

impl SecretDescriptor {
    /// Create a descriptor with no entries.
    pub fn new(name: impl Into<String>, backend_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            backend_type: backend_type.into(),
            entries: Vec::new(),
            error: None,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Declare an entry.
    pub fn with_entry(mut self, key: impl Into<String>, property: impl Into<String>) -> Self {
        self.entries.push(DeclaredEntry::new(key, property));
        self
    }

    /// Record a deficiency for `key`.
    pub fn with_missing(mut self, key: impl Into<String>, properties: &[&str]) -> Self {
        self.error
            .get_or_insert_with(ResolutionError::default)
            .entries
            .push(EntryDeficiency {
                key: key.into(),
                properties: properties.iter().map(|p| p.to_string()).collect(),
            });
        self
    }

    /// Whether verification marked this descriptor as missing values.
    pub fn is_invalid(&self) -> bool {
        self.error.as_ref().map_or(false, |e| !e.is_empty())
    }
}

/// A resolved value for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Property name
    pub property: String,
    /// Resolved value
    pub value: String,
}

/// All resolved properties for one key, written in one editor call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyProperties {
    /// Backend key
    pub key: String,
    /// Properties in resolution order
    pub properties: Vec<PropertyValue>,
}

impl KeyProperties {
    /// Create an empty batch for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property value.
    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.properties.push(PropertyValue {
            property: property.into(),
            value: value.into(),
        });
    }

    /// Whether no properties were resolved.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property names, in order.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.property.as_str()).collect()
    }
}

// Never prints values.
impl fmt::Display for KeyProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.key, self.property_names().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_validity() {
        let populated = SecretDescriptor::new("db-creds", "vault").with_entry("creds", "password");
        assert!(!populated.is_invalid());

        let missing = populated.clone().with_missing("creds", &["password"]);
        assert!(missing.is_invalid());

        let empty_error = populated.with_missing("creds", &[]);
        assert!(!empty_error.is_invalid());
    }

    #[test]
    fn test_resolution_error_matches_key_and_property() {
        let d = SecretDescriptor::new("db-creds", "vault").with_missing("creds", &["password"]);
        let err = d.error.unwrap();

        assert!(err.is_missing("creds", "password"));
        assert!(!err.is_missing("other", "password"));
        assert!(!err.is_missing("creds", "username"));
    }

    #[test]
    fn test_key_properties_display_hides_values() {
        let mut kp = KeyProperties::new("secret/data/db");
        kp.push("username", "admin");
        kp.push("password", "hunter2");

        let shown = kp.to_string();
        assert_eq!(shown, "secret/data/db [username, password]");
        assert!(!shown.contains("hunter2"));
    }
}
