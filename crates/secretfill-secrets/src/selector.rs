//! Decides which descriptors and entries a run acts on.

use secretfill_types::{DeclaredEntry, SecretDescriptor};
use std::collections::HashSet;

/// Selects descriptors and the entries to resolve on them.
///
/// With a filter, only descriptors whose name contains it are in scope and
/// every declared entry is a candidate. Without one, only invalid
/// descriptors are in scope and only their missing entries are candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelector {
    filter: Option<String>,
}

impl TargetSelector {
    /// Create a selector. An empty filter is no filter.
    pub fn new(filter: Option<String>) -> Self {
        Self {
            filter: filter.filter(|f| !f.is_empty()),
        }
    }

    /// Selector for missing entries only.
    pub fn missing_only() -> Self {
        Self::default()
    }

    /// Whether a descriptor should be processed.
    pub fn in_scope(&self, descriptor: &SecretDescriptor) -> bool {
        match &self.filter {
            Some(filter) => descriptor.name.contains(filter.as_str()),
            None => descriptor.is_invalid(),
        }
    }

    /// Entries to resolve on a descriptor, in declaration order.
    ///
    /// A `(key, property)` pair declared twice is returned once.
    pub fn candidates<'a>(&self, descriptor: &'a SecretDescriptor) -> Vec<&'a DeclaredEntry> {
        if !self.in_scope(descriptor) {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        descriptor
            .entries
            .iter()
            .filter(|entry| match (&self.filter, &descriptor.error) {
                (Some(_), _) => true,
                (None, Some(error)) => error.is_missing(&entry.key, &entry.property),
                (None, None) => false,
            })
            .filter(|entry| {
                let entry: &'a DeclaredEntry = *entry;
                seen.insert((entry.key.as_str(), entry.property.as_str()))
            })
            .collect()
    }
}
