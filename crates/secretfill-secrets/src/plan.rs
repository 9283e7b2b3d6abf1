//! Secret plan execution: select, wait, resolve, aggregate and commit.

use crate::editor::EditorCache;
use crate::generator::GeneratorRegistry;
use crate::readiness::ReadinessGate;
use crate::resolver::{AutomaticResolver, InteractiveResolver, Resolution, ValueResolver};
use crate::schema::Schema;
use crate::selector::TargetSelector;
use indexmap::IndexMap;
use secretfill_types::{KeyProperties, Prompter, Result, SecretDescriptor, SecretfillError};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolved values of one descriptor, grouped by key in first-seen order.
#[derive(Debug, Default)]
pub struct KeyBatch {
    keys: IndexMap<String, KeyProperties>,
}

impl KeyBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value under its key.
    pub fn add(&mut self, key: &str, property: &str, value: String) {
        self.keys
            .entry(key.to_string())
            .or_insert_with(|| KeyProperties::new(key))
            .push(property, value);
    }

    /// Number of keys with at least one value.
    pub fn len(&self) -> usize {
        self.keys.values().filter(|kp| !kp.is_empty()).count()
    }

    /// Whether nothing will be written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One write per non-empty key.
    pub fn into_writes(self) -> impl Iterator<Item = KeyProperties> {
        self.keys.into_values().filter(|kp| !kp.is_empty())
    }
}

/// A key that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenKey {
    /// ExternalSecret name
    pub secret: String,
    /// Backend key
    pub key: String,
    /// Properties written
    pub properties: Vec<String>,
}

/// A property skipped because its classification cannot be prompted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProperty {
    /// ExternalSecret name
    pub secret: String,
    /// Backend key
    pub key: String,
    /// Property name
    pub property: String,
    /// Classification
    pub kind: String,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Descriptors processed
    pub processed: usize,
    /// Descriptors out of scope
    pub out_of_scope: usize,
    /// Keys written, in write order
    pub written: Vec<WrittenKey>,
    /// Properties with an unsupported classification
    pub unsupported: Vec<SkippedProperty>,
}

impl RunReport {
    /// Whether anything was written.
    pub fn wrote_anything(&self) -> bool {
        !self.written.is_empty()
    }
}

/// Drives descriptors through one resolution strategy.
///
/// For each in-scope descriptor, in input order: the backend is made ready,
/// its editor obtained, every candidate entry resolved, and then one write
/// issued per key. The first error aborts the run; writes already issued
/// stay.
pub struct SecretPlan {
    selector: TargetSelector,
    resolver: Box<dyn ValueResolver>,
    gate: ReadinessGate,
    editors: EditorCache,
}

impl SecretPlan {
    /// Create a plan from its parts.
    pub fn new(
        selector: TargetSelector,
        resolver: Box<dyn ValueResolver>,
        gate: ReadinessGate,
        editors: EditorCache,
    ) -> Self {
        Self {
            selector,
            resolver,
            gate,
            editors,
        }
    }

    /// Interactive editing of matching (or missing) entries.
    pub fn edit(
        filter: Option<String>,
        schema: Arc<Schema>,
        prompter: Arc<dyn Prompter>,
        gate: ReadinessGate,
        editors: EditorCache,
    ) -> Self {
        Self::new(
            TargetSelector::new(filter),
            Box::new(InteractiveResolver::new(schema, prompter)),
            gate,
            editors,
        )
    }

    /// Automatic population of missing entries.
    pub fn populate(
        schema: Arc<Schema>,
        generators: GeneratorRegistry,
        gate: ReadinessGate,
        editors: EditorCache,
    ) -> Self {
        Self::new(
            TargetSelector::missing_only(),
            Box::new(AutomaticResolver::new(schema, generators)),
            gate,
            editors,
        )
    }

    /// Run over descriptors in order.
    pub async fn run(&mut self, descriptors: &[SecretDescriptor]) -> Result<RunReport> {
        let mut report = RunReport::default();

        for descriptor in descriptors {
            if !self.selector.in_scope(descriptor) {
                report.out_of_scope += 1;
                continue;
            }
            self.process(descriptor, &mut report).await?;
            report.processed += 1;
        }

        Ok(report)
    }

    async fn process(&mut self, descriptor: &SecretDescriptor, report: &mut RunReport) -> Result<()> {
        let name = descriptor.name.as_str();
        let backend = descriptor.backend_type.as_str();

        self.gate.ensure_ready(backend).await?;

        let editor = self
            .editors
            .get_editor(backend)
            .map_err(|e| SecretfillError::EditorCreate {
                secret: name.to_string(),
                source: Box::new(e),
            })?;
        info!("using {} secrets for ExternalSecret {}", backend, name);

        let mut batch = KeyBatch::new();
        for entry in self.selector.candidates(descriptor) {
            let resolution = self
                .resolver
                .resolve(descriptor, entry)
                .await
                .map_err(|e| e.resolving(name, &entry.key, &entry.property))?;

            match resolution {
                Resolution::Value(value) if value.is_empty() && !self.resolver.keeps_blank_values() => {
                    debug!("{} resolved no value for {}.{}", self.resolver.name(), name, entry.property);
                }
                Resolution::Value(value) => batch.add(&entry.key, &entry.property, value),
                Resolution::Unset => {
                    debug!("{} left {}.{} unset", self.resolver.name(), name, entry.property);
                }
                Resolution::UnsupportedClassification { kind } => {
                    report.unsupported.push(SkippedProperty {
                        secret: name.to_string(),
                        key: entry.key.clone(),
                        property: entry.property.clone(),
                        kind,
                    });
                }
            }
        }

        for properties in batch.into_writes() {
            editor
                .write(&properties)
                .await
                .map_err(|e| e.committing(name, &properties.key))?;

            report.written.push(WrittenKey {
                secret: name.to_string(),
                key: properties.key.clone(),
                properties: properties.property_names().into_iter().map(String::from).collect(),
            });
        }

        Ok(())
    }
}
