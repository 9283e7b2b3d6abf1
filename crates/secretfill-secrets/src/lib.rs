//! # secretfill secrets
//!
//! The engine that fills in ExternalSecret values:
//!
//! - [`TargetSelector`] picks descriptors and entries
//! - [`InteractiveResolver`] and [`AutomaticResolver`] produce values
//! - [`GeneratorRegistry`] holds named value generators
//! - [`ReadinessGate`] waits for slow-starting backends
//! - [`EditorCache`] hands out one editor per backend type
//! - [`SecretPlan`] drives a run and commits one write per key

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod editor;
pub mod generator;
pub mod plan;
pub mod readiness;
pub mod resolver;
pub mod schema;
pub mod selector;

#[cfg(test)]
mod testing;

pub use editor::{BackendEditorFactory, EditorCache, EditorFactory, GsmEditor, VaultEditor};
pub use generator::{Generator, GeneratorContext, GeneratorRegistry};
pub use plan::{KeyBatch, RunReport, SecretPlan, SkippedProperty, WrittenKey};
pub use readiness::{ReadinessGate, WaitPolicy};
pub use resolver::{AutomaticResolver, InteractiveResolver, Resolution, ValueResolver};
pub use schema::{PropertySpec, Schema, SchemaObject};
pub use selector::TargetSelector;
