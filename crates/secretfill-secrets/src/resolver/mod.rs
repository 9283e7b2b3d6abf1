//! Strategies for producing a value for one declared entry.
//!
//! [`InteractiveResolver`] asks an operator; [`AutomaticResolver`] uses
//! schema defaults and generators. Both are consumed by
//! [`SecretPlan`](crate::plan::SecretPlan) through [`ValueResolver`].

mod automatic;
mod interactive;

pub use automatic::AutomaticResolver;
pub use interactive::{InteractiveResolver, PromptKind};

use async_trait::async_trait;
use secretfill_types::{DeclaredEntry, Result, SecretDescriptor};

/// Outcome of resolving one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A value to write. May be empty.
    Value(String),
    /// Nothing to write
    Unset,
    /// The schema classifies the property in a way we cannot prompt for
    UnsupportedClassification {
        /// The `kind` label value
        kind: String,
    },
}

/// A value resolution strategy.
///
/// Errors are returned bare; the caller attaches the descriptor, key and
/// property.
#[async_trait]
pub trait ValueResolver: Send + Sync {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Whether an empty [`Resolution::Value`] is still written.
    fn keeps_blank_values(&self) -> bool;

    /// Resolve one declared entry of a descriptor.
    async fn resolve(&self, descriptor: &SecretDescriptor, entry: &DeclaredEntry) -> Result<Resolution>;
}
