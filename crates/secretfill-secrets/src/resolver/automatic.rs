use super::{Resolution, ValueResolver};
use crate::generator::{GeneratorContext, GeneratorRegistry};
use crate::schema::Schema;
use async_trait::async_trait;
use secretfill_types::{DeclaredEntry, Result, SecretDescriptor, SecretfillError};
use std::sync::Arc;
use tracing::debug;

/// Resolves values from schema defaults and registered generators.
pub struct AutomaticResolver {
    schema: Arc<Schema>,
    generators: GeneratorRegistry,
}

impl AutomaticResolver {
    /// Create a resolver.
    pub fn new(schema: Arc<Schema>, generators: GeneratorRegistry) -> Self {
        Self { schema, generators }
    }
}

#[async_trait]
impl ValueResolver for AutomaticResolver {
    fn name(&self) -> &'static str {
        "automatic"
    }

    fn keeps_blank_values(&self) -> bool {
        false
    }

    async fn resolve(&self, descriptor: &SecretDescriptor, entry: &DeclaredEntry) -> Result<Resolution> {
        let Some(found) = self.schema.lookup(&descriptor.name, &entry.property) else {
            debug!("no schema for {}.{}, leaving it unset", descriptor.name, entry.property);
            return Ok(Resolution::Unset);
        };
        let property = found.property;

        if let Some(value) = property.default_value() {
            return Ok(Resolution::Value(value.to_string()));
        }

        let Some(name) = property.generator() else {
            return Ok(Resolution::Unset);
        };

        let generator = self
            .generators
            .get(name)
            .ok_or_else(|| SecretfillError::GeneratorNotRegistered {
                generator: name.to_string(),
                object: found.object.name.clone(),
                property: property.name.clone(),
            })?;

        let ctx = GeneratorContext {
            schema: &self.schema,
            object: found.object,
            property,
        };
        debug!("generating {}.{} with {}", found.object.name, property.name, name);

        generator
            .generate(&ctx)
            .await
            .map(Resolution::Value)
            .map_err(|e| SecretfillError::Generator {
                generator: name.to_string(),
                object: found.object.name.clone(),
                property: property.name.clone(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PropertySpec;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::parse(
                r#"
spec:
  objects:
  - name: jx-admin-user
    properties:
    - name: username
      defaultValue: admin
      generator: broken
    - name: password
      generator: fixed
    - name: email
    - name: token
      generator: nosuch
    - name: webhook
      generator: broken
    - name: blank
      generator: blank
"#,
            )
            .unwrap(),
        )
    }

    fn fixed(ctx: &GeneratorContext<'_>) -> Result<String> {
        Ok(format!("generated-{}", ctx.property.name))
    }

    fn broken(_: &GeneratorContext<'_>) -> Result<String> {
        Err(SecretfillError::Other("boom".to_string()))
    }

    fn blank(_: &GeneratorContext<'_>) -> Result<String> {
        Ok(String::new())
    }

    fn resolver() -> AutomaticResolver {
        let generators = GeneratorRegistry::new()
            .with("fixed", fixed)
            .with("broken", broken)
            .with("blank", blank);
        AutomaticResolver::new(schema(), generators)
    }

    async fn resolve(property: &str) -> Result<Resolution> {
        let d = SecretDescriptor::new("jx-admin-user", "vault").with_entry("admin", property);
        resolver().resolve(&d, &d.entries[0]).await
    }

    #[tokio::test]
    async fn test_default_wins_over_generator() {
        assert_eq!(resolve("username").await.unwrap(), Resolution::Value("admin".to_string()));
    }

    #[tokio::test]
    async fn test_generator_value() {
        assert_eq!(
            resolve("password").await.unwrap(),
            Resolution::Value("generated-password".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_default_no_generator_is_unset() {
        assert_eq!(resolve("email").await.unwrap(), Resolution::Unset);
    }

    #[tokio::test]
    async fn test_no_schema_is_unset() {
        let d = SecretDescriptor::new("unknown", "vault").with_entry("k", "p");
        assert_eq!(resolver().resolve(&d, &d.entries[0]).await.unwrap(), Resolution::Unset);
    }

    #[tokio::test]
    async fn test_unregistered_generator() {
        let err = resolve("token").await.unwrap_err();
        match err {
            SecretfillError::GeneratorNotRegistered {
                generator,
                object,
                property,
            } => {
                assert_eq!(generator, "nosuch");
                assert_eq!(object, "jx-admin-user");
                assert_eq!(property, "token");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_generator_failure_is_wrapped() {
        let err = resolve("webhook").await.unwrap_err();
        assert!(matches!(err, SecretfillError::Generator { ref message, .. } if message == "boom"));
        assert!(err.to_string().contains("generator broken"));
    }

    #[tokio::test]
    async fn test_blank_generator_value_is_dropped_later() {
        let resolver = resolver();
        assert!(!resolver.keeps_blank_values());
        assert_eq!(resolve("blank").await.unwrap(), Resolution::Value(String::new()));
    }

    #[test]
    fn test_property_spec_helpers() {
        let mut spec = PropertySpec::new("p");
        spec.generator = Some(String::new());
        assert_eq!(spec.generator(), None);
    }
}
