use super::{Resolution, ValueResolver};
use crate::schema::{PropertySpec, Schema};
use async_trait::async_trait;
use secretfill_types::{DeclaredEntry, Prompter, Result, SecretDescriptor};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a schema-described property is prompted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Masked free-text input
    Password,
    /// Value plus confirmation; not supported yet
    Confirm,
}

impl PromptKind {
    /// Classify a property by its `kind` label.
    pub fn of(property: &PropertySpec) -> Self {
        match property.kind() {
            Some("confirm") => PromptKind::Confirm,
            _ => PromptKind::Password,
        }
    }
}

/// Prompts an operator for every candidate entry.
pub struct InteractiveResolver {
    schema: Arc<Schema>,
    prompter: Arc<dyn Prompter>,
}

impl InteractiveResolver {
    /// Create a resolver.
    pub fn new(schema: Arc<Schema>, prompter: Arc<dyn Prompter>) -> Self {
        Self { schema, prompter }
    }

    fn ask(&self, message: &str, help: &str) -> Result<Resolution> {
        self.prompter.pick_password(message, help).map(Resolution::Value)
    }
}

fn fallback_message(descriptor: &SecretDescriptor, entry: &DeclaredEntry) -> String {
    format!("{}.{}", descriptor.name, entry.property)
}

#[async_trait]
impl ValueResolver for InteractiveResolver {
    fn name(&self) -> &'static str {
        "interactive"
    }

    fn keeps_blank_values(&self) -> bool {
        true
    }

    async fn resolve(&self, descriptor: &SecretDescriptor, entry: &DeclaredEntry) -> Result<Resolution> {
        let Some(found) = self.schema.lookup(&descriptor.name, &entry.property) else {
            debug!("no schema for {}.{}", descriptor.name, entry.property);
            return self.ask(&fallback_message(descriptor, entry), "");
        };

        match PromptKind::of(found.property) {
            PromptKind::Confirm => {
                warn!(
                    "property {} of ExternalSecret {} needs a confirmation prompt, which is not supported; skipping",
                    entry.property, descriptor.name
                );
                Ok(Resolution::UnsupportedClassification {
                    kind: "confirm".to_string(),
                })
            }
            PromptKind::Password => {
                let question = &found.property.question;
                if question.is_empty() {
                    self.ask(&fallback_message(descriptor, entry), &found.property.help)
                } else {
                    self.ask(question, &found.property.help)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedPrompter;
    use secretfill_types::SecretfillError;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::parse(
                r#"
spec:
  objects:
  - name: jx-admin-user
    properties:
    - name: password
      question: Admin password
      help: The password for the admin user
    - name: token
      labels:
        kind: confirm
"#,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_prompts_with_schema_question() {
        let prompter = Arc::new(ScriptedPrompter::new(["hunter2"]));
        let resolver = InteractiveResolver::new(schema(), prompter.clone());
        let d = SecretDescriptor::new("jx-admin-user", "vault").with_entry("admin", "password");

        let resolution = resolver.resolve(&d, &d.entries[0]).await.unwrap();

        assert_eq!(resolution, Resolution::Value("hunter2".to_string()));
        assert_eq!(
            prompter.asked(),
            vec![("Admin password".to_string(), "The password for the admin user".to_string())]
        );
    }

    #[tokio::test]
    async fn test_prompts_with_synthesized_label_without_schema() {
        let prompter = Arc::new(ScriptedPrompter::new(["abc"]));
        let resolver = InteractiveResolver::new(schema(), prompter.clone());
        let d = SecretDescriptor::new("lighthouse-oauth-token", "vault").with_entry("lighthouse", "oauth");

        let resolution = resolver.resolve(&d, &d.entries[0]).await.unwrap();

        assert_eq!(resolution, Resolution::Value("abc".to_string()));
        assert_eq!(
            prompter.asked(),
            vec![("lighthouse-oauth-token.oauth".to_string(), String::new())]
        );
    }

    #[tokio::test]
    async fn test_confirm_classification_is_not_prompted() {
        let prompter = Arc::new(ScriptedPrompter::new(Vec::<String>::new()));
        let resolver = InteractiveResolver::new(schema(), prompter.clone());
        let d = SecretDescriptor::new("jx-admin-user", "vault").with_entry("admin", "token");

        let resolution = resolver.resolve(&d, &d.entries[0]).await.unwrap();

        assert_eq!(
            resolution,
            Resolution::UnsupportedClassification {
                kind: "confirm".to_string()
            }
        );
        assert!(prompter.asked().is_empty());
    }

    #[tokio::test]
    async fn test_empty_answer_is_a_value() {
        let prompter = Arc::new(ScriptedPrompter::new([""]));
        let resolver = InteractiveResolver::new(schema(), prompter);
        let d = SecretDescriptor::new("jx-admin-user", "vault").with_entry("admin", "password");

        let resolution = resolver.resolve(&d, &d.entries[0]).await.unwrap();
        assert_eq!(resolution, Resolution::Value(String::new()));
        assert!(resolver.keeps_blank_values());
    }

    #[tokio::test]
    async fn test_prompt_failure_propagates() {
        let prompter = Arc::new(ScriptedPrompter::new(Vec::<String>::new()));
        let resolver = InteractiveResolver::new(schema(), prompter);
        let d = SecretDescriptor::new("jx-admin-user", "vault").with_entry("admin", "password");

        let err = resolver.resolve(&d, &d.entries[0]).await.unwrap_err();
        assert!(matches!(err, SecretfillError::Prompt(_)));
    }

    #[test]
    fn test_prompt_kind() {
        let mut spec = PropertySpec::new("p");
        assert_eq!(PromptKind::of(&spec), PromptKind::Password);

        spec.labels.insert("kind".to_string(), "confirm".to_string());
        assert_eq!(PromptKind::of(&spec), PromptKind::Confirm);

        spec.labels.insert("kind".to_string(), "other".to_string());
        assert_eq!(PromptKind::of(&spec), PromptKind::Password);
    }
}
