//! Named value generators used when populating secrets automatically.

use crate::schema::{PropertySpec, Schema, SchemaObject};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use secretfill_types::{SecretReader, SecretfillError, Result};
use sha2::Sha256;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Password length when the schema gives no bounds.
pub const DEFAULT_PASSWORD_LENGTH: usize = 20;

/// Longest password the generator will produce.
pub const MAX_PASSWORD_LENGTH: usize = 1024;

/// What a generator is asked to produce a value for.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    /// The whole schema
    pub schema: &'a Schema,
    /// Schema object for the ExternalSecret
    pub object: &'a SchemaObject,
    /// Property being generated
    pub property: &'a PropertySpec,
}

/// Produces a value for a property.
///
/// An empty value with no error means the property is left unset.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a value.
    async fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<String>;
}

#[async_trait]
impl<F> Generator for F
where
    F: Fn(&GeneratorContext<'_>) -> Result<String> + Send + Sync,
{
    async fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<String> {
        self(ctx)
    }
}

/// Generators keyed by exact, case-sensitive name.
///
/// Built once before resolution starts and read-only afterwards.
#[derive(Default, Clone)]
pub struct GeneratorRegistry {
    generators: HashMap<String, Arc<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in generators.
    ///
    /// `gitOperator.username` and `gitOperator.password` read the boot
    /// Secret `boot_secret` in `namespace`.
    pub fn standard(
        reader: Arc<dyn SecretReader>,
        namespace: impl Into<String>,
        boot_secret: impl Into<String>,
    ) -> Self {
        let namespace = namespace.into();
        let boot_secret = boot_secret.into();

        Self::new()
            .with("hmac", HmacGenerator::new())
            .with("password", PasswordGenerator::default())
            .with(
                "gitOperator.username",
                SecretEntryGenerator::new(reader.clone(), &namespace, &boot_secret, "username"),
            )
            .with(
                "gitOperator.password",
                SecretEntryGenerator::new(reader, &namespace, &boot_secret, "password"),
            )
    }

    /// Register a generator, replacing any with the same name.
    pub fn register(&mut self, name: impl Into<String>, generator: impl Generator + 'static) {
        self.generators.insert(name.into(), Arc::new(generator));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, generator: impl Generator + 'static) -> Self {
        self.register(name, generator);
        self
    }

    /// Look up a generator.
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators.get(name).map(|g| g.as_ref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.names())
            .finish()
    }
}

/// HMAC-SHA256 of `<object>.<property>` under a per-run key.
pub struct HmacGenerator {
    key: Vec<u8>,
}

impl HmacGenerator {
    /// Create with a fresh random key.
    pub fn new() -> Self {
        let key: [u8; 32] = thread_rng().gen();
        Self::with_key(key.to_vec())
    }

    /// Create with a fixed key.
    pub fn with_key(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for HmacGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for HmacGenerator {
    async fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<String> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key)
            .map_err(|e| SecretfillError::Other(format!("invalid hmac key: {}", e)))?;
        mac.update(format!("{}.{}", ctx.object.name, ctx.property.name).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Random alphanumeric password sized to the property's length bounds.
#[derive(Debug, Clone)]
pub struct PasswordGenerator {
    default_length: usize,
}

impl PasswordGenerator {
    /// Create with a default length.
    pub fn new(default_length: usize) -> Self {
        Self { default_length }
    }

    /// Length for a property: the default, kept within `minLength` and
    /// `maxLength` and never above [`MAX_PASSWORD_LENGTH`].
    pub fn length_for(&self, property: &PropertySpec) -> Result<usize> {
        let min = property.min_length.unwrap_or(0);
        let max = property
            .max_length
            .filter(|m| *m > 0)
            .unwrap_or(MAX_PASSWORD_LENGTH)
            .min(MAX_PASSWORD_LENGTH);

        if min > max {
            return Err(SecretfillError::Other(format!(
                "minLength {} exceeds the maximum password length {}",
                min, max
            )));
        }

        let length = self.default_length.clamp(min, max);
        if length == 0 {
            return Err(SecretfillError::Other("password length must be positive".to_string()));
        }
        Ok(length)
    }
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_LENGTH)
    }
}

#[async_trait]
impl Generator for PasswordGenerator {
    async fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<String> {
        let length = self.length_for(ctx.property)?;

        Ok(thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect())
    }
}

/// Copies one entry out of an existing Kubernetes Secret.
pub struct SecretEntryGenerator {
    reader: Arc<dyn SecretReader>,
    namespace: String,
    secret: String,
    entry: String,
}

impl SecretEntryGenerator {
    /// Read `entry` from Secret `namespace/secret`.
    pub fn new(
        reader: Arc<dyn SecretReader>,
        namespace: impl Into<String>,
        secret: impl Into<String>,
        entry: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            namespace: namespace.into(),
            secret: secret.into(),
            entry: entry.into(),
        }
    }
}

#[async_trait]
impl Generator for SecretEntryGenerator {
    async fn generate(&self, _ctx: &GeneratorContext<'_>) -> Result<String> {
        let value = self
            .reader
            .read_entry(&self.namespace, &self.secret, &self.entry)
            .await?;

        match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(SecretfillError::Other(format!(
                "no {} entry in Secret {}/{}",
                self.entry, self.namespace, self.secret
            ))),
        }
    }
}
