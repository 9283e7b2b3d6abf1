//! # secretfill services
//!
//! External service clients for secretfill:
//! - **Vault**: KV v2 reads and writes over HTTP
//! - **Kubernetes**: Secret reads, the vault pod readiness probe, and
//!   ExternalSecret verification

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod vault;
pub mod cluster;
pub mod verify;

pub use vault::VaultClient;
pub use cluster::{connect, KubeSecretReader, VaultPodProbe};
pub use verify::ExternalSecretVerifier;
