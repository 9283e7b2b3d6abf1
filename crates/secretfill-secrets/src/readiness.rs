//! Waits for slow-starting backends before anything is written to them.

use secretfill_types::{BackendType, ReadinessProbe, Result, SecretfillError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Whether and how long to wait for a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Never wait
    Disabled,
    /// Wait at most this long
    UpTo(Duration),
}

/// Confirms each backend type at most once per run.
///
/// Only slow-starting backends are probed. Failures are not remembered, so
/// a later descriptor on the same backend retries.
pub struct ReadinessGate {
    probe: Arc<dyn ReadinessProbe>,
    policy: WaitPolicy,
    confirmed: HashSet<String>,
}

impl ReadinessGate {
    /// Create a gate.
    pub fn new(probe: Arc<dyn ReadinessProbe>, policy: WaitPolicy) -> Self {
        Self {
            probe,
            policy,
            confirmed: HashSet::new(),
        }
    }

    /// Whether a backend type has already been confirmed.
    pub fn is_confirmed(&self, backend_type: &str) -> bool {
        self.confirmed.contains(backend_type)
    }

    /// Make sure a backend type is ready to accept writes.
    pub async fn ensure_ready(&mut self, backend_type: &str) -> Result<()> {
        if self.is_confirmed(backend_type) {
            return Ok(());
        }

        let slow = backend_type
            .parse::<BackendType>()
            .map_or(false, |b| b.is_slow_starting());

        if slow {
            match self.policy {
                WaitPolicy::Disabled => {
                    info!("not waiting for the {} backend to be ready", backend_type);
                }
                WaitPolicy::UpTo(max_wait) => {
                    debug!("waiting up to {:?} for the {} backend to be ready", max_wait, backend_type);
                    self.probe
                        .wait_until_ready(max_wait)
                        .await
                        .map_err(|e| SecretfillError::BackendWait {
                            backend: backend_type.to_string(),
                            source: Box::new(e),
                        })?;
                }
            }
        } else {
            debug!("{} backend needs no readiness check", backend_type);
        }

        self.confirmed.insert(backend_type.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingProbe;

    const MAX_WAIT: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_vault_is_probed_once() {
        let probe = Arc::new(CountingProbe::ready());
        let mut gate = ReadinessGate::new(probe.clone(), WaitPolicy::UpTo(MAX_WAIT));

        gate.ensure_ready("vault").await.unwrap();
        gate.ensure_ready("vault").await.unwrap();

        assert_eq!(probe.calls(), 1);
        assert_eq!(probe.last_max_wait(), Some(MAX_WAIT));
        assert!(gate.is_confirmed("vault"));
    }

    #[tokio::test]
    async fn test_fast_backend_is_not_probed() {
        let probe = Arc::new(CountingProbe::ready());
        let mut gate = ReadinessGate::new(probe.clone(), WaitPolicy::UpTo(MAX_WAIT));

        gate.ensure_ready("gcpSecretsManager").await.unwrap();

        assert_eq!(probe.calls(), 0);
        assert!(gate.is_confirmed("gcpSecretsManager"));
    }

    #[tokio::test]
    async fn test_disabled_waiting_skips_probe() {
        let probe = Arc::new(CountingProbe::ready());
        let mut gate = ReadinessGate::new(probe.clone(), WaitPolicy::Disabled);

        gate.ensure_ready("vault").await.unwrap();

        assert_eq!(probe.calls(), 0);
        assert!(gate.is_confirmed("vault"));
    }

    #[tokio::test]
    async fn test_failure_is_wrapped_and_not_cached() {
        let probe = Arc::new(CountingProbe::failing());
        let mut gate = ReadinessGate::new(probe.clone(), WaitPolicy::UpTo(MAX_WAIT));

        let err = gate.ensure_ready("vault").await.unwrap_err();
        assert!(matches!(err, SecretfillError::BackendWait { ref backend, .. } if backend == "vault"));
        assert!(matches!(err.root_cause(), SecretfillError::ReadinessTimeout { .. }));
        assert!(!gate.is_confirmed("vault"));

        let _ = gate.ensure_ready("vault").await;
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test]
    async fn test_unknown_backend_passes_through() {
        let probe = Arc::new(CountingProbe::ready());
        let mut gate = ReadinessGate::new(probe.clone(), WaitPolicy::UpTo(MAX_WAIT));

        gate.ensure_ready("aws").await.unwrap();
        assert_eq!(probe.calls(), 0);
    }
}
