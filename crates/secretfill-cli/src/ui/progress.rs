//! Progress indicators and spinners.

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use secretfill_core::time::pretty_duration;
use secretfill_types::{ReadinessProbe, Result};
use std::time::Duration;

/// Create a spinner for long-running operations.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} {elapsed}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Shows a spinner while another probe waits.
pub struct SpinnerProbe<P> {
    inner: P,
}

impl<P> SpinnerProbe<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: ReadinessProbe> ReadinessProbe for SpinnerProbe<P> {
    async fn wait_until_ready(&self, max_wait: Duration) -> Result<()> {
        let pb = spinner(&format!("Waiting up to {} for vault...", pretty_duration(max_wait)));
        let result = self.inner.wait_until_ready(max_wait).await;
        pb.finish_and_clear();
        result
    }
}
