//! Process execution utilities.

use async_trait::async_trait;
use secretfill_types::{CommandLine, CommandRunner, SecretfillError, Result};
use std::collections::HashMap;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Runs commands on the local system.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    env_vars: HashMap<String, String>,
}

impl SystemCommandRunner {
    /// Create a runner that inherits the current environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, command: &CommandLine) -> Result<String> {
        debug!("running: {}", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .envs(&self.env_vars)
            .stdin(if command.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| SecretfillError::Command(format!("failed to start {}: {}", command.program, e)))?;

        if let Some(data) = &command.stdin {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(data.as_bytes()).await?;
                // dropping closes the pipe so the child sees EOF
                drop(stdin);
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(SecretfillError::Command(format!(
                "{} exited with {}: {}",
                command,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
