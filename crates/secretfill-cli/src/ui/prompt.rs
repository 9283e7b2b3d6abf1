//! Masked value prompts.

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Password;
use secretfill_types::{Prompter, Result, SecretfillError};

/// Prompts on the controlling terminal with hidden input.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn pick_password(&self, message: &str, help: &str) -> Result<String> {
        if !help.is_empty() {
            eprintln!("{}", style(help).dim());
        }

        Password::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| SecretfillError::Prompt(format!("failed to read {}: {}", message, e)))
    }
}
