//! External command descriptions.

use std::fmt;

/// A command to run, with optional data fed to stdin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    /// Program name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Data written to stdin
    pub stdin: Option<String>,
}

impl CommandLine {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Feed `data` to stdin.
    pub fn stdin(mut self, data: impl Into<String>) -> Self {
        self.stdin = Some(data.into());
        self
    }
}

// stdin is left out: it carries secret values.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_omits_stdin() {
        let cmd = CommandLine::new("gcloud")
            .args(["secrets", "versions", "add", "db"])
            .arg("--data-file=-")
            .stdin("s3cr3t");

        assert_eq!(cmd.to_string(), "gcloud secrets versions add db --data-file=-");
    }
}
