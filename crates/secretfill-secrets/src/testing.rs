//! Test doubles for the engine's seams.

use crate::editor::EditorFactory;
use async_trait::async_trait;
use secretfill_types::{
    BackendType, CommandLine, CommandRunner, Editor, KeyProperties, Prompter, ReadinessProbe, Result,
    SecretReader, SecretfillError,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers prompts from a script and records what was asked.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<(String, String)>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<(String, String)> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn pick_password(&self, message: &str, help: &str) -> Result<String> {
        self.asked.lock().unwrap().push((message.to_string(), help.to_string()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SecretfillError::Prompt("input closed".to_string()))
    }
}

/// Counts readiness checks.
pub struct CountingProbe {
    ready: bool,
    calls: AtomicUsize,
    last_max_wait: Mutex<Option<Duration>>,
}

impl CountingProbe {
    pub fn ready() -> Self {
        Self::with_outcome(true)
    }

    pub fn failing() -> Self {
        Self::with_outcome(false)
    }

    fn with_outcome(ready: bool) -> Self {
        Self {
            ready,
            calls: AtomicUsize::new(0),
            last_max_wait: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_max_wait(&self) -> Option<Duration> {
        *self.last_max_wait.lock().unwrap()
    }
}

#[async_trait]
impl ReadinessProbe for CountingProbe {
    async fn wait_until_ready(&self, max_wait: Duration) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_max_wait.lock().unwrap() = Some(max_wait);
        if self.ready {
            Ok(())
        } else {
            Err(SecretfillError::ReadinessTimeout {
                backend: "vault".to_string(),
                waited: max_wait,
            })
        }
    }
}

#[derive(Default)]
struct WriteLog {
    writes: Mutex<Vec<KeyProperties>>,
    attempts: AtomicUsize,
    fail_from: Option<usize>,
}

struct RecordingEditor {
    log: Arc<WriteLog>,
}

#[async_trait]
impl Editor for RecordingEditor {
    async fn write(&self, properties: &KeyProperties) -> Result<()> {
        let attempt = self.log.attempts.fetch_add(1, Ordering::SeqCst);
        if self.log.fail_from.map_or(false, |n| attempt >= n) {
            return Err(SecretfillError::Write(format!("rejected {}", properties)));
        }
        self.log.writes.lock().unwrap().push(properties.clone());
        Ok(())
    }
}

/// Creates editors that record successful writes in one shared log.
#[derive(Default)]
pub struct RecordingFactory {
    log: Arc<WriteLog>,
    created: Mutex<Vec<BackendType>>,
    attempts: AtomicUsize,
    fail_next: AtomicBool,
}

impl RecordingFactory {
    pub fn failing_once() -> Self {
        let factory = Self::default();
        factory.fail_next.store(true, Ordering::SeqCst);
        factory
    }

    pub fn failing_writes_after(successful: usize) -> Self {
        Self {
            log: Arc::new(WriteLog {
                fail_from: Some(successful),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn created(&self) -> Vec<BackendType> {
        self.created.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<KeyProperties> {
        self.log.writes.lock().unwrap().clone()
    }
}

impl EditorFactory for RecordingFactory {
    fn create(&self, backend: BackendType) -> Result<Arc<dyn Editor>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SecretfillError::Vault("no token".to_string()));
        }
        self.created.lock().unwrap().push(backend);
        Ok(Arc::new(RecordingEditor { log: self.log.clone() }))
    }
}

/// Serves Secret entries from memory.
#[derive(Default)]
pub struct FakeSecretReader {
    entries: HashMap<(String, String, String), String>,
}

impl FakeSecretReader {
    pub fn with_entry(mut self, namespace: &str, name: &str, key: &str, value: &str) -> Self {
        self.entries
            .insert((namespace.to_string(), name.to_string(), key.to_string()), value.to_string());
        self
    }
}

#[async_trait]
impl SecretReader for FakeSecretReader {
    async fn read_entry(&self, namespace: &str, name: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .get(&(namespace.to_string(), name.to_string(), key.to_string()))
            .cloned())
    }
}

/// Records commands; answers with the outcome of the first rule whose word
/// appears among the arguments, or an empty string.
#[derive(Default)]
pub struct FakeCommandRunner {
    rules: Vec<(String, std::result::Result<String, String>)>,
    calls: Mutex<Vec<CommandLine>>,
}

impl FakeCommandRunner {
    pub fn respond(mut self, word: &str, output: &str) -> Self {
        self.rules.push((word.to_string(), Ok(output.to_string())));
        self
    }

    /// Fail matching commands the way a non-zero exit does.
    pub fn fail(mut self, word: &str, stderr: &str) -> Self {
        self.rules.push((word.to_string(), Err(stderr.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeCommandRunner {
    async fn run(&self, command: &CommandLine) -> Result<String> {
        self.calls.lock().unwrap().push(command.clone());
        match self
            .rules
            .iter()
            .find(|(word, _)| command.args.iter().any(|a| a == word))
        {
            Some((_, Ok(output))) => Ok(output.clone()),
            Some((_, Err(stderr))) => Err(SecretfillError::Command(stderr.clone())),
            None => Ok(String::new()),
        }
    }
}
