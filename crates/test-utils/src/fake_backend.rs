use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use program_starter::errors::{Result, StarterError};
use program_starter::exec::{ScriptBackend, ScriptInvocation, ScriptOutcome};
use program_starter::types::ScriptStep;

/// What the fake backend saw for one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedScript {
    pub program: String,
    pub step: ScriptStep,
    pub command: String,
    /// Value of `PROGRAM` in the environment the script got.
    pub program_var: Option<String>,
}

/// A fake backend that:
/// - records every invocation
/// - reports success unless an exit code or spawn error was scripted for
///   that `(program, step)`.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    recorded: Arc<Mutex<Vec<RecordedScript>>>,
    exit_codes: HashMap<(String, ScriptStep), i32>,
    spawn_errors: HashMap<(String, ScriptStep), String>,
    captured_env: Arc<Mutex<HashMap<(String, ScriptStep), Vec<(String, String)>>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program`'s `step` exit with `code`.
    pub fn fail_with(mut self, program: &str, step: ScriptStep, code: i32) -> Self {
        self.exit_codes.insert((program.to_string(), step), code);
        self
    }

    /// Make `program`'s `step` fail before running, as if the shell could not spawn.
    pub fn spawn_error(mut self, program: &str, step: ScriptStep, msg: &str) -> Self {
        self.spawn_errors.insert((program.to_string(), step), msg.to_string());
        self
    }

    /// Shared handle to the recorded scripts; stays valid after the backend
    /// is moved into an orchestrator.
    pub fn recorded(&self) -> Arc<Mutex<Vec<RecordedScript>>> {
        Arc::clone(&self.recorded)
    }

    /// Full environment a given step ran with, if it ran.
    pub fn env_of(&self, program: &str, step: ScriptStep) -> Option<Vec<(String, String)>> {
        self.captured_env
            .lock()
            .unwrap()
            .get(&(program.to_string(), step))
            .cloned()
    }
}

impl ScriptBackend for RecordingBackend {
    fn run_script(
        &mut self,
        invocation: ScriptInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<ScriptOutcome>> + Send + '_>> {
        Box::pin(async move {
            let key = (invocation.program.clone(), invocation.step);

            if let Some(msg) = self.spawn_errors.get(&key) {
                return Err(StarterError::Other(anyhow::anyhow!("{msg}")));
            }

            let env: Vec<(String, String)> = invocation
                .env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            self.captured_env.lock().unwrap().insert(key.clone(), env);

            self.recorded.lock().unwrap().push(RecordedScript {
                program: invocation.program.clone(),
                step: invocation.step,
                command: invocation.command.clone(),
                program_var: invocation.env.get("PROGRAM").map(str::to_string),
            });

            Ok(match self.exit_codes.get(&key) {
                Some(&code) => ScriptOutcome::Failed(code),
                None => ScriptOutcome::Success,
            })
        })
    }
}
