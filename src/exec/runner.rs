// src/exec/runner.rs

//! Per-program lifecycle runner.

use tracing::{debug, error, info, warn};

use crate::config::model::ProgramConfig;
use crate::engine::ProgramOutcome;
use crate::errors::Result;
use crate::exec::backend::ScriptBackend;
use crate::exec::{ScriptInvocation, ScriptOutcome};
use crate::template::{self, Environment};
use crate::types::Lifecycle;

/// Runs the pre/main/post scripts of a program through a [`ScriptBackend`].
pub struct ScriptRunner<B> {
    backend: B,
    base_env: Environment,
}

impl<B: ScriptBackend> ScriptRunner<B> {
    /// `base_env` is the ambient environment with global `envs` already
    /// applied.
    pub fn new(backend: B, base_env: Environment) -> Self {
        Self { backend, base_env }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Environment a program's scripts see: base, then the program's `envs`,
    /// then `PROGRAM=<name>`.
    pub fn program_env(&self, name: &str, program: &ProgramConfig) -> Environment {
        self.base_env.overlay(&program.envs).with_var("PROGRAM", name)
    }

    /// Run one lifecycle transition for a program.
    ///
    /// Never fails: a non-zero step is reported as `Failed`, anything that
    /// prevents a step from running at all is reported as `Errored`.
    pub async fn run(
        &mut self,
        name: &str,
        program: &ProgramConfig,
        lifecycle: Lifecycle,
    ) -> ProgramOutcome {
        match self.run_inner(name, program, lifecycle).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(program = %name, %lifecycle, error = %err, "program {lifecycle} aborted");
                ProgramOutcome::Errored(err.to_string())
            }
        }
    }

    async fn run_inner(
        &mut self,
        name: &str,
        program: &ProgramConfig,
        lifecycle: Lifecycle,
    ) -> Result<ProgramOutcome> {
        let env = self.program_env(name, program);

        for step in lifecycle.steps() {
            let Some(template) = program.script(step) else {
                debug!(program = %name, %step, "no script configured; skipping step");
                continue;
            };

            let command = template::resolve(template, &env)?;
            let invocation = ScriptInvocation {
                program: name.to_string(),
                step,
                command,
                env: env.clone(),
            };

            match self.backend.run_script(invocation).await? {
                ScriptOutcome::Success => {
                    debug!(program = %name, %step, "step succeeded");
                }
                ScriptOutcome::Failed(code) => {
                    warn!(
                        program = %name,
                        %step,
                        exit_code = code,
                        "step failed; skipping remaining steps of this program"
                    );
                    return Ok(ProgramOutcome::Failed {
                        step,
                        exit_code: code,
                    });
                }
            }
        }

        info!(program = %name, %lifecycle, "program {lifecycle} finished");
        Ok(ProgramOutcome::Succeeded)
    }
}
