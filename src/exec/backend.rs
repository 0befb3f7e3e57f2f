// src/exec/backend.rs

//! Pluggable script backend abstraction.
//!
//! The script runner talks to a `ScriptBackend` instead of spawning
//! processes directly, so tests can swap in a backend that records
//! invocations and reports canned exit codes.
//!
//! - `ShellBackend` is the production implementation: one blocking
//!   `sh -c` (or `cmd /C`) invocation per step.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::{ScriptInvocation, ScriptOutcome};

/// Trait abstracting how a single resolved script is executed.
pub trait ScriptBackend: Send {
    /// Run one script to completion and report how it exited.
    ///
    /// `Err` means the script could not be run at all (e.g. the shell failed
    /// to spawn); a script that ran and exited non-zero is
    /// `Ok(ScriptOutcome::Failed(code))`.
    fn run_script(
        &mut self,
        invocation: ScriptInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<ScriptOutcome>> + Send + '_>>;
}

/// Runs scripts through the platform shell, inheriting stdio.
///
/// The child inherits the parent environment with the invocation's variables
/// layered on top, so ambient entries that are not UTF-8 still reach it.
#[derive(Debug, Clone, Default)]
pub struct ShellBackend;

impl ShellBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptBackend for ShellBackend {
    fn run_script(
        &mut self,
        invocation: ScriptInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<ScriptOutcome>> + Send + '_>> {
        Box::pin(async move {
            info!(
                program = %invocation.program,
                step = %invocation.step,
                cmd = %invocation.command,
                "executing script"
            );

            let mut cmd = if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(&invocation.command);
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(&invocation.command);
                c
            };

            cmd.envs(invocation.env.iter())
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());

            let status = cmd.status().await.with_context(|| {
                format!(
                    "running {} script of program '{}'",
                    invocation.step, invocation.program
                )
            })?;

            let code = status.code().unwrap_or(-1);
            debug!(
                program = %invocation.program,
                step = %invocation.step,
                exit_code = code,
                success = status.success(),
                "script exited"
            );

            Ok(if status.success() {
                ScriptOutcome::Success
            } else {
                ScriptOutcome::Failed(code)
            })
        })
    }
}
