// src/exec/mod.rs

//! Script execution layer.
//!
//! - [`backend`] provides the `ScriptBackend` trait and the `ShellBackend`
//!   used in production; tests replace it with a recording fake.
//! - [`runner`] walks a program's pre/main/post steps, resolves each
//!   template and hands it to the backend.

pub mod backend;
pub mod runner;

pub use backend::{ScriptBackend, ShellBackend};
pub use runner::ScriptRunner;

use crate::template::Environment;
use crate::types::ScriptStep;

/// A fully resolved script, ready to hand to a backend.
#[derive(Debug, Clone)]
pub struct ScriptInvocation {
    pub program: String,
    pub step: ScriptStep,
    /// Script text after template resolution.
    pub command: String,
    /// Variables the child process is started with.
    pub env: Environment,
}

/// How a script exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    Success,
    Failed(i32),
}
