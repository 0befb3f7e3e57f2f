// src/engine/mod.rs

//! Orchestration engine.
//!
//! Turns a `start`/`stop` request into a [`Plan`] (scope, order and which
//! programs actually execute), then walks the plan sequentially through the
//! script runner and collects a [`RunReport`]. The driving logic lives in
//! [`orchestrator`].

pub mod orchestrator;

pub use orchestrator::Orchestrator;

use std::fmt;

use crate::types::{Lifecycle, ScriptStep};

/// Canonical program name type used throughout the engine.
pub type ProgramName = String;

/// What happened to one program during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramOutcome {
    /// Every configured step exited with status zero.
    Succeeded,
    /// A step exited non-zero; later steps were skipped.
    Failed { step: ScriptStep, exit_code: i32 },
    /// The scripts could not be run (template cycle, spawn failure, ...).
    Errored(String),
    /// Part of the closure only to establish ordering; no scripts ran.
    Traversed,
    /// Skipped because of the failure policy.
    Blocked,
}

impl ProgramOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProgramOutcome::Failed { .. } | ProgramOutcome::Errored(_))
    }
}

impl fmt::Display for ProgramOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramOutcome::Succeeded => f.write_str("ok"),
            ProgramOutcome::Failed { step, exit_code } => {
                write!(f, "failed in {step} (exit code {exit_code})")
            }
            ProgramOutcome::Errored(msg) => write!(f, "error: {msg}"),
            ProgramOutcome::Traversed => f.write_str("traversed"),
            ProgramOutcome::Blocked => f.write_str("blocked"),
        }
    }
}

/// One entry of an execution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub program: ProgramName,
    /// Whether the program's scripts run, or it is only traversed.
    pub execute: bool,
}

/// Ordered plan for one `start` or `stop` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub lifecycle: Lifecycle,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    /// Every program in the plan, in order.
    pub fn order(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.program.as_str()).collect()
    }

    /// Programs whose scripts will run, in order.
    pub fn executed(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.execute)
            .map(|s| s.program.as_str())
            .collect()
    }
}

/// Result of walking a [`Plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub lifecycle: Lifecycle,
    /// `(program, outcome)` in plan order.
    pub entries: Vec<(ProgramName, ProgramOutcome)>,
}

impl RunReport {
    pub fn new(lifecycle: Lifecycle) -> Self {
        Self {
            lifecycle,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, program: impl Into<ProgramName>, outcome: ProgramOutcome) {
        self.entries.push((program.into(), outcome));
    }

    pub fn outcome_of(&self, program: &str) -> Option<&ProgramOutcome> {
        self.entries
            .iter()
            .find(|(name, _)| name == program)
            .map(|(_, outcome)| outcome)
    }

    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|(_, outcome)| outcome.is_failure())
    }

    /// Programs that failed or errored, in plan order.
    pub fn failures(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_failure())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
