use std::fmt;

use clap::ValueEnum;

/// Which half of a program's lifecycle a run drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Lifecycle {
    Start,
    Stop,
}

impl Lifecycle {
    /// Script keys executed for this transition, in order.
    pub fn steps(self) -> [ScriptStep; 3] {
        match self {
            Lifecycle::Start => [ScriptStep::PreStart, ScriptStep::Start, ScriptStep::PostStart],
            Lifecycle::Stop => [ScriptStep::PreStop, ScriptStep::Stop, ScriptStep::PostStop],
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Start => f.write_str("start"),
            Lifecycle::Stop => f.write_str("stop"),
        }
    }
}

/// One of the six optional script fields of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptStep {
    PreStart,
    Start,
    PostStart,
    PreStop,
    Stop,
    PostStop,
}

impl ScriptStep {
    /// The config key this step is read from.
    pub fn key(self) -> &'static str {
        match self {
            ScriptStep::PreStart => "pre_start",
            ScriptStep::Start => "start",
            ScriptStep::PostStart => "post_start",
            ScriptStep::PreStop => "pre_stop",
            ScriptStep::Stop => "stop",
            ScriptStep::PostStop => "post_stop",
        }
    }
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What the orchestrator does with the rest of the plan once a program fails.
///
/// - `Continue`: keep going with the next program (default behaviour).
/// - `Abort`: stop after the first failure; everything left is reported as
///   blocked.
/// - `SkipDependents`: for `start`, skip programs that depend on the failed
///   one; for `stop`, skip programs the failed one depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FailurePolicy {
    #[default]
    Continue,
    Abort,
    SkipDependents,
}
