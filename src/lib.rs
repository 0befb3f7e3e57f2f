// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod template;
pub mod types;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, load_env_file};
use crate::engine::{Orchestrator, Plan, RunReport};
use crate::exec::ShellBackend;
use crate::template::Environment;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - env file + process environment
/// - config loading and validation
/// - dependency graph, plan and execution
///
/// Returns `None` for `--dry_run`, otherwise the report of the run.
pub async fn run(args: CliArgs) -> Result<Option<RunReport>> {
    let ambient = ambient_environment(args.env_file.as_deref())?;

    let cfg = load_and_validate(&args.config_file)?;
    debug!(
        config = %args.config_file.display(),
        programs = cfg.programs.len(),
        "config loaded"
    );

    let mut orchestrator =
        Orchestrator::new(cfg, ambient, ShellBackend::new())?.with_failure_policy(args.on_failure);

    let plan = orchestrator.plan(args.command, &args.program, args.recursive)?;

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(None);
    }

    info!(command = %args.command, requested = ?args.program, recursive = args.recursive, "running");
    let report = orchestrator.execute(&plan).await;
    Ok(Some(report))
}

/// Process environment overlaid with the env file, if any.
pub fn ambient_environment(env_file: Option<&Path>) -> Result<Environment> {
    let process = Environment::from_process();
    match env_file {
        Some(path) => {
            let vars = load_env_file(path)?;
            debug!(path = %path.display(), vars = vars.len(), "env file loaded");
            Ok(process.overlay(vars))
        }
        None => Ok(process),
    }
}

/// Process exit status for the outcome of [`run`].
///
/// - `0`: dry run, or every program succeeded (or was only traversed).
/// - `2`: the run happened but at least one program failed or errored.
/// - `1`: fatal error before anything ran (config, env file, planning).
pub fn exit_code(outcome: &Result<Option<RunReport>>) -> u8 {
    match outcome {
        Ok(Some(report)) if report.has_failures() => 2,
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Simple dry-run output: the order and what would execute.
fn print_dry_run(plan: &Plan) {
    println!("program-starter dry-run: {}", plan.lifecycle);
    for (idx, step) in plan.steps.iter().enumerate() {
        let marker = if step.execute { "run" } else { "skip" };
        println!("  {:>2}. [{marker}] {}", idx + 1, step.program);
    }

    debug!("dry-run complete (no execution)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ProgramOutcome;
    use crate::types::{Lifecycle, ScriptStep};

    #[test]
    fn exit_code_reflects_run_outcome() {
        assert_eq!(exit_code(&Ok(None)), 0);

        let mut clean = RunReport::new(Lifecycle::Start);
        clean.push("db", ProgramOutcome::Succeeded);
        clean.push("api", ProgramOutcome::Traversed);
        assert_eq!(exit_code(&Ok(Some(clean))), 0);

        let mut failed = RunReport::new(Lifecycle::Stop);
        failed.push("web", ProgramOutcome::Succeeded);
        failed.push(
            "api",
            ProgramOutcome::Failed {
                step: ScriptStep::Stop,
                exit_code: 3,
            },
        );
        assert_eq!(exit_code(&Ok(Some(failed))), 2);

        let mut errored = RunReport::new(Lifecycle::Start);
        errored.push("db", ProgramOutcome::Errored("spawn failed".into()));
        assert_eq!(exit_code(&Ok(Some(errored))), 2);

        assert_eq!(exit_code(&Err(anyhow::anyhow!("config missing"))), 1);
    }
}
