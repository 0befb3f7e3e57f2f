// src/engine/orchestrator.rs

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config::model::ConfigFile;
use crate::dag::{ProgramGraph, dependency_closure, dependent_closure, start_order, stop_order};
use crate::engine::{Plan, PlanStep, ProgramOutcome, RunReport};
use crate::errors::{Result, StarterError};
use crate::exec::{ScriptBackend, ScriptRunner};
use crate::template::Environment;
use crate::types::{FailurePolicy, Lifecycle};

/// Owns the config, the dependency graph and the script runner for one run.
///
/// Everything is strictly sequential: a program's scripts finish before the
/// next program in the plan is touched.
pub struct Orchestrator<B> {
    config: ConfigFile,
    graph: ProgramGraph,
    runner: ScriptRunner<B>,
    policy: FailurePolicy,
}

impl<B: ScriptBackend> Orchestrator<B> {
    /// Build the dependency graph and the base environment.
    ///
    /// `ambient` is the environment scripts inherit (usually the process
    /// environment plus any env file); the config's global `envs` are layered
    /// on top of it here.
    pub fn new(config: ConfigFile, ambient: Environment, backend: B) -> Result<Self> {
        let graph = ProgramGraph::from_config(&config)?;
        let base_env = ambient.overlay(&config.envs);
        debug!(
            programs = graph.len(),
            global_envs = config.envs.len(),
            "orchestrator ready"
        );

        Ok(Self {
            config,
            graph,
            runner: ScriptRunner::new(backend, base_env),
            policy: FailurePolicy::default(),
        })
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn runner(&self) -> &ScriptRunner<B> {
        &self.runner
    }

    /// Compute which programs a request touches, in which order, and which
    /// of them execute.
    ///
    /// With `recursive` every program in the closure executes; otherwise only
    /// the requested ones do and the rest are traversed for ordering. An
    /// empty request means every program, which executes everything.
    pub fn plan(&self, lifecycle: Lifecycle, requested: &[String], recursive: bool) -> Result<Plan> {
        let order = match lifecycle {
            Lifecycle::Start => {
                let closure = dependency_closure(&self.graph, requested)?;
                start_order(&self.graph, &closure)?
            }
            Lifecycle::Stop => {
                let closure = dependent_closure(&self.graph, requested)?;
                stop_order(&self.graph, &closure)?
            }
        };

        let execute_all = recursive || requested.is_empty();
        let steps = order
            .into_iter()
            .map(|program| PlanStep {
                execute: execute_all || requested.contains(&program),
                program,
            })
            .collect();

        let plan = Plan { lifecycle, steps };
        info!(
            %lifecycle,
            order = ?plan.order(),
            executed = ?plan.executed(),
            "computed plan"
        );
        Ok(plan)
    }

    /// `start` the requested programs (all when empty).
    pub async fn start(&mut self, requested: &[String], recursive: bool) -> Result<RunReport> {
        self.run(Lifecycle::Start, requested, recursive).await
    }

    /// `stop` the requested programs (all when empty).
    pub async fn stop(&mut self, requested: &[String], recursive: bool) -> Result<RunReport> {
        self.run(Lifecycle::Stop, requested, recursive).await
    }

    /// Plan and execute in one go. Only planning can fail; per-program
    /// failures end up in the report.
    pub async fn run(
        &mut self,
        lifecycle: Lifecycle,
        requested: &[String],
        recursive: bool,
    ) -> Result<RunReport> {
        let plan = self.plan(lifecycle, requested, recursive)?;
        Ok(self.execute(&plan).await)
    }

    /// Walk a plan, running each executed program's scripts in turn.
    pub async fn execute(&mut self, plan: &Plan) -> RunReport {
        let lifecycle = plan.lifecycle;
        let mut report = RunReport::new(lifecycle);

        // Programs that failed, plus anything downstream of them for the
        // skip-dependents policy.
        let mut tainted: HashSet<String> = HashSet::new();
        let mut aborted = false;

        for step in &plan.steps {
            let name = step.program.as_str();

            let upstream_failed = self.policy == FailurePolicy::SkipDependents
                && self.upstream_of(name, lifecycle).iter().any(|p| tainted.contains(*p));
            if upstream_failed {
                tainted.insert(name.to_string());
            }

            if !step.execute {
                debug!(program = %name, "traversed for ordering only; not executing");
                report.push(name, ProgramOutcome::Traversed);
                continue;
            }

            if aborted || upstream_failed {
                warn!(program = %name, %lifecycle, "skipping program after earlier failure");
                report.push(name, ProgramOutcome::Blocked);
                continue;
            }

            let Some(program) = self.config.program(name) else {
                // The plan was built from this graph, so this only happens
                // when a plan from another config is executed.
                let err = StarterError::ProgramNotFound(name.to_string());
                report.push(name, ProgramOutcome::Errored(err.to_string()));
                continue;
            };

            info!(program = %name, %lifecycle, "processing program");
            let outcome = self.runner.run(name, program, lifecycle).await;

            if outcome.is_failure() {
                tainted.insert(name.to_string());
                if self.policy == FailurePolicy::Abort {
                    warn!(program = %name, "failure policy is abort; remaining programs will be skipped");
                    aborted = true;
                }
            }

            report.push(name, outcome);
        }

        info!(
            %lifecycle,
            total = report.entries.len(),
            failures = ?report.failures(),
            "run complete"
        );
        report
    }

    /// Programs whose failure should block `name`: its dependencies when
    /// starting, its dependents when stopping.
    fn upstream_of(&self, name: &str, lifecycle: Lifecycle) -> Vec<&str> {
        let edges = match lifecycle {
            Lifecycle::Start => self.graph.dependencies_of(name),
            Lifecycle::Stop => self.graph.dependents_of(name),
        };
        edges.iter().map(String::as_str).collect()
    }
}
