// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{stringify_envs, ConfigFile, ProgramConfig, RawConfigFile};
use crate::errors::{Result, StarterError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = StarterError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let programs: BTreeMap<String, ProgramConfig> = raw
            .programs
            .into_iter()
            .map(|(name, program)| (name, ProgramConfig::from(program)))
            .collect();

        let cfg = ConfigFile::new_unchecked(programs, stringify_envs(raw.envs));
        validate_config(&cfg)?;
        Ok(cfg)
    }
}

/// Check the structural invariants of a normalised config.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_programs(cfg)?;
    validate_program_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_programs(cfg: &ConfigFile) -> Result<()> {
    if cfg.programs.is_empty() {
        return Err(StarterError::ConfigError(
            "config must define at least one entry under `programs`".to_string(),
        ));
    }
    Ok(())
}

fn validate_program_dependencies(cfg: &ConfigFile) -> Result<()> {
    for (name, program) in cfg.programs.iter() {
        for dep in program.depends_on.iter() {
            if !cfg.programs.contains_key(dep) {
                return Err(StarterError::UnknownProgramReference {
                    program: name.clone(),
                    dependency: dep.clone(),
                });
            }
            if dep == name {
                return Err(StarterError::DagCycle(format!(
                    "program '{}' cannot depend on itself",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &ConfigFile) -> Result<()> {
    // Edge direction: dependency -> dependent, so `api: {depends_on: db}`
    // becomes db -> api.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.programs.keys() {
        graph.add_node(name.as_str());
    }

    for (name, program) in cfg.programs.iter() {
        for dep in program.depends_on.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(StarterError::DagCycle(format!(
            "cycle detected in program dependencies involving '{}'",
            cycle.node_id()
        ))),
    }
}
