// src/dag/graph.rs

use std::collections::BTreeMap;

use crate::config::model::ConfigFile;
use crate::errors::{Result, StarterError};

/// Internal node structure: stores immediate dependencies and dependents.
#[derive(Debug, Clone, Default)]
struct ProgramNode {
    /// Programs that must be started before this one.
    depends_on: Vec<String>,
    /// Programs that list this one in their `depends_on`. Derived, never
    /// user-supplied.
    depend_by: Vec<String>,
}

/// Dependency graph keyed by program name.
///
/// Built once from a [`ConfigFile`] and not mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProgramGraph {
    nodes: BTreeMap<String, ProgramNode>,
}

impl ProgramGraph {
    /// Build the graph and derive `depend_by` edges.
    ///
    /// Fails with [`StarterError::UnknownProgramReference`] when a
    /// `depends_on` entry names a program that does not exist.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let nodes = cfg
            .programs
            .iter()
            .map(|(name, program)| {
                let node = ProgramNode {
                    depends_on: program.depends_on.clone(),
                    depend_by: Vec::new(),
                };
                (name.clone(), node)
            })
            .collect();

        let mut graph = Self { nodes };
        graph.derive_dependents()?;
        Ok(graph)
    }

    /// Recompute every `depend_by` list from the `depends_on` lists.
    fn derive_dependents(&mut self) -> Result<()> {
        for node in self.nodes.values_mut() {
            node.depend_by.clear();
        }

        let edges: Vec<(String, String)> = self
            .nodes
            .iter()
            .flat_map(|(name, node)| {
                node.depends_on
                    .iter()
                    .map(move |dep| (name.clone(), dep.clone()))
            })
            .collect();

        for (program, dep) in edges {
            match self.nodes.get_mut(&dep) {
                Some(dep_node) => dep_node.depend_by.push(program),
                None => {
                    return Err(StarterError::UnknownProgramReference {
                        program,
                        dependency: dep,
                    });
                }
            }
        }

        Ok(())
    }

    /// All program names, in sorted order.
    pub fn programs(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Immediate dependencies of a program.
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.depends_on.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a program.
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.depend_by.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::model::ProgramConfig;

    fn cfg(programs: &[(&str, &[&str])]) -> ConfigFile {
        let programs = programs
            .iter()
            .map(|(name, deps)| {
                let program = ProgramConfig {
                    depends_on: deps.iter().map(|d| d.to_string()).collect(),
                    ..Default::default()
                };
                (name.to_string(), program)
            })
            .collect();
        ConfigFile::new_unchecked(programs, BTreeMap::new())
    }

    #[test]
    fn depend_by_is_inverse_of_depends_on() {
        let graph =
            ProgramGraph::from_config(&cfg(&[("db", &[]), ("cache", &[]), ("api", &["db", "cache"]), ("web", &["api", "db"])]))
                .unwrap();

        let mut db_dependents = graph.dependents_of("db").to_vec();
        db_dependents.sort();
        assert_eq!(db_dependents, vec!["api", "web"]);
        assert_eq!(graph.dependents_of("cache"), ["api"]);
        assert_eq!(graph.dependents_of("api"), ["web"]);
        assert!(graph.dependents_of("web").is_empty());

        for name in graph.programs() {
            for dep in graph.dependencies_of(name) {
                assert!(graph.dependents_of(dep).iter().any(|d| d == name));
            }
        }
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let mut graph = ProgramGraph::from_config(&cfg(&[("a", &[]), ("b", &["a"])])).unwrap();
        graph.derive_dependents().unwrap();
        graph.derive_dependents().unwrap();
        assert_eq!(graph.dependents_of("a"), ["b"]);
    }

    #[test]
    fn dangling_dependency_is_rejected() {
        let err = ProgramGraph::from_config(&cfg(&[("api", &["db"])])).unwrap_err();
        assert!(matches!(
            err,
            StarterError::UnknownProgramReference { ref program, ref dependency }
                if program == "api" && dependency == "db"
        ));
    }
}
