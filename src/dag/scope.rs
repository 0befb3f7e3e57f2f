// src/dag/scope.rs

//! Which programs a `start`/`stop` request pulls in.
//!
//! Both closures return the requested names first (deduplicated, in request
//! order) followed by everything discovered during the traversal. The
//! sequence is only a membership list; execution order comes from
//! [`crate::dag::order`].

use std::collections::HashSet;

use tracing::debug;

use crate::dag::graph::ProgramGraph;
use crate::errors::{Result, StarterError};

/// `requested` plus every program it transitively depends on.
///
/// An empty request means every program.
pub fn dependency_closure(graph: &ProgramGraph, requested: &[String]) -> Result<Vec<String>> {
    closure(graph, requested, ProgramGraph::dependencies_of)
}

/// `requested` plus every program that transitively depends on it.
///
/// An empty request means every program.
pub fn dependent_closure(graph: &ProgramGraph, requested: &[String]) -> Result<Vec<String>> {
    closure(graph, requested, ProgramGraph::dependents_of)
}

fn closure<'g>(
    graph: &'g ProgramGraph,
    requested: &[String],
    edges: fn(&'g ProgramGraph, &str) -> &'g [String],
) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(graph.programs().map(str::to_string).collect());
    }

    if let Some(unknown) = requested.iter().find(|name| !graph.contains(name)) {
        return Err(StarterError::ProgramNotFound(unknown.clone()));
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut result: Vec<String> = Vec::new();
    for name in requested {
        if visited.insert(name.as_str()) {
            result.push(name.clone());
        }
    }

    let mut stack: Vec<String> = result.iter().rev().cloned().collect();
    while let Some(name) = stack.pop() {
        for next in edges(graph, &name) {
            if visited.insert(next.as_str()) {
                result.push(next.clone());
                stack.push(next.clone());
            }
        }
    }

    debug!(?requested, closure = ?result, "resolved program scope");
    Ok(result)
}
