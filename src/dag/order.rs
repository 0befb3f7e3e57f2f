// src/dag/order.rs

//! Execution order over a resolved scope.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::dag::graph::ProgramGraph;
use crate::errors::{Result, StarterError};

/// Order `closure` so that every program comes after its dependencies.
///
/// Dependencies outside `closure` are treated as already satisfied, so this
/// works for dependency closures (start) and dependent closures (stop) alike.
///
/// Programs with no in-scope dependencies seed the ready queue. Each time a
/// program is placed, the closure is rescanned in order and the first program
/// that is not yet queued and whose in-scope dependencies have all been placed
/// joins the queue. O(V²), which is fine for the tens of programs a config
/// holds.
pub fn start_order(graph: &ProgramGraph, closure: &[String]) -> Result<Vec<String>> {
    let mut members: Vec<&str> = Vec::with_capacity(closure.len());
    let mut in_scope: HashSet<&str> = HashSet::with_capacity(closure.len());
    for name in closure {
        if in_scope.insert(name.as_str()) {
            members.push(name.as_str());
        }
    }

    let deps_placed = |name: &str, placed: &HashSet<&str>| {
        graph
            .dependencies_of(name)
            .iter()
            .filter(|dep| in_scope.contains(dep.as_str()))
            .all(|dep| placed.contains(dep.as_str()))
    };

    let mut placed: HashSet<&str> = HashSet::with_capacity(members.len());
    let mut queued: HashSet<&str> = HashSet::with_capacity(members.len());
    let mut ready: VecDeque<&str> = VecDeque::new();

    for &name in &members {
        if deps_placed(name, &placed) {
            queued.insert(name);
            ready.push_back(name);
        }
    }

    let mut order: Vec<String> = Vec::with_capacity(members.len());
    while let Some(name) = ready.pop_front() {
        order.push(name.to_string());
        placed.insert(name);

        let next = members
            .iter()
            .copied()
            .find(|&candidate| !queued.contains(candidate) && deps_placed(candidate, &placed));
        if let Some(next) = next {
            queued.insert(next);
            ready.push_back(next);
        }
    }

    if order.len() != members.len() {
        let stuck: Vec<&str> = members
            .iter()
            .copied()
            .filter(|name| !placed.contains(name))
            .collect();
        return Err(StarterError::DagCycle(format!(
            "cannot order programs {:?}; their dependencies never become satisfied",
            stuck
        )));
    }

    debug!(?order, "computed start order");
    Ok(order)
}

/// Order `closure` so that every program comes before its dependencies:
/// furthest dependents first, least-depended-on programs last.
pub fn stop_order(graph: &ProgramGraph, closure: &[String]) -> Result<Vec<String>> {
    let mut order = start_order(graph, closure)?;
    order.reverse();
    debug!(?order, "computed stop order");
    Ok(order)
}
