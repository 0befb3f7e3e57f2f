// src/dag/mod.rs

//! Dependency graph, scope resolution and ordering.
//!
//! - [`graph`] holds programs with their `depends_on` / `depend_by` edges.
//! - [`scope`] computes which programs a request pulls in.
//! - [`order`] turns a scope into a start or stop order.

pub mod graph;
pub mod order;
pub mod scope;

pub use graph::ProgramGraph;
pub use order::{start_order, stop_order};
pub use scope::{dependency_closure, dependent_closure};
