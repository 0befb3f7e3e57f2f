use std::collections::{BTreeSet, HashMap, HashSet};

use proptest::prelude::*;
use program_starter::config::ConfigFile;
use program_starter::dag::{
    ProgramGraph, dependency_closure, dependent_closure, start_order, stop_order,
};
use program_starter_test_utils::builders::{ConfigFileBuilder, ProgramBuilder};

// Strategy to generate a valid DAG configuration.
// We ensure acyclicity by only allowing program N to depend on programs 0..N-1.
fn dag_config_strategy(max_programs: usize) -> impl Strategy<Value = ConfigFile> {
    (1..=max_programs).prop_flat_map(|num_programs| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_programs),
            num_programs,
        );

        deps_strat.prop_map(move |raw_deps| {
            let mut builder = ConfigFileBuilder::new();
            for (i, potential_deps) in raw_deps.into_iter().enumerate() {
                let name = format!("p{:02}", i);
                let mut program = ProgramBuilder::echo(&name);

                // Only allow deps < i.
                let mut valid_deps = BTreeSet::new();
                for dep_idx in potential_deps {
                    if i > 0 {
                        valid_deps.insert(dep_idx % i);
                    }
                }

                for dep_idx in valid_deps {
                    program = program.depends_on(&format!("p{:02}", dep_idx));
                }
                builder = builder.with_program(&name, program.build());
            }
            builder.build()
        })
    })
}

/// Every program reachable from `name` through dependents (or dependencies).
fn reachable(graph: &ProgramGraph, name: &str, dependents: bool) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut stack = vec![name.to_string()];
    while let Some(current) = stack.pop() {
        let next = if dependents {
            graph.dependents_of(&current)
        } else {
            graph.dependencies_of(&current)
        };
        for n in next {
            if seen.insert(n.clone()) {
                stack.push(n.clone());
            }
        }
    }
    seen
}

fn positions(order: &[String]) -> HashMap<&str, usize> {
    order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect()
}

fn pick(graph: &ProgramGraph, indices: &[usize]) -> Vec<String> {
    let all: Vec<String> = graph.programs().map(str::to_string).collect();
    indices.iter().map(|i| all[i % all.len()].clone()).collect()
}

proptest! {
    #[test]
    fn start_order_places_dependencies_first(
        cfg in dag_config_strategy(12),
        picks in proptest::collection::vec(any::<usize>(), 0..4),
    ) {
        let graph = ProgramGraph::from_config(&cfg).unwrap();
        let requested = pick(&graph, &picks);

        let closure = dependency_closure(&graph, &requested).unwrap();
        let order = start_order(&graph, &closure).unwrap();
        let pos = positions(&order);

        let closure_set: BTreeSet<&str> = closure.iter().map(String::as_str).collect();
        let order_set: BTreeSet<&str> = order.iter().map(String::as_str).collect();
        prop_assert_eq!(order.len(), order_set.len(), "order has duplicates: {:?}", order);
        prop_assert_eq!(&closure_set, &order_set);

        for name in &order {
            for dep in reachable(&graph, name, false) {
                prop_assert!(pos.contains_key(dep.as_str()), "{} missing from start closure", dep);
                prop_assert!(pos[dep.as_str()] < pos[name.as_str()], "{} started before {}", name, dep);
            }
        }
    }

    #[test]
    fn stop_order_places_dependents_first(
        cfg in dag_config_strategy(12),
        picks in proptest::collection::vec(any::<usize>(), 0..4),
    ) {
        let graph = ProgramGraph::from_config(&cfg).unwrap();
        let requested = pick(&graph, &picks);

        let closure = dependent_closure(&graph, &requested).unwrap();
        let order = stop_order(&graph, &closure).unwrap();
        let pos = positions(&order);

        prop_assert_eq!(order.len(), closure.len());

        for name in &order {
            for dependent in reachable(&graph, name, true) {
                prop_assert!(pos.contains_key(dependent.as_str()), "{} missing from stop closure", dependent);
                prop_assert!(
                    pos[dependent.as_str()] < pos[name.as_str()],
                    "{} stopped before its dependent {}", name, dependent
                );
            }
        }
    }

    #[test]
    fn empty_request_covers_every_program(cfg in dag_config_strategy(12)) {
        let graph = ProgramGraph::from_config(&cfg).unwrap();
        let all: BTreeSet<String> = graph.programs().map(str::to_string).collect();

        let deps: BTreeSet<String> = dependency_closure(&graph, &[]).unwrap().into_iter().collect();
        let dependents: BTreeSet<String> = dependent_closure(&graph, &[]).unwrap().into_iter().collect();
        prop_assert_eq!(&deps, &all);
        prop_assert_eq!(&dependents, &all);
    }

    #[test]
    fn depend_by_is_exact_inverse(cfg in dag_config_strategy(12)) {
        let graph = ProgramGraph::from_config(&cfg).unwrap();
        let mut forward = BTreeSet::new();
        let mut backward = BTreeSet::new();
        for name in graph.programs() {
            for dep in graph.dependencies_of(name) {
                forward.insert((dep.clone(), name.to_string()));
            }
            for dependent in graph.dependents_of(name) {
                backward.insert((name.to_string(), dependent.clone()));
            }
        }
        prop_assert_eq!(forward, backward);
    }
}
