//! Tests for cross-validating generators against the step graph.

use statesplice_graph::{GeneratorRegistry, MissingGenerator, NativeSteps, StepGraph};

fn graph_with(customs: &[(&str, &str)]) -> StepGraph {
    let mut graph = StepGraph::new(NativeSteps::new(["A", "B", "C"]).unwrap());
    for (step, after) in customs {
        graph.register(*step, after).unwrap();
    }
    graph
}

#[test]
fn complete_registry_validates_cleanly() {
    let graph = graph_with(&[("X", "A"), ("Y", "X")]);
    let mut registry = GeneratorRegistry::new();
    registry.register("Y", || Ok(())).register("X", || Ok(()));

    let report = registry.validate(&graph);
    assert!(report.is_complete());
    assert_eq!(report.covered, ["X", "Y"]);
}

#[test]
fn missing_generator_is_reported_not_fatal() {
    let graph = graph_with(&[("X", "A"), ("Z", "C")]);
    let mut registry = GeneratorRegistry::new();
    registry.register("X", || Ok(()));

    let report = registry.validate(&graph);
    assert!(!report.is_complete());
    assert_eq!(report.covered, ["X"]);
    assert_eq!(
        report.missing,
        [MissingGenerator {
            step: "Z".to_string()
        }]
    );
    assert_eq!(
        report.missing[0].to_string(),
        "no generator registered for step 'Z'"
    );
}

#[test]
fn generators_for_unknown_steps_are_ignored() {
    let graph = graph_with(&[("X", "A")]);
    let mut registry = GeneratorRegistry::new();
    registry.register("X", || Ok(())).register("Unused", || Ok(()));

    let report = registry.validate(&graph);
    assert!(report.is_complete());
    assert_eq!(report.covered.len(), 1);
}

#[test]
fn empty_graph_is_trivially_complete() {
    let graph = graph_with(&[]);
    let report = GeneratorRegistry::new().validate(&graph);
    assert!(report.is_complete());
    assert!(report.covered.is_empty());
}
