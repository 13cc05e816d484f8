//! Tests for dependency ordering of production lines.

use factory_planner::catalog::Catalog;
use factory_planner::error::PlanError;
use factory_planner::models::{Ingredient, LineKind, ProductionLine};
use factory_planner::quantity::int;
use factory_planner::sequencer::sequence;

fn catalog() -> Catalog {
    Catalog::with_default_machines(vec![], vec![]).unwrap()
}

fn line(name: &str, machine: &str, inputs: &[&str], excess: &[&str]) -> ProductionLine {
    ProductionLine {
        kind: LineKind::Recipe,
        name: name.to_string(),
        quantity: int(1),
        product: Some(name.to_string()),
        multiplier: Some(int(1)),
        machine: Some(machine.to_string()),
        machines: Some(int(1)),
        inputs: inputs.iter().map(|i| Ingredient::new(*i, int(1))).collect(),
        excess: excess.iter().map(|e| Ingredient::new(*e, int(1))).collect(),
    }
}

fn names(lines: &[ProductionLine]) -> Vec<&str> {
    lines.iter().map(|l| l.name.as_str()).collect()
}

#[test]
fn test_raw_inputs_always_lead() {
    let lines = vec![
        line("iron ingot", "smelter", &["iron ore"], &[]),
        ProductionLine::raw_input("water", int(4)),
        ProductionLine::raw_input("iron ore", int(1)),
    ];
    let ordered = sequence(&catalog(), lines).unwrap();

    assert_eq!(names(&ordered), ["iron ore", "water", "iron ingot"]);
}

#[test]
fn test_layers_sorted_by_machine_then_name() {
    let lines = vec![
        line("rotor", "assembler", &["screw", "iron rod"], &[]),
        line("screw", "constructor", &["iron rod"], &[]),
        line("iron rod", "constructor", &["iron ingot"], &[]),
        line("steel ingot", "foundry", &[], &[]),
        line("iron ingot", "smelter", &[], &[]),
        line("wire", "constructor", &[], &[]),
    ];
    let ordered = sequence(&catalog(), lines).unwrap();

    // Peeled: {rotor, steel ingot, wire}, {screw}, {iron rod}, {iron ingot}
    assert_eq!(
        names(&ordered),
        [
            "iron ingot",
            "iron rod",
            "screw",
            "steel ingot",
            "wire",
            "rotor",
        ]
    );
}

#[test]
fn test_excess_edges_never_order_lines() {
    // Each line's byproduct is the other's product
    let lines = vec![
        line("A", "refinery", &[], &["B"]),
        line("B", "refinery", &[], &["A"]),
    ];
    let ordered = sequence(&catalog(), lines).unwrap();

    assert_eq!(names(&ordered), ["A", "B"]);
}

#[test]
fn test_self_requirement_is_cyclic() {
    let lines = vec![
        line("seed", "refinery", &["seed"], &[]),
        line("flour", "constructor", &[], &[]),
    ];
    let err = sequence(&catalog(), lines).unwrap_err();

    assert_eq!(
        err,
        PlanError::CyclicDependency {
            lines: vec!["seed".to_string()],
        }
    );
}

#[test]
fn test_sink_lines_are_never_required() {
    let mut sink = line("power generation fuel", "fuel generator", &["fuel"], &[]);
    sink.product = None;
    let lines = vec![sink, line("fuel", "refinery", &[], &[])];
    let ordered = sequence(&catalog(), lines).unwrap();

    assert_eq!(names(&ordered), ["fuel", "power generation fuel"]);
}

#[test]
fn test_empty_plan() {
    assert!(sequence(&catalog(), Vec::new()).unwrap().is_empty());
}
