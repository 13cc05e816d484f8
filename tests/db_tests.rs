//! Tests for the SQLite catalog store and the bundled sample catalog.

use rusqlite::Connection;

use factory_planner::catalog::DEFAULT_MACHINES;
use factory_planner::db;
use factory_planner::import;
use factory_planner::models::{Demand, RecipeDef};
use factory_planner::planner::plan;
use factory_planner::quantity::{Quantity, int, parse};

fn q(text: &str) -> Quantity {
    parse(text).unwrap()
}

fn memory_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to open in-memory database");
    db::init_schema(&conn).expect("Failed to create schema");
    conn
}

#[test]
fn test_round_trip_keeps_exact_quantities() {
    let conn = memory_db();
    db::insert_raw_input(&conn, "iron ore").unwrap();
    db::insert_raw_input(&conn, "wire").unwrap();
    db::upsert_recipe(
        &conn,
        &RecipeDef::new("smelter", int(30))
            .input("iron ore", int(1))
            .output("iron ingot", int(1)),
    )
    .unwrap();
    db::upsert_recipe(
        &conn,
        &RecipeDef::new("assembler", q("5.625"))
            .named("wired plate")
            .input("iron ingot", q("10/3"))
            .input("wire", int(20))
            .output("reinforced iron plate", int(3))
            .byproduct("scrap", q("1/7")),
    )
    .unwrap();

    let catalog = db::load_catalog(&conn).unwrap();

    assert_eq!(catalog.raw_inputs(), ["iron ore", "wire"]);
    let names: Vec<_> = catalog.recipes().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["iron ingot", "wired plate"]);

    let plate = catalog.recipe("wired plate").unwrap();
    assert_eq!(plate.rate, q("45/8"));
    assert_eq!(plate.inputs[0].quantity, q("10/3"));
    assert_eq!(plate.inputs[1].name, "wire");
    assert_eq!(plate.primary_output().unwrap().name, "reinforced iron plate");
    assert_eq!(plate.outputs[1].quantity, q("1/7"));
    assert!(!plate.outputs[1].is_primary);
}

#[test]
fn test_default_and_stored_machine_order() {
    let conn = memory_db();
    let catalog = db::load_catalog(&conn).unwrap();
    assert_eq!(catalog.machines(), DEFAULT_MACHINES);

    let order = vec!["press".to_string(), "kiln".to_string()];
    db::set_machine_order(&conn, &order).unwrap();
    let catalog = db::load_catalog(&conn).unwrap();
    assert_eq!(catalog.machines(), order.as_slice());
}

#[test]
fn test_upsert_replaces_recipe_of_same_name() {
    let conn = memory_db();
    db::insert_raw_input(&conn, "iron ore").unwrap();
    let slow = RecipeDef::new("smelter", int(30))
        .input("iron ore", int(1))
        .output("iron ingot", int(1));
    let fast = RecipeDef::new("smelter", int(60))
        .named("iron ingot")
        .input("iron ore", int(2))
        .output("iron ingot", int(2));
    db::upsert_recipe(&conn, &slow).unwrap();
    db::upsert_recipe(&conn, &fast).unwrap();

    let catalog = db::load_catalog(&conn).unwrap();
    assert_eq!(catalog.recipes().len(), 1);
    let ingot = catalog.recipe("iron ingot").unwrap();
    assert_eq!(ingot.rate, int(60));
    assert_eq!(ingot.inputs.len(), 1);
    assert_eq!(ingot.inputs[0].quantity, int(2));

    let stale: i64 = conn
        .query_row("SELECT COUNT(*) FROM recipe_inputs", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stale, 1);
}

#[test]
fn test_upsert_rejects_unnamed_sink() {
    let conn = memory_db();
    let sink = RecipeDef::new("fuel generator", int(12)).input("fuel", int(1));
    assert!(db::upsert_recipe(&conn, &sink).is_err());
}

#[test]
fn test_invalid_stored_catalog_fails_to_load() {
    let conn = memory_db();
    let recipe = RecipeDef::new("blender", int(30))
        .input("iron ore", int(1))
        .output("iron ingot", int(1));
    db::upsert_recipe(&conn, &recipe).unwrap();

    let err = db::load_catalog(&conn).unwrap_err();
    assert!(err.to_string().contains("unknown machine 'blender'"));
}

#[test]
fn test_clear_catalog() {
    let conn = memory_db();
    import::load_sample(&conn).unwrap();
    db::clear_catalog(&conn).unwrap();

    let catalog = db::load_catalog(&conn).unwrap();
    assert!(catalog.recipes().is_empty());
    assert!(catalog.raw_inputs().is_empty());
    assert!(db::list_products(&conn).unwrap().is_empty());
}

#[test]
fn test_sample_catalog_loads() {
    let conn = memory_db();
    let stats = import::load_sample(&conn).unwrap();
    assert_eq!(stats.recipes, 46);
    assert_eq!(stats.raw_inputs, 10);

    let catalog = db::load_catalog(&conn).unwrap();
    assert_eq!(catalog.recipes().len(), 46);
    assert!(catalog.recipe("power generation turbofuel").is_some());

    let products = db::list_products(&conn).unwrap();
    assert!(products.contains(&"radio control unit".to_string()));
    assert!(!products.contains(&"heavy oil residue".to_string()));
}

#[test]
fn test_sample_catalog_plans_aluminum_demand() {
    let conn = memory_db();
    import::load_sample(&conn).unwrap();
    let catalog = db::load_catalog(&conn).unwrap();

    let demand = Demand::new()
        .with("alclad aluminum sheet", int(100))
        .with("aluminum casing", int(100))
        .with("radio control unit", int(5));
    let plan = plan(&catalog, &demand).unwrap();

    for ingredient in catalog.ingredient_universe(&demand) {
        let net: Quantity = plan.lines.iter().map(|l| l.net(ingredient)).sum();
        assert_eq!(net, demand.get(ingredient), "imbalance in '{}'", ingredient);
    }

    let raw_count = plan.raw_inputs().count();
    assert!(plan.lines[..raw_count].iter().all(|l| l.is_raw_input()));
    assert!(plan.line("water").is_some());

    // Computers need plastic, whose residue ends up burned as turbofuel
    assert!(plan.line("power generation turbofuel").is_some());
    let last = plan.lines.last().unwrap();
    assert_eq!(last.name, "radio control unit");
}

#[test]
fn test_sample_catalog_plans_single_products() {
    let conn = memory_db();
    import::load_sample(&conn).unwrap();
    let catalog = db::load_catalog(&conn).unwrap();

    for product in ["computer", "modular engine", "adaptive control unit", "ai limiter"] {
        let demand = Demand::new().with(product, int(1));
        let plan = plan(&catalog, &demand)
            .unwrap_or_else(|e| panic!("planning '{}' failed: {}", product, e));
        assert_eq!(plan.recipe_lines().last().unwrap().name, product);
    }
}
