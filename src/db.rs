//! Database schema and operations for the recipe catalog

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::catalog::{Catalog, DEFAULT_MACHINES};
use crate::models::{Ingredient, RecipeDef};
use crate::quantity;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Canonical machine order, used for line ordering only
        CREATE TABLE IF NOT EXISTS machines (
            name TEXT PRIMARY KEY,
            position INTEGER NOT NULL
        );

        -- Unnamed recipes are stored under their primary output's name
        CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            machine TEXT NOT NULL,
            rate TEXT NOT NULL
        );

        -- Quantities are exact rationals stored as text ("45/8")
        CREATE TABLE IF NOT EXISTS recipe_inputs (
            recipe_id INTEGER,
            position INTEGER,
            ingredient TEXT NOT NULL,
            quantity TEXT NOT NULL,
            PRIMARY KEY (recipe_id, position)
        );

        CREATE TABLE IF NOT EXISTS recipe_outputs (
            recipe_id INTEGER,
            position INTEGER,
            ingredient TEXT NOT NULL,
            quantity TEXT NOT NULL,
            is_primary INTEGER NOT NULL,
            PRIMARY KEY (recipe_id, position)
        );

        CREATE TABLE IF NOT EXISTS raw_inputs (
            name TEXT PRIMARY KEY
        );

        CREATE INDEX IF NOT EXISTS idx_recipe_outputs_ingredient ON recipe_outputs(ingredient);
        "#,
    )?;
    Ok(())
}

/// Replace the stored machine order
pub fn set_machine_order(conn: &Connection, machines: &[String]) -> Result<()> {
    conn.execute("DELETE FROM machines", [])?;
    for (position, name) in machines.iter().enumerate() {
        conn.execute(
            "INSERT INTO machines (name, position) VALUES (?1, ?2)",
            (name, position as i64),
        )?;
    }
    Ok(())
}

/// Insert or replace a recipe with its inputs and outputs, returning its row id
///
/// Recipes are keyed by resolved name, so storing the same file twice leaves
/// one copy of each recipe.
pub fn upsert_recipe(conn: &Connection, recipe: &RecipeDef) -> Result<i64> {
    let name = recipe
        .resolved_name()
        .ok_or_else(|| anyhow!("Recipe on '{}' has no name and no primary output", recipe.machine))?;

    let existing: Option<i64> = conn
        .query_row("SELECT id FROM recipes WHERE name = ?1", [name], |row| row.get(0))
        .optional()?;
    if let Some(old_id) = existing {
        conn.execute("DELETE FROM recipe_inputs WHERE recipe_id = ?1", [old_id])?;
        conn.execute("DELETE FROM recipe_outputs WHERE recipe_id = ?1", [old_id])?;
    }

    conn.execute(
        "INSERT OR REPLACE INTO recipes (name, machine, rate) VALUES (?1, ?2, ?3)",
        (
            name,
            &recipe.machine,
            quantity::to_exact(&recipe.rate),
        ),
    )?;
    let id = conn.last_insert_rowid();

    for (position, input) in recipe.inputs.iter().enumerate() {
        conn.execute(
            "INSERT INTO recipe_inputs (recipe_id, position, ingredient, quantity)
             VALUES (?1, ?2, ?3, ?4)",
            (
                id,
                position as i64,
                &input.name,
                quantity::to_exact(&input.quantity),
            ),
        )?;
    }

    for (position, output) in recipe.outputs.iter().enumerate() {
        conn.execute(
            "INSERT INTO recipe_outputs (recipe_id, position, ingredient, quantity, is_primary)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                id,
                position as i64,
                &output.name,
                quantity::to_exact(&output.quantity),
                output.is_primary,
            ),
        )?;
    }

    Ok(id)
}

/// Insert a raw input; repeats are ignored
pub fn insert_raw_input(conn: &Connection, name: &str) -> Result<()> {
    conn.execute("INSERT OR IGNORE INTO raw_inputs (name) VALUES (?1)", [name])?;
    Ok(())
}

/// Clear the whole catalog (for re-import)
pub fn clear_catalog(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM recipe_outputs;
        DELETE FROM recipe_inputs;
        DELETE FROM recipes;
        DELETE FROM raw_inputs;
        DELETE FROM machines;
        "#,
    )?;
    Ok(())
}

/// Read the stored catalog and validate it
pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    let mut machines = load_machines(conn)?;
    if machines.is_empty() {
        machines = DEFAULT_MACHINES.iter().map(|m| m.to_string()).collect();
    }

    let mut stmt = conn.prepare("SELECT id, name, machine, rate FROM recipes ORDER BY id")?;
    let headers: Vec<(i64, String, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
        .collect::<rusqlite::Result<_>>()?;

    let mut recipes = Vec::with_capacity(headers.len());
    for (id, name, machine, rate) in headers {
        let rate = quantity::parse(&rate)
            .with_context(|| format!("Bad rate '{}' on recipe #{}", rate, id))?;
        let mut recipe = RecipeDef::new(machine, rate);
        recipe.name = Some(name);
        recipe.inputs = load_ingredients(conn, "recipe_inputs", id)?;
        recipe.outputs = load_ingredients(conn, "recipe_outputs", id)?;
        recipes.push(recipe);
    }

    let mut stmt = conn.prepare("SELECT name FROM raw_inputs ORDER BY rowid")?;
    let raw_inputs: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;

    info!(
        recipes = recipes.len(),
        raw_inputs = raw_inputs.len(),
        "loaded catalog"
    );
    Ok(Catalog::new(machines, recipes, raw_inputs)?)
}

fn load_machines(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM machines ORDER BY position")?;
    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

fn load_ingredients(conn: &Connection, table: &str, recipe_id: i64) -> Result<Vec<Ingredient>> {
    // Inputs have no primary column; select a constant in its place
    let primary = if table == "recipe_outputs" { "is_primary" } else { "0" };
    let sql = format!(
        "SELECT ingredient, quantity, {} FROM {} WHERE recipe_id = ?1 ORDER BY position",
        primary, table
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows: Vec<(String, String, bool)> = stmt
        .query_map([recipe_id], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<rusqlite::Result<_>>()?;

    let mut results = Vec::with_capacity(rows.len());
    for (name, text, is_primary) in rows {
        let quantity = quantity::parse(&text)
            .with_context(|| format!("Bad quantity '{}' for '{}'", text, name))?;
        results.push(Ingredient {
            name,
            quantity,
            is_primary,
        });
    }
    Ok(results)
}

/// List every ingredient some recipe produces as its primary output
pub fn list_products(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT ingredient FROM recipe_outputs WHERE is_primary = 1 ORDER BY ingredient",
    )?;

    let rows = stmt.query_map([], |row| row.get(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}
