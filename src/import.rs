//! Recipe file import
//!
//! Reads plain-text `*.recipes` files and stores them in the catalog
//! database. The format is line oriented, `#` starts a comment:
//!
//! ```text
//! machines smelter, foundry, constructor
//! raw iron ore
//!
//! recipe smelter @ 30
//!   in 1 iron ore
//!   out 1 iron ingot
//!
//! recipe fuel generator @ 4.5 as power generation turbofuel
//!   in 1 turbofuel
//!   byproduct 1 ash
//! ```
//!
//! `out` marks the primary output, `byproduct` an excess output. Quantities
//! are exact (`37.5`, `45/8`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use rusqlite::Connection;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::db;
use crate::models::{Ingredient, RecipeDef};
use crate::quantity::{self, Quantity};

/// Bundled sample catalog
pub const SAMPLE_CATALOG: &str = include_str!("../data/satisfactory.recipes");

/// Contents of one recipe file
#[derive(Debug, Default)]
pub struct RecipeFile {
    pub machines: Option<Vec<String>>,
    pub raw_inputs: Vec<String>,
    pub recipes: Vec<RecipeDef>,
}

struct LinePatterns {
    machines: Regex,
    raw: Regex,
    recipe: Regex,
    ingredient: Regex,
}

impl LinePatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            // machines smelter, foundry, ...
            machines: Regex::new(r"^\s*machines\s+(.+?)\s*$")?,
            // raw iron ore
            raw: Regex::new(r"^\s*raw\s+(.+?)\s*$")?,
            // recipe fuel generator @ 4.5 as power generation turbofuel
            recipe: Regex::new(r"^\s*recipe\s+(.+?)\s+@\s*(\S+)(?:\s+as\s+(.+?))?\s*$")?,
            // in 6 copper ore / out 15 copper ingot / byproduct 2 water
            ingredient: Regex::new(r"^\s*(in|out|byproduct)\s+(\S+)\s+(.+?)\s*$")?,
        })
    }
}

/// Parse the text of one recipe file
pub fn parse_recipes(content: &str) -> Result<RecipeFile> {
    let patterns = LinePatterns::new()?;
    let mut file = RecipeFile::default();

    for (index, full_line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = full_line.split('#').next().unwrap_or_default();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(cap) = patterns.machines.captures(line) {
            if file.machines.is_some() {
                bail!("line {}: machine order declared twice", line_no);
            }
            let order = cap[1]
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            file.machines = Some(order);
        } else if let Some(cap) = patterns.raw.captures(line) {
            file.raw_inputs.push(cap[1].to_string());
        } else if let Some(cap) = patterns.recipe.captures(line) {
            let rate = parse_quantity(&cap[2], line_no)?;
            let mut recipe = RecipeDef::new(cap[1].trim(), rate);
            recipe.name = cap.get(3).map(|m| m.as_str().to_string());
            file.recipes.push(recipe);
        } else if let Some(cap) = patterns.ingredient.captures(line) {
            let recipe = file
                .recipes
                .last_mut()
                .ok_or_else(|| anyhow!("line {}: ingredient outside a recipe", line_no))?;
            let quantity = parse_quantity(&cap[2], line_no)?;
            let name = cap[3].to_string();
            match &cap[1] {
                "in" => recipe.inputs.push(Ingredient::new(name, quantity)),
                "out" => recipe.outputs.push(Ingredient::primary(name, quantity)),
                _ => recipe.outputs.push(Ingredient::new(name, quantity)),
            }
        } else {
            bail!("line {}: unrecognised line '{}'", line_no, full_line.trim());
        }
    }

    Ok(file)
}

fn parse_quantity(text: &str, line_no: usize) -> Result<Quantity> {
    quantity::parse(text).with_context(|| format!("line {}: bad quantity", line_no))
}

/// Find all `*.recipes` files under a directory, in name order
pub fn find_recipe_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let files = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "recipes"))
        .collect();

    Ok(files)
}

/// Write one parsed file into the database
///
/// A machine order in the file replaces the stored one. Recipes replace any
/// stored recipe of the same name.
pub fn store_recipe_file(conn: &Connection, file: &RecipeFile) -> Result<()> {
    if let Some(machines) = &file.machines {
        db::set_machine_order(conn, machines)?;
    }
    for name in &file.raw_inputs {
        db::insert_raw_input(conn, name)?;
    }
    for recipe in &file.recipes {
        db::upsert_recipe(conn, recipe)?;
    }
    Ok(())
}

/// Import every recipe file under `dir` into the database
///
/// Files that fail to parse are logged and counted, not fatal. The import runs
/// in one transaction and is only committed if the resulting catalog
/// validates; `clear` empties the stored catalog inside the same transaction.
pub fn import_to_database(conn: &Connection, dir: &Path, clear: bool) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    info!("Scanning {} for recipe files", dir.display());
    let files = find_recipe_files(dir)?;
    debug!(count = files.len(), "found recipe files");

    let tx = conn.unchecked_transaction()?;
    if clear {
        db::clear_catalog(&tx)?;
    }

    for path in &files {
        let parsed = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|content| parse_recipes(&content));

        match parsed {
            Ok(file) => {
                store_recipe_file(&tx, &file)
                    .with_context(|| format!("Failed to store {}", path.display()))?;
                stats.add(&file);
                info!(
                    file = %path.display(),
                    recipes = file.recipes.len(),
                    raw_inputs = file.raw_inputs.len(),
                    "imported recipe file"
                );
            }
            Err(e) => {
                warn!(file = %path.display(), "skipping recipe file: {:#}", e);
                stats.errors += 1;
            }
        }
    }

    db::load_catalog(&tx).context("Imported catalog is invalid; nothing was stored")?;
    tx.commit()?;
    Ok(stats)
}

/// Replace the stored catalog with the bundled sample
pub fn load_sample(conn: &Connection) -> Result<ImportStats> {
    let file = parse_recipes(SAMPLE_CATALOG).context("Bundled sample catalog is malformed")?;

    let tx = conn.unchecked_transaction()?;
    db::clear_catalog(&tx)?;
    store_recipe_file(&tx, &file)?;
    tx.commit()?;

    let mut stats = ImportStats::default();
    stats.add(&file);
    Ok(stats)
}

#[derive(Debug, Default)]
pub struct ImportStats {
    pub files: usize,
    pub recipes: usize,
    pub raw_inputs: usize,
    pub errors: usize,
}

impl ImportStats {
    fn add(&mut self, file: &RecipeFile) {
        self.files += 1;
        self.recipes += file.recipes.len();
        self.raw_inputs += file.raw_inputs.len();
    }
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} recipes and {} raw inputs from {} files. Errors: {}",
            self.recipes, self.raw_inputs, self.files, self.errors
        )
    }
}
