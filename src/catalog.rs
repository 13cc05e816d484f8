//! Validated, immutable recipe catalog

use std::collections::{BTreeSet, HashMap, HashSet};

use num_traits::Signed;
use thiserror::Error;

use crate::models::{Demand, Ingredient, Recipe, RecipeDef};

/// Canonical machine order used when a catalog does not declare its own
pub const DEFAULT_MACHINES: [&str; 8] = [
    "smelter",
    "foundry",
    "refinery",
    "fuel generator",
    "constructor",
    "assembler",
    "manufacturer",
    "packager",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate recipe '{0}'")]
    DuplicateRecipe(String),
    #[error("recipe '{recipe}' has multiple primary outputs: {outputs:?}")]
    MultiplePrimaryOutputs { recipe: String, outputs: Vec<String> },
    #[error("recipe '{recipe}' runs on unknown machine '{machine}'")]
    UnknownMachine { recipe: String, machine: String },
    #[error("recipe #{position} has no name and no primary output")]
    UnnamedRecipe { position: usize },
    #[error("recipe '{0}' has no inputs and no outputs")]
    EmptyRecipe(String),
    #[error("recipe '{0}' must have a positive rate")]
    InvalidRate(String),
    #[error("recipe '{recipe}' lists '{ingredient}' more than once")]
    DuplicateIngredient { recipe: String, ingredient: String },
    #[error("recipe '{recipe}' has a negative quantity of '{ingredient}'")]
    NegativeQuantity { recipe: String, ingredient: String },
    #[error("duplicate raw input '{0}'")]
    DuplicateRawInput(String),
    #[error("duplicate machine '{0}'")]
    DuplicateMachine(String),
}

/// Recipes, raw inputs and machine order for a planning run
///
/// Built once through [`Catalog::new`] and only read afterwards, so a single
/// catalog can back any number of concurrent runs.
#[derive(Debug, Clone)]
pub struct Catalog {
    machines: Vec<String>,
    recipes: Vec<Recipe>,
    by_name: HashMap<String, usize>,
    raw_inputs: Vec<String>,
}

impl Catalog {
    pub fn new(
        machines: Vec<String>,
        recipes: Vec<RecipeDef>,
        raw_inputs: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let mut seen_machines = HashSet::new();
        for machine in &machines {
            if !seen_machines.insert(machine.as_str()) {
                return Err(CatalogError::DuplicateMachine(machine.clone()));
            }
        }

        let mut by_name = HashMap::new();
        let mut validated = Vec::with_capacity(recipes.len());
        for (position, def) in recipes.into_iter().enumerate() {
            let recipe = validate_recipe(def, position, &machines)?;
            if by_name.insert(recipe.name.clone(), validated.len()).is_some() {
                return Err(CatalogError::DuplicateRecipe(recipe.name));
            }
            validated.push(recipe);
        }

        let mut seen_raw = HashSet::new();
        for name in &raw_inputs {
            if !seen_raw.insert(name.as_str()) {
                return Err(CatalogError::DuplicateRawInput(name.clone()));
            }
        }

        Ok(Self {
            machines,
            recipes: validated,
            by_name,
            raw_inputs,
        })
    }

    pub fn with_default_machines(
        recipes: Vec<RecipeDef>,
        raw_inputs: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let machines = DEFAULT_MACHINES.iter().map(|m| m.to_string()).collect();
        Self::new(machines, recipes, raw_inputs)
    }

    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.by_name.get(name).map(|&i| &self.recipes[i])
    }

    /// Recipes in declaration order
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn raw_inputs(&self) -> &[String] {
        &self.raw_inputs
    }

    pub fn is_raw_input(&self, name: &str) -> bool {
        self.raw_inputs.iter().any(|r| r == name)
    }

    pub fn machines(&self) -> &[String] {
        &self.machines
    }

    /// Position of `machine` in the canonical machine order
    pub fn machine_rank(&self, machine: &str) -> Option<usize> {
        self.machines.iter().position(|m| m == machine)
    }

    /// Recipes listing `ingredient` among their outputs
    pub fn producers(&self, ingredient: &str) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.outputs.iter().any(|o| o.name == ingredient))
            .collect()
    }

    /// Every ingredient name referenced by a recipe or declared as a raw input
    pub fn ingredient_names(&self) -> BTreeSet<&str> {
        let mut names: BTreeSet<&str> = self.raw_inputs.iter().map(String::as_str).collect();
        for recipe in &self.recipes {
            for ingredient in recipe.inputs.iter().chain(&recipe.outputs) {
                names.insert(&ingredient.name);
            }
        }
        names
    }

    /// [`Self::ingredient_names`] plus every demand target
    pub fn ingredient_universe<'a>(&'a self, demand: &'a Demand) -> BTreeSet<&'a str> {
        let mut names = self.ingredient_names();
        names.extend(demand.names());
        names
    }
}

fn validate_recipe(
    def: RecipeDef,
    position: usize,
    machines: &[String],
) -> Result<Recipe, CatalogError> {
    let primaries: Vec<&Ingredient> = def.outputs.iter().filter(|o| o.is_primary).collect();

    let Some(name) = def.resolved_name().map(str::to_string) else {
        return Err(CatalogError::UnnamedRecipe { position });
    };

    if primaries.len() > 1 {
        return Err(CatalogError::MultiplePrimaryOutputs {
            recipe: name,
            outputs: primaries.iter().map(|o| o.name.clone()).collect(),
        });
    }

    if !machines.iter().any(|m| *m == def.machine) {
        return Err(CatalogError::UnknownMachine {
            recipe: name,
            machine: def.machine,
        });
    }

    if def.inputs.is_empty() && def.outputs.is_empty() {
        return Err(CatalogError::EmptyRecipe(name));
    }

    if !def.rate.is_positive() {
        return Err(CatalogError::InvalidRate(name));
    }

    for list in [&def.inputs, &def.outputs] {
        let mut seen = HashSet::new();
        for ingredient in list {
            if !seen.insert(ingredient.name.as_str()) {
                return Err(CatalogError::DuplicateIngredient {
                    recipe: name,
                    ingredient: ingredient.name.clone(),
                });
            }
            if ingredient.quantity.is_negative() {
                return Err(CatalogError::NegativeQuantity {
                    recipe: name,
                    ingredient: ingredient.name.clone(),
                });
            }
        }
    }

    // Primary flags are meaningless on inputs
    let inputs = def
        .inputs
        .into_iter()
        .map(|i| Ingredient {
            is_primary: false,
            ..i
        })
        .collect();

    Ok(Recipe {
        name,
        inputs,
        outputs: def.outputs,
        rate: def.rate,
        machine: def.machine,
    })
}

