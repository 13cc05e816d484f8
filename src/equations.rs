//! Balance equations for a catalog and a demand vector
//!
//! One equation per ingredient:
//!
//! ```text
//! Σ output × multiplier − Σ input × multiplier + supply (raw inputs only) = demand
//! ```
//!
//! Unknowns are every recipe multiplier in catalog order followed by every
//! raw-input supply in catalog order.

use std::collections::BTreeMap;

use num_traits::{One, Zero};

use crate::catalog::Catalog;
use crate::models::{Demand, Unknown};
use crate::quantity::Quantity;

/// Sparse row: `Σ coefficient × unknown = demand`
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub ingredient: String,
    /// (unknown index, coefficient), sorted by index, no zero coefficients
    pub terms: Vec<(usize, Quantity)>,
    pub demand: Quantity,
}

#[derive(Debug, Clone)]
pub struct EquationSystem {
    pub unknowns: Vec<Unknown>,
    pub equations: Vec<Equation>,
}

impl EquationSystem {
    pub fn equation(&self, ingredient: &str) -> Option<&Equation> {
        self.equations.iter().find(|e| e.ingredient == ingredient)
    }
}

pub fn build_equations(catalog: &Catalog, demand: &Demand) -> EquationSystem {
    let mut unknowns: Vec<Unknown> = catalog
        .recipes()
        .iter()
        .map(|r| Unknown::Recipe(r.name.clone()))
        .collect();
    let first_raw = unknowns.len();
    unknowns.extend(catalog.raw_inputs().iter().cloned().map(Unknown::RawInput));

    let mut rows: BTreeMap<&str, BTreeMap<usize, Quantity>> = catalog
        .ingredient_universe(demand)
        .into_iter()
        .map(|name| (name, BTreeMap::new()))
        .collect();

    for (index, recipe) in catalog.recipes().iter().enumerate() {
        for ingredient in recipe.inputs.iter().chain(&recipe.outputs) {
            if let Some(row) = rows.get_mut(ingredient.name.as_str()) {
                // A name on both sides of one recipe contributes its net amount once
                row.entry(index).or_insert_with(|| recipe.net(&ingredient.name));
            }
        }
    }

    for (offset, name) in catalog.raw_inputs().iter().enumerate() {
        if let Some(row) = rows.get_mut(name.as_str()) {
            row.insert(first_raw + offset, Quantity::one());
        }
    }

    let equations = rows
        .into_iter()
        .map(|(name, terms)| Equation {
            ingredient: name.to_string(),
            terms: terms.into_iter().filter(|(_, c)| !c.is_zero()).collect(),
            demand: demand.get(name),
        })
        .collect();

    EquationSystem {
        unknowns,
        equations,
    }
}
