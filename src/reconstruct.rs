//! Turn a solved assignment into production lines

use num_traits::{One, Signed, Zero};

use crate::catalog::Catalog;
use crate::error::PlanError;
use crate::models::{LineKind, ProductionLine, Recipe, Unknown};
use crate::quantity::Quantity;
use crate::solver::Solution;

/// Build one line per nonzero unknown, in unknown order
///
/// Fails if any recipe multiplier or raw-input supply is negative; nothing is
/// clamped.
pub fn reconstruct(
    catalog: &Catalog,
    solution: &Solution,
) -> Result<Vec<ProductionLine>, PlanError> {
    let negative: Vec<Unknown> = solution
        .iter()
        .filter(|(_, value)| value.is_negative())
        .map(|(unknown, _)| unknown.clone())
        .collect();
    if !negative.is_empty() {
        return Err(PlanError::NegativeSolution { unknowns: negative });
    }

    let mut lines = Vec::new();
    for (unknown, value) in solution.iter() {
        if value.is_zero() {
            continue;
        }
        match unknown {
            Unknown::Recipe(name) => {
                // Every recipe unknown comes from this catalog
                if let Some(recipe) = catalog.recipe(name) {
                    lines.push(recipe_line(recipe, value));
                }
            }
            Unknown::RawInput(name) => {
                lines.push(ProductionLine::raw_input(name.clone(), value.clone()));
            }
        }
    }
    Ok(lines)
}

fn recipe_line(recipe: &Recipe, multiplier: &Quantity) -> ProductionLine {
    // Recipes without a primary output are not scaled by an output quantity
    let primary = recipe.primary_output();
    let per_cycle = primary.map_or_else(Quantity::one, |p| p.quantity.clone());
    let quantity = multiplier * per_cycle;
    let machines = &quantity / &recipe.rate;

    ProductionLine {
        kind: LineKind::Recipe,
        name: recipe.name.clone(),
        product: primary.map(|p| p.name.clone()),
        multiplier: Some(multiplier.clone()),
        machine: Some(recipe.machine.clone()),
        machines: Some(machines),
        inputs: recipe.inputs.iter().map(|i| i.scaled(multiplier)).collect(),
        excess: recipe.excess_outputs().map(|o| o.scaled(multiplier)).collect(),
        quantity,
    }
}
