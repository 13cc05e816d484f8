//! End-to-end planning: equations, solve, reconstruct, sequence

use tracing::debug;

use crate::catalog::Catalog;
use crate::equations::build_equations;
use crate::error::PlanError;
use crate::models::{Demand, ProductionLine};
use crate::reconstruct::reconstruct;
use crate::sequencer::sequence;
use crate::solver::{Solution, solve};

/// Result of planning one demand vector
#[derive(Debug, Clone)]
pub struct Plan {
    pub solution: Solution,
    /// Raw inputs first, then recipe lines in dependency order
    pub lines: Vec<ProductionLine>,
}

impl Plan {
    pub fn raw_inputs(&self) -> impl Iterator<Item = &ProductionLine> {
        self.lines.iter().filter(|l| l.is_raw_input())
    }

    pub fn recipe_lines(&self) -> impl Iterator<Item = &ProductionLine> {
        self.lines.iter().filter(|l| !l.is_raw_input())
    }

    pub fn line(&self, name: &str) -> Option<&ProductionLine> {
        self.lines.iter().find(|l| l.name == name)
    }
}

/// Plan the production needed for `demand`
pub fn plan(catalog: &Catalog, demand: &Demand) -> Result<Plan, PlanError> {
    let system = build_equations(catalog, demand);
    debug!(
        equations = system.equations.len(),
        unknowns = system.unknowns.len(),
        "built balance equations"
    );

    let solution = solve(&system)?;
    let lines = reconstruct(catalog, &solution)?;
    debug!(lines = lines.len(), "reconstructed production lines");

    let lines = sequence(catalog, lines)?;
    Ok(Plan { solution, lines })
}
