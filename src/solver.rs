//! Exact linear solve over rationals
//!
//! Gauss-Jordan elimination on the augmented matrix `[A | demand]`. Every
//! operation is exact, so long ingredient chains never drift.

use num_traits::Zero;
use tracing::debug;

use crate::equations::EquationSystem;
use crate::error::PlanError;
use crate::models::Unknown;
use crate::quantity::Quantity;

/// One exact value per unknown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    unknowns: Vec<Unknown>,
    values: Vec<Quantity>,
}

impl Solution {
    pub fn get(&self, unknown: &Unknown) -> Option<&Quantity> {
        self.unknowns
            .iter()
            .position(|u| u == unknown)
            .map(|i| &self.values[i])
    }

    pub fn multiplier(&self, recipe: &str) -> Option<&Quantity> {
        self.get(&Unknown::Recipe(recipe.to_string()))
    }

    pub fn supply(&self, raw_input: &str) -> Option<&Quantity> {
        self.get(&Unknown::RawInput(raw_input.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Unknown, &Quantity)> {
        self.unknowns.iter().zip(&self.values)
    }

    pub fn values(&self) -> &[Quantity] {
        &self.values
    }
}

/// Solve the balance system exactly
///
/// On an inconsistent system the error names one ingredient whose balance
/// takes part in the contradiction; other rows may be involved too.
pub fn solve(system: &EquationSystem) -> Result<Solution, PlanError> {
    let n = system.unknowns.len();

    // Dense augmented rows; the demand sits in column n
    let mut rows: Vec<Vec<Quantity>> = system
        .equations
        .iter()
        .map(|eq| {
            let mut row = vec![Quantity::zero(); n + 1];
            for (index, coefficient) in &eq.terms {
                row[*index] = coefficient.clone();
            }
            row[n] = eq.demand.clone();
            row
        })
        .collect();
    let mut origin: Vec<usize> = (0..rows.len()).collect();
    let mut pivots: Vec<usize> = Vec::new();

    for col in 0..n {
        let rank = pivots.len();
        let Some(found) = (rank..rows.len()).find(|&r| !rows[r][col].is_zero()) else {
            continue;
        };
        rows.swap(rank, found);
        origin.swap(rank, found);

        let inverse = rows[rank][col].recip();
        for value in rows[rank][col..].iter_mut() {
            *value = &*value * &inverse;
        }

        let pivot_row = rows[rank].clone();
        for (r, row) in rows.iter_mut().enumerate() {
            if r == rank || row[col].is_zero() {
                continue;
            }
            let factor = row[col].clone();
            for c in col..=n {
                row[c] = &row[c] - &factor * &pivot_row[c];
            }
        }

        pivots.push(col);
    }

    let rank = pivots.len();
    debug!(unknowns = n, equations = rows.len(), rank, "eliminated balance system");

    // Leftover rows read 0 = demand'; anything nonzero is a contradiction.
    // A leftover row only ever had pivot rows subtracted from it, so its
    // origin enters the contradicting combination with coefficient 1.
    if let Some(r) = (rank..rows.len()).find(|&r| !rows[r][n].is_zero()) {
        return Err(PlanError::InfeasibleDemand {
            ingredient: system.equations[origin[r]].ingredient.clone(),
        });
    }

    if rank < n {
        // Free columns, plus every pivot unknown whose row still depends on one
        let free: Vec<usize> = (0..n).filter(|col| !pivots.contains(col)).collect();
        let mut underdetermined = free.clone();
        for (r, &col) in pivots.iter().enumerate() {
            if free.iter().any(|&f| !rows[r][f].is_zero()) {
                underdetermined.push(col);
            }
        }
        underdetermined.sort_unstable();

        let unknowns = underdetermined
            .into_iter()
            .map(|col| system.unknowns[col].clone())
            .collect();
        return Err(PlanError::AmbiguousSolution { unknowns });
    }

    let mut values = vec![Quantity::zero(); n];
    for (r, &col) in pivots.iter().enumerate() {
        values[col] = rows[r][n].clone();
    }

    Ok(Solution {
        unknowns: system.unknowns.clone(),
        values,
    })
}
