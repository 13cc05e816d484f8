//! Errors raised while planning a demand against a catalog

use thiserror::Error;

use crate::models::Unknown;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// No assignment satisfies every balance equation; `ingredient` is one
    /// balance involved in the contradiction
    #[error("demand cannot be met: the balance of '{ingredient}' has no solution")]
    InfeasibleDemand { ingredient: String },

    /// Free variables remain, usually alternate recipes for one ingredient
    #[error("solution is not unique; underdetermined: {}", list(.unknowns))]
    AmbiguousSolution { unknowns: Vec<Unknown> },

    /// A recipe would have to run in reverse, or a raw input be returned
    #[error("solution requires negative values for: {}", list(.unknowns))]
    NegativeSolution { unknowns: Vec<Unknown> },

    #[error("circular requirement between production lines: {}", .lines.join(", "))]
    CyclicDependency { lines: Vec<String> },
}

fn list(unknowns: &[Unknown]) -> String {
    unknowns
        .iter()
        .map(|u| u.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
