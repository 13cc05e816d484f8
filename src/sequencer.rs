//! Dependency ordering of production lines
//!
//! Only required inputs form edges. Excess outputs are ignored here: two
//! recipes feeding each other byproducts is a normal closed loop, not an
//! ordering constraint.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::PlanError;
use crate::models::ProductionLine;

/// Order lines so every line follows the lines supplying its inputs
///
/// Raw inputs come first, by name. Recipe lines are peeled off in layers of
/// lines nothing else still needs; each layer is sorted by machine rank then
/// name, and the layers are emitted last-peeled first.
pub fn sequence(
    catalog: &Catalog,
    lines: Vec<ProductionLine>,
) -> Result<Vec<ProductionLine>, PlanError> {
    let (mut raw, mut remaining): (Vec<_>, Vec<_>) =
        lines.into_iter().partition(ProductionLine::is_raw_input);
    raw.sort_by(|a, b| a.name.cmp(&b.name));

    let mut layers: Vec<Vec<ProductionLine>> = Vec::new();
    while !remaining.is_empty() {
        let peelable: Vec<bool> = {
            let required: HashSet<&str> = remaining
                .iter()
                .flat_map(|line| line.inputs.iter().map(|i| i.name.as_str()))
                .collect();
            remaining
                .iter()
                .map(|line| {
                    line.product
                        .as_deref()
                        .is_none_or(|product| !required.contains(product))
                })
                .collect()
        };

        if !peelable.contains(&true) {
            let mut stuck: Vec<String> = remaining.into_iter().map(|l| l.name).collect();
            stuck.sort();
            return Err(PlanError::CyclicDependency { lines: stuck });
        }

        let mut layer = Vec::new();
        let mut rest = Vec::new();
        for (line, peel) in remaining.into_iter().zip(peelable) {
            if peel {
                layer.push(line);
            } else {
                rest.push(line);
            }
        }
        layer.sort_by(|a, b| compare_lines(catalog, a, b));
        debug!(layer = layers.len(), lines = layer.len(), "peeled production lines");

        layers.push(layer);
        remaining = rest;
    }

    raw.extend(layers.into_iter().rev().flatten());
    Ok(raw)
}

fn compare_lines(catalog: &Catalog, a: &ProductionLine, b: &ProductionLine) -> Ordering {
    let rank = |line: &ProductionLine| {
        line.machine
            .as_deref()
            .and_then(|m| catalog.machine_rank(m))
            .unwrap_or(usize::MAX)
    };
    rank(a).cmp(&rank(b)).then_with(|| a.name.cmp(&b.name))
}
