//! Plain-text rendering of a plan

use std::collections::BTreeMap;
use std::fmt;

use num_traits::Zero;

use crate::catalog::Catalog;
use crate::models::ProductionLine;
use crate::planner::Plan;
use crate::quantity::{self, Quantity};

fn show(q: &Quantity, places: usize, exact: bool) -> String {
    if exact {
        quantity::to_exact(q)
    } else {
        quantity::to_decimal(q, places)
    }
}

/// Format the ordered production lines, one block per line
pub fn format_plan(plan: &Plan, exact: bool) -> String {
    let mut output = format!("Production Lines ({})\n", plan.lines.len());
    for line in &plan.lines {
        output.push_str(&format_line(line, exact));
    }
    output
}

fn format_line(line: &ProductionLine, exact: bool) -> String {
    if line.is_raw_input() {
        return format!(
            "Raw Input: {} x {}\n",
            show(&line.quantity, 1, exact),
            line.name
        );
    }

    let mut output = format!("Line: {} x {}", show(&line.quantity, 1, exact), line.name);
    if let (Some(machines), Some(machine)) = (&line.machines, &line.machine) {
        output.push_str(&format!(" ({} x {})", show(machines, 2, exact), machine));
    }
    output.push('\n');

    for excess in &line.excess {
        output.push_str(&format!(
            "    Recycle: {} x {}\n",
            show(&excess.quantity, 2, exact),
            excess.name
        ));
    }
    for input in &line.inputs {
        output.push_str(&format!(
            "    Ingredient: {} x {}\n",
            show(&input.quantity, 2, exact),
            input.name
        ));
    }
    output
}

/// Machine and raw-input totals for a plan
#[derive(Debug)]
pub struct PlanSummary {
    /// (machine, total count) in canonical machine order
    pub machines: Vec<(String, Quantity)>,
    /// (raw input, quantity drawn) by name
    pub raw_inputs: Vec<(String, Quantity)>,
    pub lines: usize,
}

pub fn summarize_plan(catalog: &Catalog, plan: &Plan) -> PlanSummary {
    let mut machines: BTreeMap<usize, (String, Quantity)> = BTreeMap::new();
    let mut raw_inputs: BTreeMap<String, Quantity> = BTreeMap::new();

    for line in &plan.lines {
        if line.is_raw_input() {
            *raw_inputs.entry(line.name.clone()).or_insert_with(Quantity::zero) +=
                line.quantity.clone();
        } else if let (Some(machine), Some(count)) = (&line.machine, &line.machines) {
            let rank = catalog.machine_rank(machine).unwrap_or(usize::MAX);
            let entry = machines
                .entry(rank)
                .or_insert_with(|| (machine.clone(), Quantity::zero()));
            entry.1 += count.clone();
        }
    }

    PlanSummary {
        machines: machines.into_values().collect(),
        raw_inputs: raw_inputs.into_iter().collect(),
        lines: plan.lines.len(),
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Plan Summary ===")?;
        writeln!(f, "Production lines: {}", self.lines)?;
        writeln!(f)?;

        writeln!(f, "Machines required:")?;
        for (name, count) in &self.machines {
            writeln!(f, "  {}x {}", quantity::to_decimal(count, 2), name)?;
        }
        writeln!(f)?;

        writeln!(f, "Raw inputs required:")?;
        for (name, amount) in &self.raw_inputs {
            writeln!(f, "  {} @ {}", name, quantity::to_decimal(amount, 2))?;
        }

        Ok(())
    }
}
