//! Data models for recipes, demand and production lines

use std::collections::BTreeMap;
use std::fmt;

use num_traits::Zero;

use crate::quantity::Quantity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Quantity,
    pub is_primary: bool, // Only meaningful for recipe outputs
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            name: name.into(),
            quantity,
            is_primary: false,
        }
    }

    pub fn primary(name: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            is_primary: true,
            ..Self::new(name, quantity)
        }
    }

    /// Same ingredient at `factor` times the quantity
    pub fn scaled(&self, factor: &Quantity) -> Self {
        Self {
            name: self.name.clone(),
            quantity: &self.quantity * factor,
            is_primary: self.is_primary,
        }
    }
}

/// Unvalidated recipe as read from a recipe file, the store, or built in code
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub name: Option<String>,
    pub inputs: Vec<Ingredient>,
    pub outputs: Vec<Ingredient>,
    pub rate: Quantity,
    pub machine: String,
}

impl RecipeDef {
    pub fn new(machine: impl Into<String>, rate: Quantity) -> Self {
        Self {
            name: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            rate,
            machine: machine.into(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn input(mut self, name: impl Into<String>, quantity: Quantity) -> Self {
        self.inputs.push(Ingredient::new(name, quantity));
        self
    }

    /// Add a primary output
    pub fn output(mut self, name: impl Into<String>, quantity: Quantity) -> Self {
        self.outputs.push(Ingredient::primary(name, quantity));
        self
    }

    /// Explicit name, or the primary output's name when unnamed
    pub fn resolved_name(&self) -> Option<&str> {
        self.name.as_deref().or_else(|| {
            self.outputs
                .iter()
                .find(|o| o.is_primary)
                .map(|o| o.name.as_str())
        })
    }

    /// Add a non-primary (excess) output
    pub fn byproduct(mut self, name: impl Into<String>, quantity: Quantity) -> Self {
        self.outputs.push(Ingredient::new(name, quantity));
        self
    }
}

/// A validated recipe, owned by a [`crate::catalog::Catalog`]
#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: String,
    pub inputs: Vec<Ingredient>,
    pub outputs: Vec<Ingredient>,
    pub rate: Quantity,
    pub machine: String,
}

impl Recipe {
    pub fn primary_output(&self) -> Option<&Ingredient> {
        self.outputs.iter().find(|o| o.is_primary)
    }

    pub fn excess_outputs(&self) -> impl Iterator<Item = &Ingredient> {
        self.outputs.iter().filter(|o| !o.is_primary)
    }

    /// Net quantity of `ingredient` produced by one cycle (outputs minus inputs)
    pub fn net(&self, ingredient: &str) -> Quantity {
        let produced: Quantity = self
            .outputs
            .iter()
            .filter(|o| o.name == ingredient)
            .map(|o| o.quantity.clone())
            .sum();
        let consumed: Quantity = self
            .inputs
            .iter()
            .filter(|i| i.name == ingredient)
            .map(|i| i.quantity.clone())
            .sum();
        produced - consumed
    }
}

/// Requested net output per ingredient; absent names are zero
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demand(BTreeMap<String, Quantity>);

impl Demand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, quantity: Quantity) -> Self {
        self.add(name, quantity);
        self
    }

    /// Add to the demand for `name`, dropping entries that cancel out
    pub fn add(&mut self, name: impl Into<String>, quantity: Quantity) {
        let name = name.into();
        let total = self.get(&name) + quantity;
        if total.is_zero() {
            self.0.remove(&name);
        } else {
            self.0.insert(name, total);
        }
    }

    pub fn get(&self, name: &str) -> Quantity {
        self.0.get(name).cloned().unwrap_or_else(Quantity::zero)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Quantity)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Elementwise sum of two demand vectors
    pub fn merged(&self, other: &Demand) -> Demand {
        let mut out = self.clone();
        for (name, quantity) in other.iter() {
            out.add(name, quantity.clone());
        }
        out
    }
}

impl<S: Into<String>> FromIterator<(S, Quantity)> for Demand {
    fn from_iter<I: IntoIterator<Item = (S, Quantity)>>(iter: I) -> Self {
        let mut demand = Demand::new();
        for (name, quantity) in iter {
            demand.add(name, quantity);
        }
        demand
    }
}

/// An unknown of the balance system
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unknown {
    /// Run-rate multiplier of a recipe
    Recipe(String),
    /// External supply drawn for a raw input
    RawInput(String),
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unknown::Recipe(name) => write!(f, "recipe '{}'", name),
            Unknown::RawInput(name) => write!(f, "raw input '{}'", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    RawInput,
    Recipe,
}

/// One row of a solved plan
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionLine {
    pub kind: LineKind,
    pub name: String,
    pub quantity: Quantity,
    /// Ingredient this line supplies to others (primary output or raw input name)
    pub product: Option<String>,
    pub multiplier: Option<Quantity>,
    pub machine: Option<String>,
    pub machines: Option<Quantity>,
    /// Required inputs, scaled; the only edges used for ordering
    pub inputs: Vec<Ingredient>,
    /// Non-primary outputs, scaled; never used for ordering
    pub excess: Vec<Ingredient>,
}

impl ProductionLine {
    pub fn raw_input(name: impl Into<String>, quantity: Quantity) -> Self {
        let name = name.into();
        Self {
            kind: LineKind::RawInput,
            product: Some(name.clone()),
            name,
            quantity,
            multiplier: None,
            machine: None,
            machines: None,
            inputs: Vec::new(),
            excess: Vec::new(),
        }
    }

    pub fn is_raw_input(&self) -> bool {
        self.kind == LineKind::RawInput
    }

    /// Net quantity of `ingredient` this line adds to the plan
    pub fn net(&self, ingredient: &str) -> Quantity {
        let mut total = Quantity::zero();
        if self.product.as_deref() == Some(ingredient) {
            total += self.quantity.clone();
        }
        for excess in self.excess.iter().filter(|e| e.name == ingredient) {
            total += excess.quantity.clone();
        }
        for input in self.inputs.iter().filter(|i| i.name == ingredient) {
            total -= input.quantity.clone();
        }
        total
    }
}
