//! Factory Planner
//!
//! Exact production planning for crafting networks with shared
//! intermediates, byproducts and closed loops. A demand vector is turned into
//! one balance equation per ingredient, solved over rationals, and the
//! solution is rebuilt as dependency-ordered production lines.
//!
//! ```
//! use factory_planner::catalog::Catalog;
//! use factory_planner::models::{Demand, RecipeDef};
//! use factory_planner::planner::plan;
//! use factory_planner::quantity::int;
//!
//! let catalog = Catalog::with_default_machines(
//!     vec![
//!         RecipeDef::new("smelter", int(30))
//!             .input("iron ore", int(1))
//!             .output("iron ingot", int(1)),
//!         RecipeDef::new("constructor", int(15))
//!             .input("iron ingot", int(1))
//!             .output("iron rod", int(1)),
//!     ],
//!     vec!["iron ore".to_string()],
//! )
//! .unwrap();
//!
//! let plan = plan(&catalog, &Demand::new().with("iron rod", int(30))).unwrap();
//! let names: Vec<_> = plan.lines.iter().map(|l| l.name.as_str()).collect();
//! assert_eq!(names, ["iron ore", "iron ingot", "iron rod"]);
//! ```

pub mod catalog;
pub mod db;
pub mod equations;
pub mod error;
pub mod import;
pub mod models;
pub mod planner;
pub mod quantity;
pub mod reconstruct;
pub mod report;
pub mod sequencer;
pub mod solver;
