//! Factory Planner
//!
//! Command line front end: manage the recipe catalog and plan demands.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use factory_planner::models::Demand;
use factory_planner::{db, import, planner, quantity, report};

#[derive(Parser)]
#[command(name = "factory-planner")]
#[command(about = "Exact production line planner for crafting networks")]
struct Cli {
    /// Path to the SQLite catalog database
    #[arg(short, long, env = "FACTORY_PLANNER_DB", default_value = "recipes.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every *.recipes file under a directory
    Import {
        /// Directory containing recipe files
        dir: PathBuf,

        /// Clear the existing catalog first
        #[arg(long)]
        clear: bool,
    },

    /// Plan the production lines for a demand
    Plan {
        /// Demanded ingredients as NAME=QUANTITY (e.g. "iron rod=30")
        #[arg(required = true)]
        demand: Vec<String>,

        /// Print exact fractions instead of decimals
        #[arg(long)]
        exact: bool,

        /// Also print machine and raw input totals
        #[arg(short, long)]
        verbose: bool,
    },

    /// List all recipes in the catalog
    ListRecipes,

    /// List every ingredient with a primary producer
    ListProducts,

    /// Show details for a specific recipe
    Recipe {
        /// Recipe name
        name: String,
    },

    /// Initialize empty database with schema
    Init,

    /// Load the bundled sample catalog
    LoadSample,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Import { dir, clear } => {
            if clear {
                println!("Clearing existing catalog...");
            }

            // Rolled back entirely if the combined catalog fails validation
            let stats = import::import_to_database(&conn, &dir, clear)?;
            println!("{}", stats);

            let catalog = db::load_catalog(&conn)?;
            println!("Catalog valid: {} recipes", catalog.recipes().len());
        }

        Commands::Plan {
            demand,
            exact,
            verbose,
        } => {
            let catalog = db::load_catalog(&conn)?;
            let demand = parse_demand(&demand)?;
            if demand.is_empty() {
                println!("Demand is empty; nothing to plan.");
                return Ok(());
            }
            let plan = planner::plan(&catalog, &demand)?;

            println!("{}", report::format_plan(&plan, exact));
            if verbose {
                println!("{}", report::summarize_plan(&catalog, &plan));
            }
        }

        Commands::ListRecipes => {
            let catalog = db::load_catalog(&conn)?;
            if catalog.recipes().is_empty() {
                println!("No recipes in database. Run 'import' or 'load-sample' first.");
            } else {
                println!("{:<32} {:<16} {:>10}", "Recipe", "Machine", "Rate");
                println!("{}", "-".repeat(60));
                for r in catalog.recipes() {
                    println!(
                        "{:<32} {:<16} {:>10}",
                        r.name,
                        r.machine,
                        quantity::to_decimal(&r.rate, 2)
                    );
                }
            }
        }

        Commands::ListProducts => {
            let products = db::list_products(&conn)?;
            if products.is_empty() {
                println!("No recipes in database. Run 'import' or 'load-sample' first.");
            } else {
                println!("Producible ingredients:");
                for p in products {
                    println!("  {}", p);
                }
            }
        }

        Commands::Recipe { name } => {
            let catalog = db::load_catalog(&conn)?;
            if let Some(r) = catalog.recipe(&name) {
                println!("Recipe: {}", r.name);
                println!("  Machine: {}", r.machine);
                println!("  Rate: {}", quantity::to_decimal(&r.rate, 2));

                if !r.inputs.is_empty() {
                    println!("  Inputs:");
                    for i in &r.inputs {
                        println!("    {} x {}", quantity::to_exact(&i.quantity), i.name);
                    }
                }
                if !r.outputs.is_empty() {
                    println!("  Outputs:");
                    for o in &r.outputs {
                        let tag = if o.is_primary { "" } else { " (byproduct)" };
                        println!("    {} x {}{}", quantity::to_exact(&o.quantity), o.name, tag);
                    }
                }

                let alternates: Vec<_> = r
                    .primary_output()
                    .map(|p| catalog.producers(&p.name))
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|other| other.name != r.name)
                    .map(|other| other.name.as_str())
                    .collect();
                if !alternates.is_empty() {
                    println!("  Also produced by: {}", alternates.join(", "));
                }
            } else {
                println!("Recipe '{}' not found", name);
            }
        }

        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            let stats = import::load_sample(&conn)?;
            println!("{}", stats);
            println!("Sample data loaded successfully!");
        }
    }

    Ok(())
}

/// Parse NAME=QUANTITY pairs; repeated names add up
fn parse_demand(args: &[String]) -> Result<Demand> {
    args.iter()
        .map(|arg| -> Result<(String, quantity::Quantity)> {
            let (name, amount) = arg
                .rsplit_once('=')
                .ok_or_else(|| anyhow!("Expected NAME=QUANTITY, got '{}'", arg))?;
            let amount = quantity::parse(amount)
                .with_context(|| format!("Bad quantity for '{}'", name.trim()))?;
            Ok((name.trim().to_string(), amount))
        })
        .collect()
}
