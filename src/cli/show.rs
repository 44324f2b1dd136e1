//! `resonance show` command
//!
//! Shows named entities and the relations among them. Opening an entity
//! stamps its last-accessed time.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use super::search::OutputFormat;
use super::utils::{print_entity, print_relation};
use crate::core::manager::GraphManager;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Entity names
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

pub fn run(args: ShowArgs, manager: &mut GraphManager) -> Result<()> {
    let requested = args.names.clone();
    let graph = manager.open_nodes(args.names)?;

    if graph.entities.is_empty() {
        bail!("No entities found: {}", requested.join(", "));
    }

    if args.format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "entities": graph.entities,
                "relations": graph.relations,
            }))?
        );
        return Ok(());
    }

    for entity in &graph.entities {
        println!();
        print_entity(entity);
    }

    let missing: Vec<&str> = requested
        .iter()
        .map(String::as_str)
        .filter(|n| !graph.contains_entity(n))
        .collect();
    if !missing.is_empty() {
        println!("\n{} Not found: {}", "-".dimmed(), missing.join(", "));
    }

    if !graph.relations.is_empty() {
        println!("\n{}", "Relations".bold());
        for relation in &graph.relations {
            print_relation(relation);
        }
    }

    Ok(())
}
