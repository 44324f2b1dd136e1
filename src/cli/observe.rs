//! `resonance observe` command
//!
//! Appends observations to an existing entity. Fails if the entity is
//! unknown.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::core::manager::{GraphManager, ObservationInput};

#[derive(Args, Debug)]
pub struct ObserveArgs {
    /// Entity name
    pub name: String,

    /// Observation texts
    #[arg(required = true)]
    pub observations: Vec<String>,
}

pub fn run(args: ObserveArgs, manager: &mut GraphManager) -> Result<()> {
    let results = manager.add_observations(vec![ObservationInput {
        entity_name: args.name,
        contents: args.observations,
    }])?;

    for result in &results {
        if result.added_observations.is_empty() {
            println!(
                "{} {} already has these observations",
                "!".yellow(),
                result.entity_name.cyan()
            );
            continue;
        }

        println!(
            "{} Added {} observation(s) to {}",
            "✓".green(),
            result.added_observations.len(),
            result.entity_name.cyan().bold()
        );
        for observation in &result.added_observations {
            println!("   {} {}", "+".green(), observation);
        }
    }

    Ok(())
}
