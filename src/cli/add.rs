//! `resonance add` command
//!
//! Creates one entity. Metadata is inferred from the name, type and
//! observations.
//!
//! # Usage
//! ```bash
//! resonance add Dave_Shell --type user_preference --observation "Dave uses zsh"
//! resonance add Standup --type meeting -o "Daily at 9:30" -o "Remote"
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::print_entity;
use crate::core::graph::NewEntity;
use crate::core::manager::GraphManager;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Unique entity name
    pub name: String,

    /// Entity type label
    #[arg(short = 't', long = "type")]
    pub entity_type: String,

    /// Observation text (repeatable)
    #[arg(short, long = "observation")]
    pub observations: Vec<String>,
}

pub fn run(args: AddArgs, manager: &mut GraphManager) -> Result<()> {
    let name = args.name.clone();
    let created = manager.create_entities(vec![NewEntity::new(
        args.name,
        args.entity_type,
        args.observations,
    )])?;

    match created.first() {
        Some(entity) => {
            println!("{} Created entity", "✓".green());
            print_entity(entity);
        }
        None => println!("{} Entity {} already exists, nothing changed", "!".yellow(), name.cyan()),
    }

    Ok(())
}
