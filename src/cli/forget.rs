//! `resonance forget` command
//!
//! Deletes entities along with every relation that touches them.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::core::manager::GraphManager;

#[derive(Args, Debug)]
pub struct ForgetArgs {
    /// Entity names
    #[arg(required = true)]
    pub names: Vec<String>,
}

pub fn run(args: ForgetArgs, manager: &mut GraphManager) -> Result<()> {
    let requested = args.names.clone();
    let report = manager.delete_entities(args.names)?;

    for name in &report.deleted_entities {
        println!("{} Deleted {}", "✓".green(), name.cyan());
    }
    for name in requested
        .iter()
        .filter(|n| !report.deleted_entities.contains(n))
    {
        println!("{} No entity named {}", "-".dimmed(), name);
    }
    if report.deleted_relations > 0 {
        println!("   Removed {} relation(s)", report.deleted_relations);
    }
    for warning in &report.warnings {
        println!("{} {}", "⚠".yellow(), warning.yellow());
    }

    Ok(())
}
