//! `resonance relate` command

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::print_relation;
use crate::core::graph::Relation;
use crate::core::manager::GraphManager;

#[derive(Args, Debug)]
pub struct RelateArgs {
    /// Source entity name
    pub from: String,

    /// Relation label, in active voice (e.g. works_with)
    pub relation_type: String,

    /// Target entity name
    pub to: String,
}

pub fn run(args: RelateArgs, manager: &mut GraphManager) -> Result<()> {
    let relation = Relation::new(args.from, args.relation_type, args.to);
    let created = manager.create_relations(vec![relation.clone()])?;

    if created.is_empty() {
        println!("{} Relation already exists", "!".yellow());
    } else {
        println!("{} Created relation", "✓".green());
    }
    print_relation(&relation);

    Ok(())
}
