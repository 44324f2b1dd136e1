//! `resonance search` command
//!
//! Case-insensitive substring search ranked by match location and the
//! entity's emotional metadata.
//!
//! # Usage
//! ```bash
//! resonance search zsh
//! resonance search "screen reader" --limit 5
//! resonance search zsh --format json
//! ```

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;

use super::utils::{format_score, pattern_label, print_relation};
use crate::core::manager::GraphManager;
use crate::core::search::{SearchQuery, SearchResults};

#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Substring to look for in names, types and observations
    pub query: String,

    /// Maximum results
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

pub fn run(args: SearchArgs, manager: &GraphManager) -> Result<()> {
    let mut query = SearchQuery::new(args.query);
    if let Some(limit) = args.limit {
        query = query.with_limit(limit);
    }

    let results = manager.search_nodes(&query)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Pretty => print_pretty(&results),
    }

    Ok(())
}

fn print_pretty(results: &SearchResults) {
    if results.entities.is_empty() {
        println!("No results found.");
        return;
    }

    println!("\nFound {} result(s):\n", results.entities.len());

    for (i, hit) in results.entities.iter().enumerate() {
        let entity = &hit.entity;
        println!(
            "{}. {} {}  {}",
            i + 1,
            entity.name.cyan().bold(),
            format!("({})", entity.entity_type).dimmed(),
            format!("score {:.2}", hit.score).bold()
        );
        println!(
            "   {} | resonance {}",
            pattern_label(entity.metadata.importance_pattern),
            format_score(entity.metadata.resonance)
        );
        if let Some(first) = entity.observations.first() {
            let preview: String = first.chars().take(100).collect();
            println!("   {}", preview);
        }
        println!();
    }

    if !results.relations.is_empty() {
        println!("{}", "Relations".bold());
        for relation in &results.relations {
            print_relation(relation);
        }
    }
}
