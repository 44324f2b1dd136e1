//! Stats command - Show graph statistics and the inferred user profile

use std::path::Path;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::format_score;
use crate::core::manager::GraphManager;

/// Stats command arguments
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute stats command
pub fn execute(args: StatsArgs, manager: &GraphManager) -> Result<()> {
    let stats = manager.stats()?;
    let profile = manager.profile()?;

    if args.json {
        let json = serde_json::json!({
            "stats": stats,
            "profile": profile,
            "store": manager.storage().path(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("{}\n", "Knowledge Graph Statistics".bold());
    println!("  Entities:       {}", stats.entities);
    println!("  Relations:      {}", stats.relations);
    println!("  Observations:   {}", stats.observations);
    println!("  Interactions:   {}", stats.interaction_count);

    let mut patterns = stats.by_pattern.iter().peekable();
    while let Some((pattern, count)) = patterns.next() {
        let branch = if patterns.peek().is_some() { "├──" } else { "└──" };
        println!("  {} {:<13} {}", branch, pattern, count);
    }

    println!("  Preferences:    {}", stats.user_preferences);
    println!("  Accessibility:  {}", stats.accessibility_flagged);
    println!("  Mean resonance: {}", format_score(stats.mean_resonance));
    println!("  Mean trust:     {}", format_score(stats.mean_trust));

    println!("\n{}\n", "User Profile".bold());
    println!(
        "  Shell:          {}",
        profile.preferred_shell.as_deref().unwrap_or("-")
    );
    println!("  Accessibility:  {}", join_or_dash(&profile.accessibility_needs));
    println!(
        "  Communication:  {}",
        join_or_dash(&profile.communication_preferences)
    );

    print_store(manager.storage().path());
    Ok(())
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn print_store(path: &Path) {
    println!("\n  Store: {}", path.display());
}
