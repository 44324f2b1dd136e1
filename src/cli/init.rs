//! `resonance init` command
//!
//! Writes a fresh store holding the bootstrap graph and creates the global
//! config file if there is none.
//!
//! # Usage
//! ```bash
//! resonance init
//! resonance --store ./memory.jsonl init --force
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;

use crate::config::Config;
use crate::core::locale::bootstrap_graph;
use crate::core::storage::Storage;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing store
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: InitArgs, config: &Config, store: &Path) -> Result<()> {
    let storage = Storage::with_locale(store, config.locale());

    if storage.exists() && !args.force {
        bail!(
            "Store {} already exists. Use --force to reinitialize.",
            store.display()
        );
    }

    let graph = bootstrap_graph(storage.locale(), Utc::now());
    storage
        .write(&graph)
        .with_context(|| format!("Failed to initialize store {}", store.display()))?;

    println!("{} Initialized store: {}", "✓".green(), store.display());
    println!("   Locale:   {}", storage.locale());
    println!("   Entities: {}", graph.entities.len());

    if let Some(config_path) = Config::global_config_path() {
        if config_path.exists() {
            println!("   Config:   {} (kept)", config_path.display());
        } else {
            Config::default()
                .save_to(&config_path)
                .with_context(|| format!("Failed to write config {}", config_path.display()))?;
            println!("   Config:   {}", config_path.display());
        }
    }

    println!("\nNext steps:");
    println!("  resonance add Dave_Shell --type user_preference --observation \"Dave uses zsh\"");
    println!("  resonance search zsh");
    println!("  resonance serve");

    Ok(())
}
