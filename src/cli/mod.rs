//! CLI module - Command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod add;
pub mod config;
pub mod forget;
pub mod init;
pub mod observe;
pub mod relate;
pub mod search;
pub mod show;
pub mod stats;
pub mod utils;

/// resonance - knowledge graph memory with emotional scoring
///
/// Stores entities, relations and observations in a single JSONL file.
/// Each entity carries trust and resonance scores that decay or strengthen
/// over time.
#[derive(Parser, Debug)]
#[command(name = "resonance")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Memory store path (overrides RESONANCE_MEMORY_PATH and config)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a fresh store holding the bootstrap graph
    Init(init::InitArgs),

    /// Run the MCP server on stdio
    Serve,

    /// Create an entity
    Add(add::AddArgs),

    /// Create a relation between two entities
    Relate(relate::RelateArgs),

    /// Append observations to an entity
    Observe(observe::ObserveArgs),

    /// Delete entities and their relations
    Forget(forget::ForgetArgs),

    /// Ranked search over entities
    Search(search::SearchArgs),

    /// Show entities by name
    Show(show::ShowArgs),

    /// Graph statistics and inferred profile
    Stats(stats::StatsArgs),

    /// Get or set configuration
    Config(config::ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_store_flag() {
        let cli = Cli::parse_from(["resonance", "search", "zsh", "--store", "/tmp/m.jsonl"]);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/m.jsonl")));
        assert!(matches!(cli.command, Commands::Search(ref a) if a.query == "zsh"));
    }
}
