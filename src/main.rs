//! resonance CLI - Entry point
//!
//! Usage: resonance <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resonance::cli::{utils, Cli, Commands};
use resonance::config::Config;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    let config = Config::load()?;

    init_tracing(cli.verbose || config.debug_enabled());

    let store = utils::resolve_store(&config, cli.store.as_deref());
    tracing::debug!(store = %store.display(), "Using memory store");

    match cli.command {
        Commands::Init(args) => resonance::cli::init::run(args, &config, &store),
        Commands::Config(args) => resonance::cli::config::run(args),
        Commands::Serve => resonance::run_mcp_server(utils::open_manager(&config, &store)),
        Commands::Add(args) => resonance::cli::add::run(args, &mut utils::open_manager(&config, &store)),
        Commands::Relate(args) => {
            resonance::cli::relate::run(args, &mut utils::open_manager(&config, &store))
        }
        Commands::Observe(args) => {
            resonance::cli::observe::run(args, &mut utils::open_manager(&config, &store))
        }
        Commands::Forget(args) => {
            resonance::cli::forget::run(args, &mut utils::open_manager(&config, &store))
        }
        Commands::Search(args) => resonance::cli::search::run(args, &utils::open_manager(&config, &store)),
        Commands::Show(args) => resonance::cli::show::run(args, &mut utils::open_manager(&config, &store)),
        Commands::Stats(args) => resonance::cli::stats::execute(args, &utils::open_manager(&config, &store)),
    }
}

/// Logs go to stderr; stdout carries command output and the MCP protocol.
/// RUST_LOG wins over the debug toggle.
fn init_tracing(debug: bool) {
    let fallback = if debug { "resonance=debug" } else { "resonance=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
