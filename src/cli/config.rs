//! `resonance config` command
//!
//! Get or set configuration values.
//!
//! # Usage
//! ```bash
//! resonance config                          # Show local config
//! resonance config bootstrap.locale         # Get specific value
//! resonance config bootstrap.locale de      # Set value
//! resonance config logging.debug true --global
//! resonance config --path
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::{Config, CONFIG_DIR, CONFIG_FILE};

/// Keys the config file understands
pub const KNOWN_KEYS: &[&str] = &["storage.path", "bootstrap.locale", "logging.debug"];

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config key (e.g., bootstrap.locale, logging.debug)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// List all config values
    #[arg(long)]
    pub list: bool,

    /// Show config file paths
    #[arg(long)]
    pub path: bool,

    /// Use global config (~/.resonance/config.toml) instead of local
    #[arg(short, long)]
    pub global: bool,
}

fn get_config_path(global: bool) -> PathBuf {
    if global {
        Config::global_config_path().unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE))
    } else {
        PathBuf::from(CONFIG_DIR).join(CONFIG_FILE)
    }
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config_path = get_config_path(args.global);

    if args.path {
        println!("Global: {}", get_config_path(true).display());
        println!("Local:  {}", get_config_path(false).display());
        println!();
        match Config::find_local_config().or_else(|| {
            Config::global_config_path().filter(|p| p.exists())
        }) {
            Some(active) => println!("{} Active: {}", "✓".green(), active.display()),
            None => println!("{} No config file found, using defaults", "!".yellow()),
        }
        return Ok(());
    }

    if args.list || (args.key.is_none() && args.value.is_none()) {
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            println!("Configuration ({}):\n", config_path.display());
            println!("{}", content);
        } else {
            println!("No config file at {}", config_path.display());
            println!();
            println!("Create one with:");
            println!("  resonance config bootstrap.locale en");
            println!("  resonance config logging.debug true --global");
        }
        return Ok(());
    }

    if let Some(key) = &args.key {
        if let Some(value) = &args.value {
            set_config_value(&config_path, key, value)?;
            println!(
                "{} Set {} = {} (in {})",
                "✓".green(),
                key,
                value,
                config_path.display()
            );
        } else {
            match get_config_value(&config_path, key)? {
                Some(v) => println!("{}", v),
                None => println!("(not set)"),
            }
        }
    }

    Ok(())
}

/// Set a nested config value using dot notation (e.g., "logging.debug").
/// Formatting and comments of the existing file are preserved.
pub fn set_config_value(path: &Path, key: &str, val: &str) -> Result<()> {
    use toml_edit::{value, DocumentMut};

    if !KNOWN_KEYS.contains(&key) {
        bail!("Unknown config key: {}. Known keys: {}", key, KNOWN_KEYS.join(", "));
    }

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    let (section, field) = key
        .split_once('.')
        .with_context(|| format!("Key must be section.key: {}", key))?;

    if doc.get(section).is_none() {
        doc[section] = toml_edit::table();
    }
    let table = doc[section]
        .as_table_like_mut()
        .with_context(|| format!("[{}] in {} is not a table", section, path.display()))?;
    table.insert(field, value(parse_toml_value(val)));

    let rendered = doc.to_string();
    toml::from_str::<Config>(&rendered)
        .with_context(|| format!("Invalid value for {}: {}", key, val))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, rendered)?;
    Ok(())
}

/// Get a config value by dot notation key
pub fn get_config_value(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let doc: toml::Value = content.parse().context("Failed to parse config.toml")?;

    let val = match key.split_once('.') {
        Some((section, field)) => doc.get(section).and_then(|t| t.get(field)),
        None => doc.get(key),
    };

    Ok(val.map(|v| match v {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }))
}

/// Parse string value to appropriate TOML type
fn parse_toml_value(s: &str) -> toml_edit::Value {
    if let Ok(b) = s.parse::<bool>() {
        return b.into();
    }
    if let Ok(i) = s.parse::<i64>() {
        return i.into();
    }
    if let Ok(f) = s.parse::<f64>() {
        return f.into();
    }
    s.into()
}
