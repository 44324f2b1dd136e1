//! CLI utility functions
//!
//! Helpers shared across commands: opening the graph and rendering entities.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::config::Config;
use crate::core::graph::{Entity, Relation};
use crate::core::manager::GraphManager;
use crate::core::metadata::ImportancePattern;
use crate::core::storage::Storage;

/// Store location: explicit `--store` first, then config resolution
pub fn resolve_store(config: &Config, store: Option<&Path>) -> PathBuf {
    store
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.store_path())
}

/// Open a manager over the store, bootstrapping with the configured locale
pub fn open_manager(config: &Config, store: &Path) -> GraphManager {
    GraphManager::new(Storage::with_locale(store, config.locale()))
}

/// Ten-cell bar for a score in [0, 1]
pub fn format_score(score: f64) -> String {
    let bars = (score.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("{}{} {:.2}", "█".repeat(bars), "░".repeat(10 - bars), score)
}

pub fn pattern_label(pattern: ImportancePattern) -> colored::ColoredString {
    let label = pattern.to_string();
    match pattern {
        ImportancePattern::Preference => label.magenta(),
        ImportancePattern::Strengthen => label.green(),
        ImportancePattern::TimeBased => label.yellow(),
        ImportancePattern::SelfManaged => label.blue(),
    }
}

/// Full multi-line rendering of one entity
pub fn print_entity(entity: &Entity) {
    let meta = &entity.metadata;

    println!("{} {}", entity.name.cyan().bold(), format!("({})", entity.entity_type).dimmed());
    println!("   Pattern:   {}", pattern_label(meta.importance_pattern));
    println!("   Resonance: {}", format_score(meta.resonance));
    println!("   Trust:     {}", format_score(meta.trust));

    let mut flags = Vec::new();
    if meta.is_user_preference {
        flags.push("user preference");
    }
    if meta.accessibility_flag {
        flags.push("accessibility");
    }
    if !flags.is_empty() {
        println!("   Flags:     {}", flags.join(", ").bold());
    }

    println!("   Updated:   {}", meta.last_updated.format("%Y-%m-%d %H:%M"));
    if let Some(accessed) = meta.last_accessed {
        println!("   Accessed:  {}", accessed.format("%Y-%m-%d %H:%M"));
    }

    for observation in &entity.observations {
        println!("   {} {}", "-".dimmed(), observation);
    }
}

pub fn print_relation(relation: &Relation) {
    println!(
        "   {} {} {}",
        relation.from.cyan(),
        format!("-[{}]->", relation.relation_type).dimmed(),
        relation.to.cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.5), "█████░░░░░ 0.50");
        assert_eq!(format_score(1.0), "██████████ 1.00");
        assert_eq!(format_score(0.0), "░░░░░░░░░░ 0.00");
    }

    #[test]
    fn test_explicit_store_wins() {
        let config = Config::default();
        let explicit = Path::new("/tmp/explicit.jsonl");
        assert_eq!(resolve_store(&config, Some(explicit)), explicit);
    }
}
