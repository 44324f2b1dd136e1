//! Profile inference
//!
//! Scans newly created entities for user traits and accumulates them into
//! the graph's `UserProfile`. Tags are only ever appended.

use super::graph::{Entity, UserProfile};
use super::metadata::inference_text;

/// Shells recognised as whole words, in priority order
pub static SHELL_TOKENS: &[&str] = &["zsh", "bash", "fish", "powershell"];

/// Phrases mapped to a profile tag
#[derive(Debug)]
pub struct TagRule {
    pub tag: &'static str,
    pub phrases: &'static [&'static str],
}

pub static ACCESSIBILITY_RULES: &[TagRule] = &[
    TagRule {
        tag: "screen-reader",
        phrases: &["screen reader", "vision impaired"],
    },
    TagRule {
        tag: "slow-pace",
        phrases: &["slow pace", "patient"],
    },
];

pub static COMMUNICATION_RULES: &[TagRule] = &[
    TagRule {
        tag: "detailed",
        phrases: &["detailed", "thorough"],
    },
    TagRule {
        tag: "concise",
        phrases: &["concise", "brief"],
    },
];

/// First shell token (table order) that appears as a word in `text`
pub fn detect_shell(text: &str) -> Option<&'static str> {
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    SHELL_TOKENS
        .iter()
        .copied()
        .find(|shell| words.contains(shell))
}

fn matching_tags<'a>(rules: &'a [TagRule], text: &'a str) -> impl Iterator<Item = &'static str> + 'a {
    rules
        .iter()
        .filter(move |rule| rule.phrases.iter().any(|p| text.contains(p)))
        .map(|rule| rule.tag)
}

fn push_unique(tags: &mut Vec<String>, tag: &str) -> bool {
    if tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

impl UserProfile {
    /// Fold one new entity into the profile; returns true if anything changed
    pub fn absorb(&mut self, entity: &Entity) -> bool {
        let text = inference_text(&entity.name, &entity.entity_type, &entity.observations);
        let mut changed = false;

        if let Some(shell) = detect_shell(&text) {
            if self.preferred_shell.as_deref() != Some(shell) {
                self.preferred_shell = Some(shell.to_string());
                changed = true;
            }
        }

        for tag in matching_tags(ACCESSIBILITY_RULES, &text) {
            changed |= push_unique(&mut self.accessibility_needs, tag);
        }
        for tag in matching_tags(COMMUNICATION_RULES, &text) {
            changed |= push_unique(&mut self.communication_preferences, tag);
        }

        changed
    }

    /// Fold a batch of new entities, in order
    pub fn absorb_all<'a, I>(&mut self, entities: I) -> bool
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        entities
            .into_iter()
            .fold(false, |changed, entity| self.absorb(entity) | changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entity(name: &str, observations: &[&str]) -> Entity {
        Entity::new(
            name,
            "note",
            observations.iter().map(|s| s.to_string()).collect(),
            Utc::now(),
        )
    }

    #[test]
    fn test_shell_detection() {
        assert_eq!(detect_shell("dave uses zsh for all command line work"), Some("zsh"));
        assert_eq!(detect_shell("a selfish bashful person"), None);
        assert_eq!(detect_shell("runs powershell on windows"), Some("powershell"));
    }

    #[test]
    fn test_last_shell_in_batch_wins() {
        let mut profile = UserProfile::default();
        profile.absorb_all(&[
            entity("A", &["Uses fish at home"]),
            entity("B", &["Uses bash on servers"]),
        ]);
        assert_eq!(profile.preferred_shell.as_deref(), Some("bash"));
    }

    #[test]
    fn test_tags_accumulate_without_duplicates() {
        let mut profile = UserProfile::default();
        assert!(profile.absorb(&entity("Carol", &["Uses a screen reader", "Be patient"])));
        assert!(!profile.absorb(&entity("Carol2", &["vision impaired"])));
        assert_eq!(profile.accessibility_needs, vec!["screen-reader", "slow-pace"]);

        profile.absorb(&entity("Style", &["Likes brief answers", "and thorough reviews"]));
        assert_eq!(profile.communication_preferences, vec!["detailed", "concise"]);
    }

    #[test]
    fn test_unrelated_entity_changes_nothing() {
        let mut profile = UserProfile::default();
        assert!(!profile.absorb(&entity("Rust", &["A systems language"])));
        assert_eq!(profile, UserProfile::default());
    }
}
