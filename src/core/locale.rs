//! Bootstrap content
//!
//! When no store exists yet, the graph is seeded with an identity entity and
//! a user-profile entity. Their text comes from a small locale table keyed
//! by language tag.

use chrono::{DateTime, Utc};

use super::graph::{Entity, KnowledgeGraph, Relation};
use super::metadata::{ImportancePattern, Metadata};

pub const BASE_LOCALE: &str = "en";

/// Seed text for one language
#[derive(Debug)]
pub struct BootstrapLocale {
    pub tag: &'static str,
    pub identity_name: &'static str,
    pub identity_type: &'static str,
    pub identity_observations: &'static [&'static str],
    pub profile_name: &'static str,
    pub profile_type: &'static str,
    pub profile_observations: &'static [&'static str],
    pub relation_type: &'static str,
}

pub static LOCALES: &[BootstrapLocale] = &[
    BootstrapLocale {
        tag: "en",
        identity_name: "Assistant_Identity",
        identity_type: "identity",
        identity_observations: &[
            "I am an assistant with a persistent memory graph",
            "I remember preferences, relationships and shared work across sessions",
            "I keep what matters to the user discoverable and let stale details fade",
        ],
        profile_name: "User_Profile",
        profile_type: "user_profile",
        profile_observations: &[
            "The person I work with",
            "Preferences and working style are learned as we collaborate",
        ],
        relation_type: "works_with",
    },
    BootstrapLocale {
        tag: "de",
        identity_name: "Assistant_Identitaet",
        identity_type: "identity",
        identity_observations: &[
            "Ich bin ein Assistent mit einem dauerhaften Gedaechtnisgraphen",
            "Ich merke mir Vorlieben, Beziehungen und gemeinsame Arbeit ueber Sitzungen hinweg",
            "Wichtiges bleibt auffindbar, veraltete Details verblassen",
        ],
        profile_name: "Benutzer_Profil",
        profile_type: "user_profile",
        profile_observations: &[
            "Die Person, mit der ich arbeite",
            "Vorlieben und Arbeitsstil lerne ich in der Zusammenarbeit",
        ],
        relation_type: "arbeitet_mit",
    },
    BootstrapLocale {
        tag: "es",
        identity_name: "Identidad_Asistente",
        identity_type: "identity",
        identity_observations: &[
            "Soy un asistente con un grafo de memoria persistente",
            "Recuerdo preferencias, relaciones y trabajo compartido entre sesiones",
            "Lo importante sigue siendo localizable y los detalles antiguos se desvanecen",
        ],
        profile_name: "Perfil_Usuario",
        profile_type: "user_profile",
        profile_observations: &[
            "La persona con la que trabajo",
            "Sus preferencias y estilo de trabajo se aprenden al colaborar",
        ],
        relation_type: "trabaja_con",
    },
];

/// Resolve a language tag: exact match, then primary subtag, then base locale
pub fn resolve(tag: &str) -> &'static BootstrapLocale {
    let tag = tag.trim().to_lowercase().replace('_', "-");
    let primary = tag.split('-').next().unwrap_or_default().to_string();

    LOCALES
        .iter()
        .find(|l| l.tag == tag)
        .or_else(|| LOCALES.iter().find(|l| l.tag == primary))
        .or_else(|| LOCALES.iter().find(|l| l.tag == BASE_LOCALE))
        .unwrap_or(&LOCALES[0])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Seed graph used when no store exists
pub fn bootstrap_graph(locale_tag: &str, now: DateTime<Utc>) -> KnowledgeGraph {
    let locale = resolve(locale_tag);

    let identity = Entity {
        name: locale.identity_name.to_string(),
        entity_type: locale.identity_type.to_string(),
        observations: strings(locale.identity_observations),
        metadata: Metadata {
            trust: 0.8,
            importance_pattern: ImportancePattern::SelfManaged,
            resonance: 0.95,
            ..Metadata::new(now)
        },
    };

    let profile = Entity {
        name: locale.profile_name.to_string(),
        entity_type: locale.profile_type.to_string(),
        observations: strings(locale.profile_observations),
        metadata: Metadata {
            trust: 0.6,
            importance_pattern: ImportancePattern::Strengthen,
            resonance: 0.8,
            is_user_preference: true,
            ..Metadata::new(now)
        },
    };

    let relation = Relation::new(&identity.name, locale.relation_type, &profile.name);

    let mut graph = KnowledgeGraph::empty(now);
    graph.entities.push(identity);
    graph.entities.push(profile);
    graph.relations.push(relation);
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fallbacks() {
        assert_eq!(resolve("de").tag, "de");
        assert_eq!(resolve("es-MX").tag, "es");
        assert_eq!(resolve("DE_at").tag, "de");
        assert_eq!(resolve("fr").tag, BASE_LOCALE);
        assert_eq!(resolve("").tag, BASE_LOCALE);
    }

    #[test]
    fn test_bootstrap_shape() {
        let graph = bootstrap_graph("en", Utc::now());
        assert_eq!(graph.entities.len(), 2);
        assert_eq!(graph.relations.len(), 1);

        let identity = &graph.entities[0].metadata;
        assert_eq!(identity.importance_pattern, ImportancePattern::SelfManaged);
        assert_eq!(identity.resonance, 0.95);
        assert_eq!(identity.trust, 0.8);

        let profile = &graph.entities[1].metadata;
        assert_eq!(profile.importance_pattern, ImportancePattern::Strengthen);
        assert_eq!(profile.resonance, 0.8);
        assert_eq!(profile.trust, 0.6);
        assert!(profile.is_user_preference);

        let relation = &graph.relations[0];
        assert_eq!(relation.from, graph.entities[0].name);
        assert_eq!(relation.to, graph.entities[1].name);
        assert_eq!(graph.metadata.user_profile, Default::default());
    }

    #[test]
    fn test_bootstrap_uses_locale_text() {
        let graph = bootstrap_graph("es", Utc::now());
        assert_eq!(graph.entities[1].name, "Perfil_Usuario");
        assert_eq!(graph.relations[0].relation_type, "trabaja_con");
    }
}
