//! Graph - entities, relations and the store envelope
//!
//! # Key Properties
//! - **Entity**: unique name, type label, ordered observations, metadata
//! - **Relation**: directed typed edge between two entity *names*
//! - **GraphMetadata**: schema version, timestamps, interaction counter and
//!   the accumulated user profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metadata::{infer_metadata, Metadata, MetadataInput};

pub const SCHEMA_VERSION: &str = "1.0.0";

/// A named node in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub entity_type: String,
    #[serde(default)]
    pub observations: Vec<String>,
    pub metadata: Metadata,
}

impl Entity {
    /// Build an entity with inferred metadata
    pub fn new(
        name: impl Into<String>,
        entity_type: impl Into<String>,
        observations: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        let entity_type = entity_type.into();
        let observations = dedup_observations(observations);
        let metadata = infer_metadata(&name, &entity_type, &observations, now);
        Self {
            name,
            entity_type,
            observations,
            metadata,
        }
    }

    pub fn has_observation(&self, text: &str) -> bool {
        self.observations.iter().any(|o| o == text)
    }
}

/// Caller-side description of an entity to create.
///
/// Metadata is optional; any fields given override what is inferred from
/// the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntity {
    pub name: String,
    pub entity_type: String,
    #[serde(default)]
    pub observations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataInput>,
}

impl NewEntity {
    pub fn new(
        name: impl Into<String>,
        entity_type: impl Into<String>,
        observations: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            observations,
            metadata: None,
        }
    }
}

/// A directed, typed edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub relation_type: String,
}

impl Relation {
    pub fn new(
        from: impl Into<String>,
        relation_type: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type: relation_type.into(),
        }
    }

    pub fn touches(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }
}

/// Inferred user traits. Accumulates; never recomputed from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_shell: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_style: Option<String>,
    #[serde(default)]
    pub accessibility_needs: Vec<String>,
    #[serde(default)]
    pub communication_preferences: Vec<String>,
    #[serde(default = "default_trust_level")]
    pub trust_level: f64,
    #[serde(default)]
    pub panic_triggers: Vec<String>,
    #[serde(default)]
    pub success_patterns: Vec<String>,
}

fn default_trust_level() -> f64 {
    0.5
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            preferred_shell: None,
            working_style: None,
            accessibility_needs: Vec::new(),
            communication_preferences: Vec::new(),
            trust_level: default_trust_level(),
            panic_triggers: Vec::new(),
            success_patterns: Vec::new(),
        }
    }
}

/// Store-level envelope, persisted as the `metadata` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub version: String,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub interaction_count: u64,
    #[serde(default)]
    pub user_profile: UserProfile,
}

impl GraphMetadata {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            created: now,
            last_updated: now,
            interaction_count: 0,
            user_profile: UserProfile::default(),
        }
    }

    /// Count one persisted interaction
    pub fn record_interaction(&mut self, now: DateTime<Utc>) {
        self.interaction_count += 1;
        self.last_updated = now;
    }
}

/// The full in-memory graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeGraph {
    pub metadata: GraphMetadata,
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
}

impl KnowledgeGraph {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            metadata: GraphMetadata::new(now),
            entities: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn contains_entity(&self, name: &str) -> bool {
        self.entities.iter().any(|e| e.name == name)
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    pub fn contains_relation(&self, relation: &Relation) -> bool {
        self.relations.iter().any(|r| r == relation)
    }

    /// Relations whose endpoints are both among `names`
    pub fn relations_within<'a, I>(&self, names: I) -> Vec<Relation>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: std::collections::HashSet<&str> = names.into_iter().collect();
        self.relations
            .iter()
            .filter(|r| names.contains(r.from.as_str()) && names.contains(r.to.as_str()))
            .cloned()
            .collect()
    }
}

/// Drop repeated observation strings, keeping first occurrences in order
pub fn dedup_observations(observations: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    observations
        .into_iter()
        .filter(|o| seen.insert(o.clone()))
        .collect()
}
