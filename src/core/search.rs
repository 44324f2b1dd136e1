//! Search - ranked lookup over the graph
//!
//! Case-insensitive substring matching on name, type and observations,
//! boosted by each entity's emotional metadata. Entities that match nothing
//! lexically are excluded; ties keep graph order.

use serde::Serialize;

use super::graph::{Entity, KnowledgeGraph, Relation};

/// Score contributions
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub name_match: f64,
    pub type_match: f64,
    pub observation_match: f64,
    pub resonance: f64,
    pub trust: f64,
    pub user_preference: f64,
    pub accessibility: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            name_match: 10.0,
            type_match: 5.0,
            observation_match: 3.0,
            resonance: 2.0,
            trust: 2.0,
            user_preference: 5.0,
            accessibility: 3.0,
        }
    }
}

/// Search query builder
#[derive(Debug, Default, Clone)]
pub struct SearchQuery {
    /// Substring to look for
    pub text: String,

    /// Maximum results, applied after ranking
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One ranked entity
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub entity: Entity,
    pub score: f64,
}

/// Ranked entities plus the relations among them
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub entities: Vec<SearchHit>,
    pub relations: Vec<Relation>,
}

impl SearchResults {
    pub fn names(&self) -> Vec<&str> {
        self.entities.iter().map(|h| h.entity.name.as_str()).collect()
    }
}

/// Score one entity against an already-lowercased needle. Zero means no match.
pub fn score_entity(entity: &Entity, needle: &str, weights: &ScoreWeights) -> f64 {
    let mut lexical = 0.0;
    if entity.name.to_lowercase().contains(needle) {
        lexical += weights.name_match;
    }
    if entity.entity_type.to_lowercase().contains(needle) {
        lexical += weights.type_match;
    }
    if entity
        .observations
        .iter()
        .any(|o| o.to_lowercase().contains(needle))
    {
        lexical += weights.observation_match;
    }

    if lexical == 0.0 {
        return 0.0;
    }

    let meta = &entity.metadata;
    let mut score = lexical + meta.resonance * weights.resonance + meta.trust * weights.trust;
    if meta.is_user_preference {
        score += weights.user_preference;
    }
    if meta.accessibility_flag {
        score += weights.accessibility;
    }
    score
}

/// Execute a search query with default weights
pub fn search(graph: &KnowledgeGraph, query: &SearchQuery) -> SearchResults {
    search_with(graph, query, &ScoreWeights::default())
}

pub fn search_with(graph: &KnowledgeGraph, query: &SearchQuery, weights: &ScoreWeights) -> SearchResults {
    let needle = query.text.to_lowercase();

    let mut hits: Vec<SearchHit> = graph
        .entities
        .iter()
        .filter_map(|entity| {
            let score = score_entity(entity, &needle, weights);
            (score > 0.0).then(|| SearchHit {
                entity: entity.clone(),
                score,
            })
        })
        .collect();

    // stable: equal scores keep graph order
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(limit) = query.limit {
        hits.truncate(limit);
    }

    let relations = graph.relations_within(hits.iter().map(|h| h.entity.name.as_str()));

    SearchResults {
        entities: hits,
        relations,
    }
}
