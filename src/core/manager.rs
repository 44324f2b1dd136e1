//! Graph Manager - the mutation API
//!
//! Every operation is a full round trip: load the graph, change it in
//! memory, save (which runs decay), return. No graph is kept between calls;
//! the only state carried across calls is the decay engine's last pass.
//!
//! Batch strictness is uneven: duplicates are dropped silently,
//! while an unknown entity in `add_observations` fails the whole call.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::decay::{Clock, DecayEngine, SystemClock};
use super::error::{MemoryError, MemoryResult};
use super::graph::{dedup_observations, Entity, KnowledgeGraph, NewEntity, Relation, UserProfile};
use super::metadata::{infer_metadata, ImportancePattern};
use super::search::{self, SearchQuery, SearchResults};
use super::storage::Storage;

/// Trust gained when an observation is actually added
pub const OBSERVATION_TRUST_STEP: f64 = 0.01;

/// Observations to append to one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationInput {
    pub entity_name: String,
    pub contents: Vec<String>,
}

/// What `add_observations` appended to one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResult {
    pub entity_name: String,
    pub added_observations: Vec<String>,
}

/// Observations to remove from one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationDeletion {
    pub entity_name: String,
    pub observations: Vec<String>,
}

/// Outcome of `delete_entities`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReport {
    pub deleted_entities: Vec<String>,
    pub deleted_relations: usize,
    /// Non-fatal notices, e.g. a user preference was removed
    pub warnings: Vec<String>,
}

/// Aggregate numbers about the stored graph
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub entities: usize,
    pub relations: usize,
    pub observations: usize,
    pub interaction_count: u64,
    pub by_pattern: BTreeMap<String, usize>,
    pub user_preferences: usize,
    pub accessibility_flagged: usize,
    pub mean_resonance: f64,
    pub mean_trust: f64,
}

/// Entry point for all graph operations
pub struct GraphManager {
    storage: Storage,
    decay: DecayEngine,
    clock: Arc<dyn Clock>,
}

impl GraphManager {
    pub fn new(storage: Storage) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    /// Manager whose timestamps and decay both follow `clock`
    pub fn with_clock(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            decay: DecayEngine::new(clock.clone()),
            clock,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn decay_engine(&self) -> &DecayEngine {
        &self.decay
    }

    fn load(&self) -> MemoryResult<KnowledgeGraph> {
        Ok(self.storage.load(self.clock.now())?)
    }

    fn save(&mut self, graph: &mut KnowledgeGraph) -> MemoryResult<()> {
        self.storage.save(graph, &mut self.decay)?;
        Ok(())
    }

    /// Insert entities whose names are new; returns only those inserted
    pub fn create_entities(&mut self, candidates: Vec<NewEntity>) -> MemoryResult<Vec<Entity>> {
        let mut graph = self.load()?;
        let now = self.clock.now();

        let mut names: HashSet<String> = graph.entities.iter().map(|e| e.name.clone()).collect();
        let mut inserted = Vec::new();

        for candidate in candidates {
            if !names.insert(candidate.name.clone()) {
                tracing::debug!(name = %candidate.name, "Entity already exists, skipping");
                continue;
            }

            let observations = dedup_observations(candidate.observations);
            let inferred = infer_metadata(&candidate.name, &candidate.entity_type, &observations, now);
            let metadata = match candidate.metadata {
                Some(input) => input.merge_into(inferred, &candidate.name)?,
                None => inferred,
            };

            inserted.push(Entity {
                name: candidate.name,
                entity_type: candidate.entity_type,
                observations,
                metadata,
            });
        }

        if inserted.is_empty() {
            return Ok(inserted);
        }

        graph.metadata.user_profile.absorb_all(&inserted);
        graph.entities.extend(inserted.iter().cloned());
        self.save(&mut graph)?;

        tracing::debug!(count = inserted.len(), "Entities created");
        Ok(inserted)
    }

    /// Insert relations whose triple is new; returns only those inserted
    pub fn create_relations(&mut self, candidates: Vec<Relation>) -> MemoryResult<Vec<Relation>> {
        let mut graph = self.load()?;

        let mut seen: HashSet<Relation> = graph.relations.iter().cloned().collect();
        let inserted: Vec<Relation> = candidates
            .into_iter()
            .filter(|r| seen.insert(r.clone()))
            .collect();

        if inserted.is_empty() {
            return Ok(inserted);
        }

        graph.relations.extend(inserted.iter().cloned());
        self.save(&mut graph)?;
        Ok(inserted)
    }

    /// Append new observations. An unknown entity fails the whole batch.
    pub fn add_observations(
        &mut self,
        requests: Vec<ObservationInput>,
    ) -> MemoryResult<Vec<ObservationResult>> {
        let mut graph = self.load()?;
        let now = self.clock.now();

        if let Some(missing) = requests
            .iter()
            .find(|r| !graph.contains_entity(&r.entity_name))
        {
            return Err(MemoryError::EntityNotFound(missing.entity_name.clone()));
        }

        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            let entity = graph
                .entity_mut(&request.entity_name)
                .ok_or_else(|| MemoryError::EntityNotFound(request.entity_name.clone()))?;

            let mut added = Vec::new();
            for content in request.contents {
                if !entity.has_observation(&content) {
                    entity.observations.push(content.clone());
                    added.push(content);
                }
            }

            entity.metadata.last_updated = now;
            entity.metadata.last_accessed = Some(now);
            if !added.is_empty() {
                entity.metadata.bump_trust(OBSERVATION_TRUST_STEP);
            }

            results.push(ObservationResult {
                entity_name: request.entity_name,
                added_observations: added,
            });
        }

        self.save(&mut graph)?;
        Ok(results)
    }

    /// Remove entities and every relation touching them
    pub fn delete_entities(&mut self, names: Vec<String>) -> MemoryResult<DeleteReport> {
        let mut graph = self.load()?;
        let targets: HashSet<&str> = names.iter().map(String::as_str).collect();
        let mut report = DeleteReport::default();

        for entity in graph.entities.iter().filter(|e| targets.contains(e.name.as_str())) {
            if entity.metadata.is_user_preference {
                tracing::warn!(name = %entity.name, "Deleting an entity that holds a user preference");
                report.warnings.push(format!(
                    "Deleted user preference entity '{}'; inferred profile traits are kept",
                    entity.name
                ));
            }
            report.deleted_entities.push(entity.name.clone());
        }

        graph.entities.retain(|e| !targets.contains(e.name.as_str()));
        let before = graph.relations.len();
        graph
            .relations
            .retain(|r| !targets.contains(r.from.as_str()) && !targets.contains(r.to.as_str()));
        report.deleted_relations = before - graph.relations.len();

        self.save(&mut graph)?;
        Ok(report)
    }

    /// Remove exact observation strings; unknown entities are skipped
    pub fn delete_observations(&mut self, deletions: Vec<ObservationDeletion>) -> MemoryResult<()> {
        let mut graph = self.load()?;
        let now = self.clock.now();

        for deletion in deletions {
            let Some(entity) = graph.entity_mut(&deletion.entity_name) else {
                tracing::debug!(name = %deletion.entity_name, "No such entity, nothing to delete");
                continue;
            };
            entity
                .observations
                .retain(|o| !deletion.observations.contains(o));
            entity.metadata.last_updated = now;
        }

        self.save(&mut graph)
    }

    /// Remove relations matching the exact triple
    pub fn delete_relations(&mut self, relations: Vec<Relation>) -> MemoryResult<()> {
        let mut graph = self.load()?;
        graph.relations.retain(|r| !relations.contains(r));
        self.save(&mut graph)
    }

    /// The whole graph, read-only
    pub fn read_graph(&self) -> MemoryResult<KnowledgeGraph> {
        self.load()
    }

    /// Named entities plus relations among them. Stamps and persists
    /// `lastAccessed` on every returned entity.
    pub fn open_nodes(&mut self, names: Vec<String>) -> MemoryResult<KnowledgeGraph> {
        let mut graph = self.load()?;
        let now = self.clock.now();
        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();

        let mut found = false;
        for entity in graph
            .entities
            .iter_mut()
            .filter(|e| wanted.contains(e.name.as_str()))
        {
            entity.metadata.last_accessed = Some(now);
            found = true;
        }

        if found {
            self.save(&mut graph)?;
        }

        let entities: Vec<Entity> = graph
            .entities
            .iter()
            .filter(|e| wanted.contains(e.name.as_str()))
            .cloned()
            .collect();
        let relations = graph.relations_within(entities.iter().map(|e| e.name.as_str()));

        Ok(KnowledgeGraph {
            metadata: graph.metadata,
            entities,
            relations,
        })
    }

    /// Ranked search, read-only
    pub fn search_nodes(&self, query: &SearchQuery) -> MemoryResult<SearchResults> {
        let graph = self.load()?;
        Ok(search::search(&graph, query))
    }

    /// Accumulated user profile
    pub fn profile(&self) -> MemoryResult<UserProfile> {
        Ok(self.load()?.metadata.user_profile)
    }

    pub fn stats(&self) -> MemoryResult<GraphStats> {
        let graph = self.load()?;

        let mut by_pattern: BTreeMap<String, usize> = [
            ImportancePattern::Preference,
            ImportancePattern::Strengthen,
            ImportancePattern::TimeBased,
            ImportancePattern::SelfManaged,
        ]
        .iter()
        .map(|p| (p.to_string(), 0))
        .collect();

        for entity in &graph.entities {
            *by_pattern
                .entry(entity.metadata.importance_pattern.to_string())
                .or_default() += 1;
        }

        let count = graph.entities.len();
        let mean = |f: fn(&Entity) -> f64| {
            if count == 0 {
                0.0
            } else {
                graph.entities.iter().map(f).sum::<f64>() / count as f64
            }
        };

        Ok(GraphStats {
            entities: count,
            relations: graph.relations.len(),
            observations: graph.entities.iter().map(|e| e.observations.len()).sum(),
            interaction_count: graph.metadata.interaction_count,
            by_pattern,
            user_preferences: graph
                .entities
                .iter()
                .filter(|e| e.metadata.is_user_preference)
                .count(),
            accessibility_flagged: graph
                .entities
                .iter()
                .filter(|e| e.metadata.accessibility_flag)
                .count(),
            mean_resonance: mean(|e| e.metadata.resonance),
            mean_trust: mean(|e| e.metadata.trust),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decay::ManualClock;
    use crate::core::metadata::MetadataInput;
    use chrono::{DateTime, Duration, Utc};
    use tempfile::{tempdir, TempDir};

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-02-10T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn manager() -> (TempDir, Arc<ManualClock>, GraphManager) {
        let dir = tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let storage = Storage::open(dir.path().join("memory.jsonl"));
        let manager = GraphManager::with_clock(storage, clock.clone());
        (dir, clock, manager)
    }

    fn obs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_entities_skips_existing_and_batch_duplicates() {
        let (_dir, _clock, mut mgr) = manager();
        let created = mgr
            .create_entities(vec![
                NewEntity::new("Ferris", "mascot", obs(&["crab", "crab"])),
                NewEntity::new("Ferris", "impostor", obs(&["fake"])),
            ])
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].observations, vec!["crab"]);

        let again = mgr
            .create_entities(vec![NewEntity::new("Ferris", "mascot", obs(&["new"]))])
            .unwrap();
        assert!(again.is_empty());

        let graph = mgr.read_graph().unwrap();
        let ferris = graph.entity("Ferris").unwrap();
        assert_eq!(ferris.entity_type, "mascot");
        assert_eq!(ferris.observations, vec!["crab"]);
    }

    #[test]
    fn test_explicit_metadata_is_validated() {
        let (_dir, clock, mut mgr) = manager();
        let mut input = MetadataInput {
            importance_pattern: Some(ImportancePattern::SelfManaged),
            trust: Some(3.0),
            ..Default::default()
        };

        let mut candidate = NewEntity::new("Pinned", "note", vec![]);
        candidate.metadata = Some(input.clone());
        let created = mgr.create_entities(vec![candidate]).unwrap();
        assert_eq!(created[0].metadata.trust, 1.0);
        assert_eq!(created[0].metadata.importance_pattern, ImportancePattern::SelfManaged);
        assert_eq!(created[0].metadata.created_at, clock.now());
        assert_eq!(created[0].metadata.last_updated, clock.now());

        input.decay_rate = Some(2.0);
        let mut bad = NewEntity::new("Broken", "note", vec![]);
        bad.metadata = Some(input);
        let err = mgr.create_entities(vec![bad]).unwrap_err();
        assert!(matches!(err, MemoryError::Scoring { .. }));
        assert!(!mgr.read_graph().unwrap().contains_entity("Broken"));
    }

    #[test]
    fn test_add_observations_unknown_entity_aborts() {
        let (dir, _clock, mut mgr) = manager();
        mgr.create_entities(vec![NewEntity::new("Known", "note", obs(&["one"]))])
            .unwrap();
        let before = std::fs::read_to_string(dir.path().join("memory.jsonl")).unwrap();

        let err = mgr
            .add_observations(vec![
                ObservationInput {
                    entity_name: "Known".into(),
                    contents: obs(&["two"]),
                },
                ObservationInput {
                    entity_name: "Ghost".into(),
                    contents: obs(&["boo"]),
                },
            ])
            .unwrap_err();
        assert!(matches!(err, MemoryError::EntityNotFound(ref n) if n == "Ghost"));

        let after = std::fs::read_to_string(dir.path().join("memory.jsonl")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_add_observations_dedups_and_bumps_trust() {
        let (_dir, clock, mut mgr) = manager();
        mgr.create_entities(vec![NewEntity::new("Log", "note", obs(&["a"]))])
            .unwrap();
        clock.advance(Duration::minutes(5));

        let results = mgr
            .add_observations(vec![ObservationInput {
                entity_name: "Log".into(),
                contents: obs(&["a", "b", "b"]),
            }])
            .unwrap();
        assert_eq!(results[0].added_observations, vec!["b"]);

        let graph = mgr.read_graph().unwrap();
        let log = graph.entity("Log").unwrap();
        assert_eq!(log.observations, vec!["a", "b"]);
        assert!((log.metadata.trust - 0.51).abs() < 1e-9);
        assert_eq!(log.metadata.last_accessed, Some(clock.now()));

        // nothing new: no trust change
        mgr.add_observations(vec![ObservationInput {
            entity_name: "Log".into(),
            contents: obs(&["a"]),
        }])
        .unwrap();
        let trust = mgr.read_graph().unwrap().entity("Log").unwrap().metadata.trust;
        assert!((trust - 0.51).abs() < 1e-9);
    }

    #[test]
    fn test_delete_entities_cascades_and_warns() {
        let (_dir, _clock, mut mgr) = manager();
        mgr.create_entities(vec![
            NewEntity::new("Dave_Shell", "user_preference", obs(&["Dave uses ZSH"])),
            NewEntity::new("Laptop", "device", vec![]),
            NewEntity::new("Desk", "furniture", vec![]),
        ])
        .unwrap();
        mgr.create_relations(vec![
            Relation::new("Dave_Shell", "runs_on", "Laptop"),
            Relation::new("Laptop", "sits_on", "Desk"),
            Relation::new("Desk", "near", "Dave_Shell"),
        ])
        .unwrap();

        let report = mgr.delete_entities(vec!["Dave_Shell".into()]).unwrap();
        assert_eq!(report.deleted_entities, vec!["Dave_Shell"]);
        assert_eq!(report.deleted_relations, 2);
        assert_eq!(report.warnings.len(), 1);

        let graph = mgr.read_graph().unwrap();
        assert_eq!(graph.relations, vec![Relation::new("Laptop", "sits_on", "Desk")]);
        // inferred traits survive their source
        assert_eq!(graph.metadata.user_profile.preferred_shell.as_deref(), Some("zsh"));
    }

    #[test]
    fn test_delete_observations_and_relations() {
        let (_dir, _clock, mut mgr) = manager();
        mgr.create_entities(vec![NewEntity::new("Todo", "list", obs(&["x", "y"]))])
            .unwrap();
        mgr.create_relations(vec![Relation::new("Todo", "owned_by", "Me")])
            .unwrap();

        mgr.delete_observations(vec![
            ObservationDeletion {
                entity_name: "Todo".into(),
                observations: obs(&["x", "zzz"]),
            },
            ObservationDeletion {
                entity_name: "Nobody".into(),
                observations: obs(&["x"]),
            },
        ])
        .unwrap();
        mgr.delete_relations(vec![Relation::new("Todo", "owned_by", "Me")])
            .unwrap();

        let graph = mgr.read_graph().unwrap();
        let todo = graph.entity("Todo").unwrap();
        assert_eq!(todo.observations, vec!["y"]);
        assert!((todo.metadata.trust - 0.5).abs() < 1e-9);
        assert!(!graph.relations.iter().any(|r| r.from == "Todo"));
    }

    #[test]
    fn test_create_relations_dedups() {
        let (_dir, _clock, mut mgr) = manager();
        let first = mgr
            .create_relations(vec![
                Relation::new("A", "knows", "B"),
                Relation::new("A", "knows", "B"),
            ])
            .unwrap();
        assert_eq!(first.len(), 1);
        let second = mgr
            .create_relations(vec![
                Relation::new("A", "knows", "B"),
                Relation::new("A", "trusts", "B"),
            ])
            .unwrap();
        assert_eq!(second, vec![Relation::new("A", "trusts", "B")]);
    }

    #[test]
    fn test_open_nodes_stamps_last_accessed() {
        let (_dir, clock, mut mgr) = manager();
        mgr.create_entities(vec![
            NewEntity::new("A", "t", vec![]),
            NewEntity::new("B", "t", vec![]),
            NewEntity::new("C", "t", vec![]),
        ])
        .unwrap();
        mgr.create_relations(vec![Relation::new("A", "r", "B"), Relation::new("B", "r", "C")])
            .unwrap();

        clock.advance(Duration::minutes(10));
        let opened = mgr.open_nodes(vec!["A".into(), "B".into(), "Zed".into()]).unwrap();
        assert_eq!(opened.entities.len(), 2);
        assert_eq!(opened.relations, vec![Relation::new("A", "r", "B")]);

        let graph = mgr.read_graph().unwrap();
        assert_eq!(graph.entity("A").unwrap().metadata.last_accessed, Some(clock.now()));
        assert_eq!(graph.entity("C").unwrap().metadata.last_accessed, None);
    }

    #[test]
    fn test_stats() {
        let (_dir, _clock, mut mgr) = manager();
        mgr.create_entities(vec![NewEntity::new("Dave_Shell", "user_preference", obs(&["uses zsh"]))])
            .unwrap();
        let stats = mgr.stats().unwrap();
        // bootstrap pair + Dave
        assert_eq!(stats.entities, 3);
        assert_eq!(stats.relations, 1);
        assert_eq!(stats.by_pattern["preference"], 1);
        assert_eq!(stats.by_pattern["self-managed"], 1);
        assert_eq!(stats.user_preferences, 2);
        assert_eq!(stats.interaction_count, 1);
    }
}
