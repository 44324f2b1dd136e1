//! Storage - JSON Lines backend
//!
//! One self-describing record per line, tagged by `type`:
//! `metadata`, `entity` or `relation`.
//!
//! # Key Points
//! - Load tolerates malformed lines: they are skipped with a warning
//! - A missing store yields the bootstrap graph instead of an error
//! - Save runs the decay engine, then rewrites the whole file atomically
//!   (temp file + rename); there is no partial-update path

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decay::{DecayEngine, DecayReport};
use super::error::StorageError;
use super::graph::{dedup_observations, Entity, GraphMetadata, KnowledgeGraph, Relation};
use super::locale::{self, BASE_LOCALE};
use super::metadata::{infer_metadata, Metadata};

/// A line as read from disk
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StoreRecord {
    Metadata(GraphMetadata),
    Entity(StoredEntity),
    Relation(Relation),
}

/// Entity as persisted; older stores may carry entities without metadata
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntity {
    name: String,
    entity_type: String,
    #[serde(default)]
    observations: Vec<String>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

/// A line as written to disk
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RecordRef<'a> {
    Metadata(&'a GraphMetadata),
    Entity(&'a Entity),
    Relation(&'a Relation),
}

impl RecordRef<'_> {
    fn kind(&self) -> &'static str {
        match self {
            RecordRef::Metadata(_) => "metadata",
            RecordRef::Entity(_) => "entity",
            RecordRef::Relation(_) => "relation",
        }
    }
}

/// What a parse pass recovered from
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub malformed: usize,
    pub duplicate_entities: usize,
    pub inferred_metadata: usize,
    /// Entities whose observation list held repeats
    pub repeated_observations: usize,
}

/// JSONL record store
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
    locale: String,
}

impl Storage {
    /// Store at `path`, bootstrapping in the base locale
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_locale(path, BASE_LOCALE)
    }

    pub fn with_locale(path: impl Into<PathBuf>, locale: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            locale: locale.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the full graph
    pub fn load(&self, now: DateTime<Utc>) -> Result<KnowledgeGraph, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), locale = %self.locale, "No memory store yet, using bootstrap graph");
                return Ok(locale::bootstrap_graph(&self.locale, now));
            }
            Err(source) => {
                return Err(StorageError::Load {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let (graph, report) = parse_records(&content, now);
        if report.malformed > 0 {
            tracing::warn!(
                path = %self.path.display(),
                skipped = report.malformed,
                "Memory store contained malformed records"
            );
        }
        if report.repeated_observations > 0 {
            tracing::warn!(
                path = %self.path.display(),
                entities = report.repeated_observations,
                "Dropped repeated observations from memory store"
            );
        }
        Ok(graph)
    }

    /// Decay, count the interaction, then rewrite the store.
    ///
    /// A failed write leaves the decay interval guard where it was.
    pub fn save(
        &self,
        graph: &mut KnowledgeGraph,
        decay: &mut DecayEngine,
    ) -> Result<DecayReport, StorageError> {
        let previous = decay.last_run();
        let report = decay.run(graph);
        graph.metadata.record_interaction(report.at);
        if let Err(e) = self.write(graph) {
            decay.rewind(previous);
            return Err(e);
        }
        Ok(report)
    }

    /// Atomically replace the store with `graph`, no decay
    pub fn write(&self, graph: &KnowledgeGraph) -> Result<(), StorageError> {
        let content = encode_records(graph)?;

        let save_err = |source| StorageError::Save {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(save_err)?;
        }

        let tmp_path = temp_path(&self.path);
        let result = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(save_err(e));
        }

        tracing::debug!(
            path = %self.path.display(),
            entities = graph.entities.len(),
            relations = graph.relations.len(),
            "Memory store saved"
        );
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Serialize metadata, entities, relations - in that order
pub fn encode_records(graph: &KnowledgeGraph) -> Result<String, StorageError> {
    let records = std::iter::once(RecordRef::Metadata(&graph.metadata))
        .chain(graph.entities.iter().map(RecordRef::Entity))
        .chain(graph.relations.iter().map(RecordRef::Relation));

    let mut out = String::new();
    for record in records {
        let line = serde_json::to_string(&record).map_err(|source| StorageError::Encode {
            kind: record.kind(),
            source,
        })?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Parse store content, skipping anything unusable
pub fn parse_records(content: &str, now: DateTime<Utc>) -> (KnowledgeGraph, LoadReport) {
    let mut report = LoadReport::default();
    let mut metadata: Option<GraphMetadata> = None;
    let mut graph = KnowledgeGraph::empty(now);

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: StoreRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                report.malformed += 1;
                tracing::warn!(line = idx + 1, error = %e, "Skipping malformed memory record");
                continue;
            }
        };

        match record {
            StoreRecord::Metadata(meta) => {
                if metadata.is_some() {
                    tracing::warn!(line = idx + 1, "Ignoring extra metadata record");
                } else {
                    metadata = Some(meta);
                }
            }
            StoreRecord::Entity(candidate) => {
                if graph.contains_entity(&candidate.name) {
                    report.duplicate_entities += 1;
                    tracing::warn!(line = idx + 1, name = %candidate.name, "Ignoring duplicate entity record");
                    continue;
                }
                let mut entity_meta = match candidate.metadata {
                    Some(meta) => meta,
                    None => {
                        report.inferred_metadata += 1;
                        infer_metadata(
                            &candidate.name,
                            &candidate.entity_type,
                            &candidate.observations,
                            now,
                        )
                    }
                };
                entity_meta.clamp();
                let count = candidate.observations.len();
                let observations = dedup_observations(candidate.observations);
                if observations.len() != count {
                    report.repeated_observations += 1;
                    tracing::warn!(line = idx + 1, name = %candidate.name, "Dropping repeated observations");
                }
                graph.entities.push(Entity {
                    name: candidate.name,
                    entity_type: candidate.entity_type,
                    observations,
                    metadata: entity_meta,
                });
            }
            StoreRecord::Relation(relation) => {
                if !graph.contains_relation(&relation) {
                    graph.relations.push(relation);
                }
            }
        }
    }

    if let Some(meta) = metadata {
        graph.metadata = meta;
    }
    (graph, report)
}
