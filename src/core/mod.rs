//! Core module - Business logic
//!
//! Graph model, emotional metadata, decay, persistence and search.

pub mod decay;
pub mod error;
pub mod graph;
pub mod locale;
pub mod manager;
pub mod metadata;
pub mod profile;
pub mod search;
pub mod storage;

pub use decay::{Clock, DecayEngine, ManualClock, SystemClock};
pub use error::{ErrorCategory, MemoryError, MemoryResult, StorageError};
pub use graph::{Entity, KnowledgeGraph, NewEntity, Relation, UserProfile};
pub use manager::GraphManager;
pub use metadata::{ImportancePattern, Metadata, MetadataInput};
pub use storage::Storage;
