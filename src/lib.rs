//! resonance - knowledge graph memory with emotional scoring
//!
//! A persistent graph of named entities and relations. Each entity carries
//! a small scoring model that decides how it decays, strengthens, and ranks
//! in search.
//!
//! ## Key Concepts
//!
//! - **Entities & relations**: name-unique nodes with observations, typed edges
//! - **Emotional metadata**: trust, resonance and an importance pattern
//! - **Decay on save**: scores evolve each time the graph is persisted
//! - **Profile inference**: user traits accumulate from what gets stored
//! - **Full rewrite**: every operation loads and rewrites one JSONL file

pub mod cli;
pub mod config;
pub mod core;
pub mod mcp;

pub use core::graph::{Entity, KnowledgeGraph, NewEntity, Relation};
pub use core::manager::GraphManager;
pub use core::storage::Storage;
pub use mcp::run_mcp_server;
