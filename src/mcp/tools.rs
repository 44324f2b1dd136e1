//! MCP Tool argument structs and schemas
//!
//! Arguments are deserialized straight into these structs, which is all
//! the structural validation a call gets before reaching the core.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::graph::{NewEntity, Relation};
use crate::core::manager::{ObservationDeletion, ObservationInput};

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateEntitiesTool {
    pub entities: Vec<NewEntity>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateRelationsTool {
    pub relations: Vec<Relation>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AddObservationsTool {
    pub observations: Vec<ObservationInput>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntitiesTool {
    pub entity_names: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteObservationsTool {
    pub deletions: Vec<ObservationDeletion>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteRelationsTool {
    pub relations: Vec<Relation>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchNodesTool {
    /// Case-insensitive substring
    pub query: String,
    /// Optional cap on ranked results
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OpenNodesTool {
    pub names: Vec<String>,
}

fn relation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "from": { "type": "string", "description": "Name of the entity where the relation starts" },
            "to": { "type": "string", "description": "Name of the entity where the relation ends" },
            "relationType": { "type": "string", "description": "Relation label, in active voice" }
        },
        "required": ["from", "to", "relationType"]
    })
}

/// Tool list returned from `tools/list`
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": "create_entities",
            "description": "Create new entities in the knowledge graph. Names that already exist are skipped. Emotional metadata (trust, resonance, importance pattern) is inferred from the content unless given.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "entities": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string", "description": "Unique entity name" },
                                "entityType": { "type": "string", "description": "Type label" },
                                "observations": { "type": "array", "items": { "type": "string" } },
                                "metadata": {
                                    "type": "object",
                                    "description": "Optional overrides; unset fields keep their inferred values",
                                    "properties": {
                                        "trust": { "type": "number", "minimum": 0, "maximum": 1 },
                                        "resonance": { "type": "number", "minimum": 0, "maximum": 1 },
                                        "importancePattern": {
                                            "type": "string",
                                            "enum": ["preference", "strengthen", "time-based", "self-managed"]
                                        },
                                        "isUserPreference": { "type": "boolean" },
                                        "accessibilityFlag": { "type": "boolean" },
                                        "decayRate": { "type": "number", "exclusiveMinimum": 0, "maximum": 1 }
                                    }
                                }
                            },
                            "required": ["name", "entityType", "observations"]
                        }
                    }
                },
                "required": ["entities"]
            }
        },
        {
            "name": "create_relations",
            "description": "Create directed relations between entities. Existing (from, to, relationType) triples are skipped.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "relations": { "type": "array", "items": relation_schema() }
                },
                "required": ["relations"]
            }
        },
        {
            "name": "add_observations",
            "description": "Append observations to existing entities. Fails if any entity does not exist. Adding new observations raises the entity's trust.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "observations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "entityName": { "type": "string" },
                                "contents": { "type": "array", "items": { "type": "string" } }
                            },
                            "required": ["entityName", "contents"]
                        }
                    }
                },
                "required": ["observations"]
            }
        },
        {
            "name": "delete_entities",
            "description": "Delete entities and every relation that touches them. Deleting a user preference succeeds with a warning.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "entityNames": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["entityNames"]
            }
        },
        {
            "name": "delete_observations",
            "description": "Delete specific observations from entities.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "deletions": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "entityName": { "type": "string" },
                                "observations": { "type": "array", "items": { "type": "string" } }
                            },
                            "required": ["entityName", "observations"]
                        }
                    }
                },
                "required": ["deletions"]
            }
        },
        {
            "name": "delete_relations",
            "description": "Delete relations matching the exact (from, to, relationType) triple.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "relations": { "type": "array", "items": relation_schema() }
                },
                "required": ["relations"]
            }
        },
        {
            "name": "read_graph",
            "description": "Read the entire knowledge graph.",
            "inputSchema": { "type": "object", "properties": {} }
        },
        {
            "name": "search_nodes",
            "description": "Search entities by name, type and observations. Results are ranked using resonance, trust and preference flags.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Case-insensitive substring" },
                    "limit": { "type": "integer", "description": "Max results" }
                },
                "required": ["query"]
            }
        },
        {
            "name": "open_nodes",
            "description": "Open entities by name, with the relations between them. Marks them as accessed.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "names": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["names"]
            }
        },
        {
            "name": "read_profile",
            "description": "Read the user profile inferred from stored entities (shell, accessibility needs, communication preferences).",
            "inputSchema": { "type": "object", "properties": {} }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tool_has_schema() {
        let tools = tool_definitions();
        let tools = tools.as_array().unwrap();
        assert_eq!(tools.len(), 10);
        for tool in tools {
            assert!(tool["name"].is_string());
            assert_eq!(tool["inputSchema"]["type"], "object");
        }
    }

    #[test]
    fn test_camel_case_arguments() {
        let args: AddObservationsTool = serde_json::from_value(json!({
            "observations": [{ "entityName": "Dave", "contents": ["likes tea"] }]
        }))
        .unwrap();
        assert_eq!(args.observations[0].entity_name, "Dave");

        let args: DeleteEntitiesTool =
            serde_json::from_value(json!({ "entityNames": ["A", "B"] })).unwrap();
        assert_eq!(args.entity_names.len(), 2);
    }
}
