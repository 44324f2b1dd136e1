//! MCP Server state management

use crate::core::manager::GraphManager;

/// MCP Server state - holds all runtime data
pub struct ServerState {
    /// Graph operations; owns storage and the decay engine
    pub manager: GraphManager,
    /// Whether client has sent `notifications/initialized`
    pub initialized: bool,
}

impl ServerState {
    pub fn new(manager: GraphManager) -> Self {
        Self {
            manager,
            initialized: false,
        }
    }
}
