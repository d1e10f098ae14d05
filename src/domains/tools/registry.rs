//! Tool Registry - the flat namespace of every tool the server exposes.
//!
//! The registry is built once at startup from the per-platform tool sets
//! and never mutated afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::definitions::{blog, scheduler, wiki};
use super::error::RegistryError;
use super::handlers::{ToolDefinition, ToolHandler};

/// Name-indexed set of tool handlers, in registration order.
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
    index: HashMap<&'static str, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

impl ToolRegistry {
    /// Register handlers, rejecting duplicate names.
    pub fn new(handlers: Vec<Arc<dyn ToolHandler>>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(handlers.len());
        for (position, handler) in handlers.iter().enumerate() {
            let name = handler.definition().name;
            if index.insert(name, position).is_some() {
                return Err(RegistryError::DuplicateTool(name.to_string()));
            }
        }
        debug!(count = handlers.len(), "Tool registry built");
        Ok(Self { handlers, index })
    }

    /// Registry of all built-in tools: wiki, then blog, then scheduler.
    pub fn with_builtin_tools() -> Result<Self, RegistryError> {
        let handlers = wiki::tool_set()
            .into_iter()
            .chain(blog::tool_set())
            .chain(scheduler::tool_set())
            .collect();
        Self::new(handlers)
    }

    /// Tool definitions in registration order.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.handlers.iter().map(|h| h.definition()).collect()
    }

    /// All tool names in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.definition().name).collect()
    }

    /// Look up a handler by tool name.
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.index.get(name).map(|&position| &self.handlers[position])
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::handlers::handler;
    use crate::domains::tools::definitions::scheduler::GetIntegrationsTool;

    const EXPECTED: &[&str] = &[
        "create_book",
        "read_book",
        "update_book",
        "delete_book",
        "list_books",
        "create_bookshelf",
        "read_bookshelf",
        "update_bookshelf",
        "delete_bookshelf",
        "list_bookshelves",
        "create_chapter",
        "read_chapter",
        "update_chapter",
        "delete_chapter",
        "list_chapters",
        "create_page",
        "read_page",
        "update_page",
        "delete_page",
        "list_pages",
        "list_ghost_posts",
        "create_post",
        "get_posts",
        "get_integrations",
        "get_self",
        "login",
    ];

    #[test]
    fn test_builtin_tool_names_in_order() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        assert_eq!(registry.tool_names(), EXPECTED);
        assert_eq!(registry.len(), EXPECTED.len());
    }

    #[test]
    fn test_every_listed_tool_resolves_to_its_handler() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        for definition in registry.list() {
            let handler = registry.resolve(definition.name).unwrap();
            assert_eq!(handler.definition().name, definition.name);
            assert_eq!(
                definition.input_schema.get("type").and_then(|t| t.as_str()),
                Some("object"),
                "schema of {} is not an object",
                definition.name
            );
        }
        assert!(registry.resolve("no_such_tool").is_none());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let err = ToolRegistry::new(vec![
            handler(GetIntegrationsTool),
            handler(GetIntegrationsTool),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTool(name) if name == "get_integrations"));
    }
}
