//! BookStack wiki tools.
//!
//! Books, bookshelves, chapters and pages share one CRUD shape, so the tools
//! are generic over [`WikiEntity`]; each entity only declares its endpoint,
//! names and the fields it accepts.

mod crud;
mod entities;

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub use crud::{
    CreateEntity, DeleteEntity, EntityId, ListEntities, ListParams, ReadEntity, UpdateEntity,
    UpdateParams,
};
pub use entities::{
    Book, BookDraft, BookPatch, Bookshelf, BookshelfDraft, BookshelfPatch, Chapter, ChapterDraft,
    ChapterPatch, Page, PageDraft, PagePatch,
};

use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{ToolHandler, Validate, handler};

/// Longest name BookStack stores.
pub const MAX_NAME_CHARS: usize = 255;

/// A BookStack content type reachable under `/api/<collection>`.
pub trait WikiEntity: Send + Sync + 'static {
    /// Collection endpoint, e.g. `/api/books`.
    const ENDPOINT: &'static str;
    /// Singular noun used in descriptions and errors.
    const NOUN: &'static str;
    /// Plural noun.
    const PLURAL: &'static str;

    const CREATE_TOOL: &'static str;
    const READ_TOOL: &'static str;
    const UPDATE_TOOL: &'static str;
    const DELETE_TOOL: &'static str;
    const LIST_TOOL: &'static str;

    /// Extra guidance appended to the create and update descriptions.
    const NOTES: &'static str = "";

    /// Fields accepted on creation.
    type Draft: DeserializeOwned + Serialize + JsonSchema + Validate + Send + Sync + 'static;
    /// Fields accepted on update, all optional.
    type Patch: DeserializeOwned + Serialize + JsonSchema + Validate + Send + Sync + 'static;
}

/// A name/value tag attached to wiki content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Tag {
    #[schemars(description = "Tag name")]
    pub name: String,

    #[schemars(description = "Optional tag value")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Enforce BookStack's name rules.
pub fn validate_name(name: &str) -> ToolResult<()> {
    if name.trim().is_empty() {
        return Err(ToolError::invalid_arguments("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ToolError::invalid_arguments(format!(
            "name must be at most {} characters",
            MAX_NAME_CHARS
        )));
    }
    Ok(())
}

fn entity_tools<E: WikiEntity>() -> Vec<Arc<dyn ToolHandler>> {
    vec![
        handler(CreateEntity::<E>::new()),
        handler(ReadEntity::<E>::new()),
        handler(UpdateEntity::<E>::new()),
        handler(DeleteEntity::<E>::new()),
        handler(ListEntities::<E>::new()),
    ]
}

/// Wiki tools in registration order.
pub fn tool_set() -> Vec<Arc<dyn ToolHandler>> {
    let mut tools = entity_tools::<Book>();
    tools.extend(entity_tools::<Bookshelf>());
    tools.extend(entity_tools::<Chapter>());
    tools.extend(entity_tools::<Page>());
    tools
}
