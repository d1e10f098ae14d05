//! Generic create/read/update/delete/list tools over [`WikiEntity`].

use std::borrow::Cow;
use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::WikiEntity;
use crate::core::client::{ApiClient, Platform};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{Tool, Validate};

/// Largest page size BookStack serves.
pub const MAX_LIST_COUNT: u32 = 500;

fn check_id(id: u64) -> ToolResult<()> {
    if id == 0 {
        return Err(ToolError::invalid_arguments("id must be a positive integer"));
    }
    Ok(())
}

fn item_path<E: WikiEntity>(id: u64) -> String {
    format!("{}/{}", E::ENDPOINT, id)
}

/// Parameters addressing one item.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EntityId {
    #[schemars(description = "ID of the item", range(min = 1))]
    pub id: u64,
}

impl Validate for EntityId {
    fn validate(&self) -> ToolResult<()> {
        check_id(self.id)
    }
}

/// Parameters for an update: the target id plus the fields to change.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateParams<P> {
    #[schemars(description = "ID of the item to update", range(min = 1))]
    pub id: u64,

    #[serde(flatten)]
    pub changes: P,
}

impl<P: Serialize + Validate> Validate for UpdateParams<P> {
    fn validate(&self) -> ToolResult<()> {
        check_id(self.id)?;
        let changes = serde_json::to_value(&self.changes)
            .map_err(|e| ToolError::internal(format!("failed to encode changes: {}", e)))?;
        if changes.as_object().is_none_or(|fields| fields.is_empty()) {
            return Err(ToolError::invalid_arguments(
                "at least one field to update is required",
            ));
        }
        self.changes.validate()
    }
}

/// Pagination and ordering for list calls.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListParams {
    #[schemars(description = "Number of items to return (1-500)", range(min = 1, max = 500))]
    #[serde(default)]
    pub count: Option<u32>,

    #[schemars(description = "Number of items to skip")]
    #[serde(default)]
    pub offset: Option<u32>,

    #[schemars(description = "Field to sort by, prefixed with + or - (e.g. \"-updated_at\")")]
    #[serde(default)]
    pub sort: Option<String>,
}

impl Validate for ListParams {
    fn validate(&self) -> ToolResult<()> {
        if let Some(count) = self.count {
            if !(1..=MAX_LIST_COUNT).contains(&count) {
                return Err(ToolError::invalid_arguments(format!(
                    "count must be between 1 and {}",
                    MAX_LIST_COUNT
                )));
            }
        }
        Ok(())
    }
}

impl ListParams {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(count) = self.count {
            query.push(("count", count.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort", sort.clone()));
        }
        query
    }
}

// ============================================================================
// Tools
// ============================================================================

pub struct CreateEntity<E>(PhantomData<fn() -> E>);
pub struct ReadEntity<E>(PhantomData<fn() -> E>);
pub struct UpdateEntity<E>(PhantomData<fn() -> E>);
pub struct DeleteEntity<E>(PhantomData<fn() -> E>);
pub struct ListEntities<E>(PhantomData<fn() -> E>);

impl<E: WikiEntity> CreateEntity<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: WikiEntity> ReadEntity<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: WikiEntity> UpdateEntity<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: WikiEntity> DeleteEntity<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: WikiEntity> ListEntities<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

#[async_trait]
impl<E: WikiEntity> Tool for CreateEntity<E> {
    type Params = E::Draft;
    const NAME: &'static str = E::CREATE_TOOL;

    fn description(&self) -> Cow<'static, str> {
        format!("Create a new {} in BookStack.{}", E::NOUN, E::NOTES).into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        format!("Error creating {}", E::NOUN).into()
    }

    #[instrument(skip_all, fields(entity = E::NOUN))]
    async fn call(&self, client: &ApiClient, params: E::Draft) -> ToolResult<Value> {
        let request = client
            .request(Platform::Wiki, Method::POST, E::ENDPOINT)?
            .json(&params);
        let created = client.send(request).await?;
        info!(id = ?created.get("id"), "Created {}", E::NOUN);
        Ok(created)
    }
}

#[async_trait]
impl<E: WikiEntity> Tool for ReadEntity<E> {
    type Params = EntityId;
    const NAME: &'static str = E::READ_TOOL;

    fn description(&self) -> Cow<'static, str> {
        format!("Get a {} from BookStack by ID, including its details.", E::NOUN).into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        format!("Error reading {}", E::NOUN).into()
    }

    async fn call(&self, client: &ApiClient, params: EntityId) -> ToolResult<Value> {
        let request = client.request(Platform::Wiki, Method::GET, &item_path::<E>(params.id))?;
        Ok(client.send(request).await?)
    }
}

#[async_trait]
impl<E: WikiEntity> Tool for UpdateEntity<E> {
    type Params = UpdateParams<E::Patch>;
    const NAME: &'static str = E::UPDATE_TOOL;

    fn description(&self) -> Cow<'static, str> {
        format!(
            "Update an existing {} in BookStack. Only the provided fields change.{}",
            E::NOUN,
            E::NOTES
        )
        .into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        format!("Error updating {}", E::NOUN).into()
    }

    #[instrument(skip_all, fields(entity = E::NOUN, id = params.id))]
    async fn call(&self, client: &ApiClient, params: UpdateParams<E::Patch>) -> ToolResult<Value> {
        let request = client
            .request(Platform::Wiki, Method::PUT, &item_path::<E>(params.id))?
            .json(&params.changes);
        let updated = client.send(request).await?;
        info!("Updated {}", E::NOUN);
        Ok(updated)
    }
}

#[async_trait]
impl<E: WikiEntity> Tool for DeleteEntity<E> {
    type Params = EntityId;
    const NAME: &'static str = E::DELETE_TOOL;

    fn description(&self) -> Cow<'static, str> {
        format!("Delete a {} from BookStack by ID.", E::NOUN).into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        format!("Error deleting {}", E::NOUN).into()
    }

    #[instrument(skip_all, fields(entity = E::NOUN, id = params.id))]
    async fn call(&self, client: &ApiClient, params: EntityId) -> ToolResult<Value> {
        let request = client.request(Platform::Wiki, Method::DELETE, &item_path::<E>(params.id))?;
        let response = client.send(request).await?;
        info!("Deleted {}", E::NOUN);
        // BookStack answers 204 with no body.
        if response.is_null() {
            return Ok(json!({ "deleted": true, "id": params.id }));
        }
        Ok(response)
    }
}

#[async_trait]
impl<E: WikiEntity> Tool for ListEntities<E> {
    type Params = ListParams;
    const NAME: &'static str = E::LIST_TOOL;

    fn description(&self) -> Cow<'static, str> {
        format!(
            "List {} in BookStack with optional pagination (count, offset) and sorting.",
            E::PLURAL
        )
        .into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        format!("Error listing {}", E::PLURAL).into()
    }

    async fn call(&self, client: &ApiClient, params: ListParams) -> ToolResult<Value> {
        let request = client
            .request(Platform::Wiki, Method::GET, E::ENDPOINT)?
            .query(&params.query());
        Ok(client.send(request).await?)
    }
}
