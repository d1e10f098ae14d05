//! Tools domain module.
//!
//! Tools are the operations MCP clients can call. Each one forwards
//! validated arguments to the wiki, blog or scheduler API and returns the
//! upstream JSON.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, one submodule per platform
//! - `handlers.rs` - The [`Tool`] contract and result envelope
//! - `registry.rs` - Flat name → handler table built at startup
//! - `dispatcher.rs` - Resolves and runs a tool, wraps the outcome
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Implement [`Tool`] for a new struct in the platform's `definitions/`
//!    submodule, with a `Params` struct deriving `Deserialize` and
//!    `JsonSchema` and implementing [`Validate`]
//! 2. Add `handler(MyTool)` to that platform's `tool_set()`

pub mod definitions;
mod dispatcher;
mod error;
mod handlers;
mod registry;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, RegistryError, ToolError, ToolResult};
pub use handlers::{
    NoParams, TextContent, Tool, ToolDefinition, ToolEnvelope, ToolHandler, TypedTool, Validate,
    handler,
};
pub use registry::ToolRegistry;
