//! Ghost blog tools (Admin API).

mod list_posts;

use std::sync::Arc;

pub use list_posts::{GhostPostStatus, ListGhostPostsParams, ListGhostPostsTool};

use crate::domains::tools::handlers::{ToolHandler, handler};

/// Blog tools in registration order.
pub fn tool_set() -> Vec<Arc<dyn ToolHandler>> {
    vec![handler(ListGhostPostsTool::default())]
}
