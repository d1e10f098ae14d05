//! Postiz social post scheduler tools.
//!
//! All calls go to the configured Postiz API base URL with the shared API
//! key, except `login`, which authenticates with user credentials instead.

mod create_post;
mod get_integrations;
mod get_posts;
mod get_self;
mod login;

use std::sync::Arc;

pub use create_post::{CreatePostParams, CreatePostTool, PostType};
pub use get_integrations::GetIntegrationsTool;
pub use get_posts::{CalendarView, GetPostsParams, GetPostsTool};
pub use get_self::GetSelfTool;
pub use login::{LoginParams, LoginTool};

use crate::domains::tools::handlers::{ToolHandler, handler};

/// Posts endpoint of the public API.
const POSTS_PATH: &str = "/public/v1/posts";

/// Scheduler tools in registration order.
pub fn tool_set() -> Vec<Arc<dyn ToolHandler>> {
    vec![
        handler(CreatePostTool),
        handler(GetPostsTool),
        handler(GetIntegrationsTool),
        handler(GetSelfTool),
        handler(LoginTool),
    ]
}
