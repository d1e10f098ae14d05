//! Tool definitions module.
//!
//! One submodule per upstream platform. Each exposes a `tool_set()` that
//! the registry concatenates into the server's tool namespace.

pub mod blog;
pub mod scheduler;
pub mod wiki;
