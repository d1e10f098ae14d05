//! Domains module containing business logic organized by bounded contexts.
//!
//! The server exposes a single capability, tools, backed by three upstream
//! platforms.

pub mod tools;
