//! HTTP routes.

pub mod health;
pub mod mcp;
pub mod session;
