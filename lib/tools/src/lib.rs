//! Tool catalog and dispatch for the Magnolia tool gateway.
//!
//! This crate provides:
//!
//! - **Catalog**: Named tools with JSON-schema argument declarations,
//!   grouped by resource family
//! - **Validation**: Argument checking with schema defaults
//! - **Dispatch**: Routing validated calls to gateway sub-clients, with
//!   context recovery from and history recording to a session
//! - **Responses**: Host-facing success and error results

mod catalog;
pub mod definition;
pub mod dispatch;
pub mod error;
pub mod response;
pub mod schema;

pub use definition::{ToolDefinition, ToolFamily, ToolRegistry};
pub use dispatch::{MAX_SUMMARY_CHARS, ToolDispatcher};
pub use error::ToolError;
pub use response::{ToolContent, ToolResponse};
pub use schema::{SchemaViolation, validate};
