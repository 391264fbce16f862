//! Core types shared across the Magnolia tool gateway.
//!
//! This crate provides the error-handling foundation and the identifiers
//! that every other crate in the workspace agrees on.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::ConversationId;
