//! Error types for the tools crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ToolError`: Failures of a single tool invocation, tagged with the tool

use magnolia_gateway::GatewayError;
use std::fmt;

/// Errors from tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolError {
    /// No tool with this name exists.
    UnknownTool { name: String },
    /// The arguments do not match the tool's schema.
    InvalidArguments { tool: String, reason: String },
    /// The gateway call behind the tool failed.
    Gateway { tool: String, error: GatewayError },
}

impl ToolError {
    /// Returns the tool the error belongs to.
    #[must_use]
    pub fn tool(&self) -> &str {
        match self {
            Self::UnknownTool { name } => name,
            Self::InvalidArguments { tool, .. } | Self::Gateway { tool, .. } => tool,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::UnknownTool { .. } => "UNKNOWN_TOOL",
            Self::InvalidArguments { .. } => "INVALID_ARGUMENTS",
            Self::Gateway { error, .. } => error.code(),
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UnknownTool { name } => format!("unknown tool: {name}"),
            Self::InvalidArguments { reason, .. } => format!("invalid arguments: {reason}"),
            Self::Gateway { error, .. } => error.message(),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.tool(), self.code(), self.message())
    }
}

impl std::error::Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_keep_their_code() {
        let err = ToolError::Gateway {
            tool: "deal_create".to_string(),
            error: GatewayError::from_json_body(
                422,
                &serde_json::json!({"code": "VALIDATION", "message": "name too short"}),
            ),
        };
        assert_eq!(err.code(), "VALIDATION");
        assert_eq!(err.message(), "name too short");
        assert_eq!(err.to_string(), "[deal_create] VALIDATION: name too short");
    }

    #[test]
    fn unknown_tool_display() {
        let err = ToolError::UnknownTool {
            name: "render_map".to_string(),
        };
        assert_eq!(err.tool(), "render_map");
        assert!(err.to_string().contains("UNKNOWN_TOOL"));
    }
}
