//! Host-facing tool results.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

/// A content block of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolContent {
    /// Plain text.
    Text { text: String },
}

/// Result of a tool invocation as returned to the host.
///
/// Failures are results too: the host gets `isError` and a readable
/// message instead of a protocol error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    /// Content blocks.
    pub content: Vec<ToolContent>,
    /// Machine-readable payload of a successful call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<JsonValue>,
    /// Whether the call failed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResponse {
    /// Creates a successful result carrying `payload`.
    ///
    /// Non-object payloads are wrapped as `{ "result": payload }` in the
    /// structured content.
    #[must_use]
    pub fn success(payload: JsonValue) -> Self {
        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        let structured = if payload.is_object() {
            payload
        } else {
            json!({ "result": payload })
        };
        Self {
            content: vec![ToolContent::Text { text }],
            structured_content: Some(structured),
            is_error: false,
        }
    }

    /// Creates a failed result for `error`.
    #[must_use]
    pub fn failure(error: &ToolError) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: format!(
                    "[{}] Error: {}: {}",
                    error.tool(),
                    error.code(),
                    error.message()
                ),
            }],
            structured_content: None,
            is_error: true,
        }
    }

    /// Returns the text of the first content block.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.content.first().map(|block| match block {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnolia_gateway::GatewayError;

    #[test]
    fn success_carries_pretty_text_and_structure() {
        let response = ToolResponse::success(json!({"deal_id": "D1"}));
        let value = serde_json::to_value(&response).expect("serializes");

        assert_eq!(value["content"][0]["type"], "text");
        assert!(value["content"][0]["text"].as_str().expect("text").contains("\"deal_id\""));
        assert_eq!(value["structuredContent"], json!({"deal_id": "D1"}));
        assert!(value.get("isError").is_none());
    }

    #[test]
    fn arrays_are_wrapped_for_structured_content() {
        let response = ToolResponse::success(json!([1, 2]));
        assert_eq!(response.structured_content, Some(json!({"result": [1, 2]})));
    }

    #[test]
    fn failure_is_flagged_and_readable() {
        let err = ToolError::Gateway {
            tool: "deal_get".to_string(),
            error: GatewayError::from_json_body(404, &json!({"code": "NOT_FOUND", "detail": "no deal"})),
        };
        let response = ToolResponse::failure(&err);
        let value = serde_json::to_value(&response).expect("serializes");

        assert_eq!(value["isError"], true);
        assert_eq!(response.text(), Some("[deal_get] Error: NOT_FOUND: no deal"));
    }
}
