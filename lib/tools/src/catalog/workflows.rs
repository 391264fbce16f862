use super::{CallContext, no_handler, str_arg};
use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::GatewayError;
use magnolia_gateway::resources::StartWorkflowRequest;
use serde_json::{Map, Value as JsonValue, json};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolFamily::Workflows,
            "workflow_start",
            "Start a multi-step workflow such as due diligence or site selection for a deal.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["workflow_name", "deal_id"],
            "properties": {
                "workflow_name": {
                    "type": "string",
                    "enum": ["due_diligence", "site_selection", "portfolio_review"]
                },
                "deal_id": { "type": "string" },
                "params": { "type": "object", "description": "Workflow-specific parameters" }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Workflows,
            "workflow_status",
            "Check progress and step results of a workflow run.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["run_id"],
            "properties": {
                "run_id": { "type": "string" }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Workflows,
            "workflow_cancel",
            "Cancel a running workflow.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["run_id"],
            "properties": {
                "run_id": { "type": "string" }
            }
        })),
    ]
}

pub(super) async fn call(
    ctx: &CallContext<'_>,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue, GatewayError> {
    let workflows = ctx.client.workflows();
    match name {
        "workflow_start" => {
            let request = StartWorkflowRequest {
                workflow_name: str_arg(args, "workflow_name").to_string(),
                deal_id: str_arg(args, "deal_id").to_string(),
                params: args
                    .get("params")
                    .and_then(JsonValue::as_object)
                    .cloned()
                    .unwrap_or_default(),
                conversation_id: ctx.conversation_id.map(str::to_string),
            };
            workflows.start(&request).await
        }
        "workflow_status" => workflows.status(str_arg(args, "run_id")).await,
        "workflow_cancel" => workflows.cancel(str_arg(args, "run_id")).await,
        _ => Err(no_handler(name)),
    }
}
