use super::{CallContext, no_handler, opt_str_arg, str_arg};
use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::GatewayError;
use magnolia_gateway::resources::{AgentInvokeRequest, AgentName};
use serde_json::{Map, Value as JsonValue, json};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolFamily::Deals,
            "deal_list",
            "List deals in the pipeline, filtered by status and type.",
        )
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "enum": ["active", "closed", "dead", "all"],
                    "default": "active"
                },
                "deal_type": { "type": "string" },
                "limit": { "type": "integer", "default": 20 },
                "offset": { "type": "integer", "default": 0 }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Deals,
            "deal_get",
            "Get full details for a deal including parcels, documents, and status history.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["deal_id"],
            "properties": {
                "deal_id": { "type": "string" }
            }
        })),
        ToolDefinition::new(ToolFamily::Deals, "deal_create", "Create a new deal.")
            .with_input_schema(json!({
                "type": "object",
                "required": ["name", "deal_type"],
                "properties": {
                    "name": { "type": "string" },
                    "deal_type": {
                        "type": "string",
                        "enum": [
                            "acquisition",
                            "disposition",
                            "development",
                            "joint_venture",
                            "debt",
                            "other"
                        ]
                    },
                    "parcel_ids": { "type": "array", "items": { "type": "string" } },
                    "ask_price": { "type": "number" },
                    "target_close_date": { "type": "string", "description": "ISO 8601 date" },
                    "notes": { "type": "string" }
                }
            })),
        ToolDefinition::new(
            ToolFamily::Deals,
            "deal_update",
            "Update deal fields such as status, pricing, dates, or notes.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["deal_id"],
            "properties": {
                "deal_id": { "type": "string" },
                "status": { "type": "string" },
                "ask_price": { "type": "number" },
                "offer_price": { "type": "number" },
                "target_close_date": { "type": "string" },
                "notes": { "type": "string" },
                "assignee": { "type": "string" }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Deals,
            "deal_add_document",
            "Attach a stored document to a deal.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["deal_id", "document_id"],
            "properties": {
                "deal_id": { "type": "string" },
                "document_id": { "type": "string" },
                "document_type": {
                    "type": "string",
                    "description": "e.g. psa, title_commitment, survey, appraisal"
                }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Deals,
            "deal_run_agent",
            "Run a specialist agent against a deal.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["deal_id", "agent_name"],
            "properties": {
                "deal_id": { "type": "string" },
                "agent_name": {
                    "type": "string",
                    "enum": [
                        "deal_manager",
                        "memo_writer",
                        "underwriter",
                        "due_diligence_coordinator"
                    ]
                },
                "instruction": {
                    "type": "string",
                    "description": "Optional free-text instruction for the agent"
                }
            }
        })),
    ]
}

pub(super) async fn call(
    ctx: &CallContext<'_>,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue, GatewayError> {
    let deals = ctx.client.deals();
    match name {
        "deal_list" => deals.list(args).await,
        "deal_get" => deals.get(str_arg(args, "deal_id")).await,
        "deal_create" => deals.create(args).await,
        "deal_update" => {
            let mut changes = args.clone();
            changes.remove("deal_id");
            deals.update(str_arg(args, "deal_id"), &changes).await
        }
        "deal_add_document" => {
            deals
                .add_document(
                    str_arg(args, "deal_id"),
                    str_arg(args, "document_id"),
                    opt_str_arg(args, "document_type"),
                )
                .await
        }
        "deal_run_agent" => {
            let agent_name: AgentName = serde_json::from_value(json!(str_arg(args, "agent_name")))
                .map_err(|e| GatewayError::InvalidRequest {
                    reason: format!("unknown agent: {e}"),
                })?;
            let request = AgentInvokeRequest {
                agent_name,
                payload: json!({
                    "deal_id": str_arg(args, "deal_id"),
                    "instruction": opt_str_arg(args, "instruction"),
                    "conversation_id": ctx.conversation_id,
                }),
            };
            ctx.client.agents().invoke(&request).await
        }
        _ => Err(no_handler(name)),
    }
}
