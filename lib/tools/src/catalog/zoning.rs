use super::{CallContext, no_handler};
use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::GatewayError;
use serde_json::{Map, Value as JsonValue, json};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolFamily::Zoning,
            "zoning_details",
            "Get detailed zoning for a parcel including permitted uses, development standards, \
             and overlay districts.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["parcel_id"],
            "properties": {
                "parcel_id": { "type": "string" },
                "include_overlay_districts": { "type": "boolean", "default": true },
                "include_development_standards": { "type": "boolean", "default": true }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Zoning,
            "zoning_history",
            "Retrieve rezoning history and pending applications for a parcel.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["parcel_id"],
            "properties": {
                "parcel_id": { "type": "string" },
                "include_pending": { "type": "boolean", "default": true }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Zoning,
            "zoning_feasibility",
            "Assess development feasibility under current or proposed zoning. Returns maximum \
             buildable area, units, and parking requirements.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["parcel_id", "proposed_use"],
            "properties": {
                "parcel_id": { "type": "string" },
                "proposed_use": {
                    "type": "string",
                    "description": "Proposed development use, e.g. \"multifamily 5-story\""
                },
                "zoning_override": {
                    "type": "string",
                    "description": "Hypothetical zoning code to test instead of the current one"
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
    let path = match name {
        "zoning_details" => "/api/zoning/details",
        "zoning_history" => "/api/zoning/history",
        "zoning_feasibility" => "/api/zoning/feasibility",
        _ => return Err(no_handler(name)),
    };
    ctx.client.post(path, args).await
}
