use super::{CallContext, no_handler};
use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::GatewayError;
use serde_json::{Map, Value as JsonValue, json};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolFamily::Screening,
            "environmental_screen",
            "Run a Phase I environmental screen on a parcel. Returns recognized environmental \
             conditions, regulatory database hits, and a risk score.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["parcel_id"],
            "properties": {
                "parcel_id": { "type": "string" },
                "include_historical_maps": { "type": "boolean", "default": true },
                "include_aerial_review": { "type": "boolean", "default": true }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Screening,
            "flood_zone_check",
            "Determine the FEMA flood zone for a parcel or coordinate, with base flood \
             elevation and insurance requirements.",
        )
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "parcel_id": { "type": "string" },
                "lat": { "type": "number" },
                "lng": { "type": "number" }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Screening,
            "zoning_lookup",
            "Retrieve zoning classification, permitted uses, setbacks, height limits, and FAR \
             for a parcel.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["parcel_id"],
            "properties": {
                "parcel_id": { "type": "string" },
                "include_overlay_districts": { "type": "boolean", "default": true }
            }
        })),
    ]
}

pub(super) async fn call(
    ctx: &CallContext<'_>,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue, GatewayError> {
    let layer = match name {
        "environmental_screen" => "environmental",
        "flood_zone_check" => "flood",
        "zoning_lookup" => "zoning",
        _ => return Err(no_handler(name)),
    };
    ctx.client.screening().layer(layer, args).await
}
