use super::{CallContext, no_handler};
use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::GatewayError;
use serde_json::{Map, Value as JsonValue, json};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolFamily::Flood,
            "flood_zone_detail",
            "Get FEMA FIRM flood zone data for a parcel: zone designation, base flood \
             elevation, LOMA history, and insurance estimates.",
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
            ToolFamily::Flood,
            "flood_risk_score",
            "Get a composite flood risk score from 0 to 100 combining FEMA zone, sea level \
             projections, and historical events.",
        )
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "parcel_id": { "type": "string" },
                "lat": { "type": "number" },
                "lng": { "type": "number" },
                "include_climate_projections": { "type": "boolean", "default": true }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Flood,
            "flood_insurance_estimate",
            "Estimate NFIP or private flood insurance premium for a property.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["parcel_id", "building_value"],
            "properties": {
                "parcel_id": { "type": "string" },
                "building_value": {
                    "type": "number",
                    "description": "Replacement cost value in USD"
                },
                "contents_value": { "type": "number" },
                "deductible": { "type": "number", "default": 1000 }
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
        "flood_zone_detail" => "/api/flood/zone-detail",
        "flood_risk_score" => "/api/flood/risk-score",
        "flood_insurance_estimate" => "/api/flood/insurance-estimate",
        _ => return Err(no_handler(name)),
    };
    ctx.client.post(path, args).await
}
