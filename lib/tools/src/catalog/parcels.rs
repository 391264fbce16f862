use super::{CallContext, no_handler};
use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::GatewayError;
use serde_json::{Map, Value as JsonValue, json};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolFamily::Parcels,
            "parcel_lookup",
            "Look up a parcel by APN, address, or coordinates. Returns ownership, legal \
             description, acreage, and assessed value.",
        )
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "apn": { "type": "string", "description": "Assessor Parcel Number" },
                "address": { "type": "string", "description": "Street address" },
                "lat": { "type": "number", "description": "Latitude" },
                "lng": { "type": "number", "description": "Longitude" }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Parcels,
            "parcel_search",
            "Search parcels by geography, size range, land use, or owner name.",
        )
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "bbox": {
                    "type": "object",
                    "description": "Bounding box for spatial search",
                    "properties": {
                        "north": { "type": "number" },
                        "south": { "type": "number" },
                        "east": { "type": "number" },
                        "west": { "type": "number" }
                    }
                },
                "min_acres": { "type": "number" },
                "max_acres": { "type": "number" },
                "land_use": { "type": "string", "description": "Land use code or category" },
                "owner_name": { "type": "string" },
                "limit": { "type": "integer", "default": 20 }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Parcels,
            "ownership_lookup",
            "Look up current and historical ownership for a parcel, including entity type \
             and transfer history.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["parcel_id"],
            "properties": {
                "parcel_id": { "type": "string" },
                "include_transfer_history": { "type": "boolean", "default": true },
                "include_entity_details": { "type": "boolean", "default": true }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Parcels,
            "owner_portfolio",
            "Find all parcels held by an owner name or entity.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["owner_name"],
            "properties": {
                "owner_name": { "type": "string" },
                "state": { "type": "string", "description": "Two-letter state code" },
                "limit": { "type": "integer", "default": 50 }
            }
        })),
    ]
}

pub(super) async fn call(
    ctx: &CallContext<'_>,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue, GatewayError> {
    match name {
        "parcel_lookup" => ctx.client.parcels().lookup(args).await,
        "parcel_search" => ctx.client.parcels().search(args).await,
        "ownership_lookup" => ctx.client.post("/api/ownership/lookup", args).await,
        "owner_portfolio" => ctx.client.post("/api/ownership/portfolio", args).await,
        _ => Err(no_handler(name)),
    }
}
