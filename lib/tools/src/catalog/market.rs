use super::{CallContext, no_handler};
use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::GatewayError;
use serde_json::{Map, Value as JsonValue, json};

const PROPERTY_TYPES: [&str; 6] = [
    "office",
    "industrial",
    "retail",
    "multifamily",
    "land",
    "mixed_use",
];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolFamily::Market,
            "market_snapshot",
            "Current market fundamentals for a submarket: vacancy, asking rent, cap rates, \
             and absorption.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["market"],
            "properties": {
                "market": { "type": "string", "description": "Market or submarket name" },
                "property_type": { "type": "string", "enum": PROPERTY_TYPES },
                "as_of_date": { "type": "string", "description": "ISO 8601 date" }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Market,
            "market_trends",
            "Historical trend of a market metric over recent quarters.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["market", "metric"],
            "properties": {
                "market": { "type": "string" },
                "metric": {
                    "type": "string",
                    "enum": ["vacancy_rate", "asking_rent", "cap_rate", "absorption", "deliveries"]
                },
                "property_type": { "type": "string" },
                "periods": { "type": "integer", "default": 8, "description": "Quarters" }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Market,
            "comps_search",
            "Search comparable sale or lease transactions around a point.",
        )
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "center_lat": { "type": "number" },
                "center_lng": { "type": "number" },
                "radius_miles": { "type": "number", "default": 1 },
                "property_type": { "type": "string" },
                "transaction_type": { "type": "string", "enum": ["sale", "lease"] },
                "min_sf": { "type": "number" },
                "max_sf": { "type": "number" },
                "date_from": { "type": "string" },
                "date_to": { "type": "string" },
                "limit": { "type": "integer", "default": 10 }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Market,
            "comps_summary",
            "Summarize comparable transactions for a deal with median pricing statistics.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["deal_id"],
            "properties": {
                "deal_id": { "type": "string" },
                "comp_type": { "type": "string", "enum": ["sale", "lease"], "default": "sale" },
                "radius_miles": { "type": "number", "default": 1 },
                "lookback_months": { "type": "integer", "default": 24 }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Market,
            "demographics_snapshot",
            "Population, income, and household demographics around a location.",
        )
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "lat": { "type": "number" },
                "lng": { "type": "number" },
                "radius_miles": { "type": "number", "default": 1 },
                "parcel_id": { "type": "string" },
                "rings": {
                    "type": "array",
                    "items": { "type": "number" },
                    "description": "Ring radii in miles"
                }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Market,
            "demographics_trends",
            "Historical and projected demographic trends around a location.",
        )
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "lat": { "type": "number" },
                "lng": { "type": "number" },
                "radius_miles": { "type": "number", "default": 1 },
                "parcel_id": { "type": "string" },
                "metrics": { "type": "array", "items": { "type": "string" } }
            }
        })),
    ]
}

pub(super) async fn call(
    ctx: &CallContext<'_>,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue, GatewayError> {
    let market = ctx.client.market();
    match name {
        "market_snapshot" => market.snapshot(args).await,
        "market_trends" => market.trends(args).await,
        "comps_search" => market.comps(args).await,
        "comps_summary" => ctx.client.post("/api/comps/summary", args).await,
        "demographics_snapshot" => ctx.client.post("/api/demographics/snapshot", args).await,
        "demographics_trends" => ctx.client.post("/api/demographics/trends", args).await,
        _ => Err(no_handler(name)),
    }
}
