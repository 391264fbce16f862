use super::{CallContext, no_handler, str_arg};
use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::GatewayError;
use serde_json::{Map, Value as JsonValue, json};

const MEMO_TYPES: [&str; 5] = [
    "acquisition",
    "disposition",
    "development",
    "loi",
    "executive_summary",
];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolFamily::Analysis,
            "underwrite_deal",
            "Run a pro forma underwriting model for a deal. Returns IRR, equity multiple, \
             cash-on-cash, and DSCR.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["deal_id"],
            "properties": {
                "deal_id": { "type": "string" },
                "hold_period_years": { "type": "integer", "default": 5 },
                "equity_pct": { "type": "number", "default": 0.3 },
                "exit_cap_rate": { "type": "number" },
                "rent_growth_rate": { "type": "number", "default": 0.03 },
                "expense_ratio": { "type": "number", "default": 0.35 }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Analysis,
            "generate_memo",
            "Generate an investment memo for a deal using the memo writer agent.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["deal_id"],
            "properties": {
                "deal_id": { "type": "string" },
                "memo_type": { "type": "string", "enum": MEMO_TYPES, "default": "acquisition" },
                "include_sections": { "type": "array", "items": { "type": "string" } }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Analysis,
            "memo_generate",
            "Draft an investment memo with a chosen tone and optional financial and risk \
             sections.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["deal_id"],
            "properties": {
                "deal_id": { "type": "string" },
                "memo_type": { "type": "string", "enum": MEMO_TYPES, "default": "acquisition" },
                "tone": {
                    "type": "string",
                    "enum": ["formal", "concise", "detailed"],
                    "default": "formal"
                },
                "include_financials": { "type": "boolean", "default": true },
                "include_risk_section": { "type": "boolean", "default": true }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Analysis,
            "memo_export",
            "Export a generated memo to PDF or DOCX.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["memo_id"],
            "properties": {
                "memo_id": { "type": "string" },
                "format": { "type": "string", "enum": ["pdf", "docx"], "default": "pdf" }
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
        "underwrite_deal" => ctx.client.post("/api/analysis/underwrite", args).await,
        "generate_memo" | "memo_generate" => {
            ctx.client
                .agents()
                .write_memo(
                    str_arg(args, "deal_id"),
                    str_arg(args, "memo_type"),
                    ctx.conversation_id,
                )
                .await
        }
        "memo_export" => {
            let body = json!({
                "memo_id": str_arg(args, "memo_id"),
                "format": str_arg(args, "format"),
            });
            ctx.client.post("/api/memos/export", &body).await
        }
        _ => Err(no_handler(name)),
    }
}
