use super::{CallContext, no_handler, str_arg};
use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::GatewayError;
use serde_json::{Map, Value as JsonValue, json};

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            ToolFamily::Documents,
            "document_search",
            "Search stored deal documents by text, deal, or document type.",
        )
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "deal_id": { "type": "string" },
                "document_type": { "type": "string" },
                "limit": { "type": "integer", "default": 10 }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Documents,
            "document_get",
            "Fetch a document's metadata and optionally its full extracted text.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["document_id"],
            "properties": {
                "document_id": { "type": "string" },
                "include_full_text": { "type": "boolean", "default": false }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Documents,
            "knowledge_search",
            "Semantic search across underwriting guidelines, market reports, comps, and deal \
             history.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": { "type": "string" },
                "top_k": { "type": "integer", "default": 5 },
                "filter_type": {
                    "type": "string",
                    "enum": ["guideline", "market_report", "comp", "deal_history", "all"],
                    "default": "all"
                }
            }
        })),
        ToolDefinition::new(
            ToolFamily::Documents,
            "knowledge_get",
            "Fetch a single knowledge base entry.",
        )
        .with_input_schema(json!({
            "type": "object",
            "required": ["entry_id"],
            "properties": {
                "entry_id": { "type": "string" }
            }
        })),
    ]
}

pub(super) async fn call(
    ctx: &CallContext<'_>,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue, GatewayError> {
    let documents = ctx.client.documents();
    match name {
        "document_search" => documents.search(args).await,
        "document_get" => {
            let include_full_text = args
                .get("include_full_text")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false);
            documents
                .get(str_arg(args, "document_id"), include_full_text)
                .await
        }
        "knowledge_search" => documents.search_knowledge(args).await,
        "knowledge_get" => documents.knowledge_entry(str_arg(args, "entry_id")).await,
        _ => Err(no_handler(name)),
    }
}
