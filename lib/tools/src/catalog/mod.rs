//! The tool catalog.
//!
//! Each family module declares its tools and maps validated arguments onto
//! gateway calls. Handlers receive arguments that already passed schema
//! validation, so required fields are present and correctly typed.

mod analysis;
mod deals;
mod documents;
mod flood;
mod market;
mod parcels;
mod screening;
mod workflows;
mod zoning;

use crate::definition::{ToolDefinition, ToolFamily};
use magnolia_core::Result;
use magnolia_gateway::{GatewayClient, GatewayError};
use rootcause::Report;
use serde_json::{Map, Value as JsonValue};

/// What a handler needs besides its arguments.
pub(crate) struct CallContext<'a> {
    pub client: &'a GatewayClient,
    /// Host correlation ID of the calling conversation, if known.
    pub conversation_id: Option<&'a str>,
}

/// Returns every tool definition in listing order.
pub(crate) fn definitions() -> Vec<ToolDefinition> {
    [
        parcels::definitions(),
        screening::definitions(),
        deals::definitions(),
        market::definitions(),
        analysis::definitions(),
        zoning::definitions(),
        flood::definitions(),
        documents::definitions(),
        workflows::definitions(),
    ]
    .concat()
}

/// Runs a tool of `family` with validated arguments.
pub(crate) async fn call(
    family: ToolFamily,
    ctx: &CallContext<'_>,
    name: &str,
    args: &Map<String, JsonValue>,
) -> Result<JsonValue, GatewayError> {
    match family {
        ToolFamily::Parcels => parcels::call(ctx, name, args).await,
        ToolFamily::Zoning => zoning::call(ctx, name, args).await,
        ToolFamily::Flood => flood::call(ctx, name, args).await,
        ToolFamily::Screening => screening::call(ctx, name, args).await,
        ToolFamily::Deals => deals::call(ctx, name, args).await,
        ToolFamily::Analysis => analysis::call(ctx, name, args).await,
        ToolFamily::Market => market::call(ctx, name, args).await,
        ToolFamily::Documents => documents::call(ctx, name, args).await,
        ToolFamily::Workflows => workflows::call(ctx, name, args).await,
    }
}

/// Returns a string argument, or an empty string if absent.
fn str_arg<'a>(args: &'a Map<String, JsonValue>, key: &str) -> &'a str {
    args.get(key).and_then(JsonValue::as_str).unwrap_or_default()
}

/// Returns an optional string argument.
fn opt_str_arg<'a>(args: &'a Map<String, JsonValue>, key: &str) -> Option<&'a str> {
    args.get(key).and_then(JsonValue::as_str)
}

fn no_handler(name: &str) -> Report<GatewayError> {
    GatewayError::InvalidRequest {
        reason: format!("no handler for tool '{name}'"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schema_declares_its_required_fields() {
        let definitions = definitions();
        assert_eq!(definitions.len(), 36);

        for definition in &definitions {
            let schema = &definition.input_schema;
            assert_eq!(schema["type"], "object", "{}", definition.name);
            let properties = schema["properties"]
                .as_object()
                .unwrap_or_else(|| panic!("{} has no properties", definition.name));
            for field in schema["required"].as_array().into_iter().flatten() {
                let field = field.as_str().expect("required names are strings");
                assert!(
                    properties.contains_key(field),
                    "{} requires undeclared {field}",
                    definition.name
                );
            }
        }
    }

    #[test]
    fn families_cover_the_catalog() {
        let count = |family| {
            definitions()
                .iter()
                .filter(|definition| definition.family == family)
                .count()
        };
        assert_eq!(count(ToolFamily::Parcels), 4);
        assert_eq!(count(ToolFamily::Zoning), 3);
        assert_eq!(count(ToolFamily::Flood), 3);
        assert_eq!(count(ToolFamily::Screening), 3);
        assert_eq!(count(ToolFamily::Deals), 6);
        assert_eq!(count(ToolFamily::Analysis), 4);
        assert_eq!(count(ToolFamily::Market), 6);
        assert_eq!(count(ToolFamily::Documents), 4);
        assert_eq!(count(ToolFamily::Workflows), 3);
    }
}
