//! Tool dispatch.
//!
//! A call flows through a fixed pipeline: registry lookup, argument shape
//! check, context recovery from the attached session, schema validation,
//! the gateway call, and finally a history record on the session. Every
//! failure becomes an error result for the host; nothing here panics or
//! propagates.

use crate::catalog::{self, CallContext};
use crate::definition::{ToolDefinition, ToolRegistry};
use crate::error::ToolError;
use crate::response::ToolResponse;
use crate::schema;
use magnolia_gateway::GatewayClient;
use magnolia_session::{SessionDocument, SessionHandle, ToolCallRecord};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, instrument, warn};

/// Maximum number of characters kept in a history summary.
pub const MAX_SUMMARY_CHARS: usize = 200;

/// Routes tool calls to the gateway.
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    client: GatewayClient,
    registry: ToolRegistry,
}

impl ToolDispatcher {
    /// Creates a dispatcher over the full tool catalog.
    #[must_use]
    pub fn new(client: GatewayClient) -> Self {
        Self {
            client,
            registry: ToolRegistry::catalog(),
        }
    }

    /// Returns every tool definition in listing order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.registry.all()
    }

    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Runs a tool and shapes the outcome for the host.
    ///
    /// When `session` is given, omitted required `parcel_id` and `deal_id`
    /// arguments are recovered from it, and the call is recorded in its
    /// history whether it succeeds or fails.
    #[instrument(skip(self, arguments, session), fields(session = session.map(|s| s.key().as_str())))]
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonValue>,
        session: Option<&SessionHandle>,
    ) -> ToolResponse {
        match self.execute(name, arguments, session).await {
            Ok(payload) => ToolResponse::success(payload),
            Err(err) => {
                warn!(tool = name, code = err.code(), "tool call failed: {}", err.message());
                ToolResponse::failure(&err)
            }
        }
    }

    async fn execute(
        &self,
        name: &str,
        arguments: Option<JsonValue>,
        session: Option<&SessionHandle>,
    ) -> Result<JsonValue, ToolError> {
        let definition = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool {
                name: name.to_string(),
            })?;

        let mut args = match arguments {
            None | Some(JsonValue::Null) => Map::new(),
            Some(JsonValue::Object(args)) => args,
            Some(_) => {
                return Err(ToolError::InvalidArguments {
                    tool: name.to_string(),
                    reason: "arguments must be an object".to_string(),
                });
            }
        };

        let document = match session {
            Some(handle) => match handle.read().await {
                Ok(document) => Some(document),
                Err(err) => {
                    warn!(tool = name, "session unavailable, skipping context recovery: {err}");
                    None
                }
            },
            None => None,
        };
        if let Some(document) = &document {
            recover_context(definition, document, &mut args);
        }

        let args = schema::validate(&definition.input_schema, args).map_err(|violation| {
            ToolError::InvalidArguments {
                tool: name.to_string(),
                reason: violation.to_string(),
            }
        })?;

        let ctx = CallContext {
            client: &self.client,
            conversation_id: document
                .as_ref()
                .and_then(|document| document.conversation_id.as_deref()),
        };
        let outcome = catalog::call(definition.family, &ctx, name, &args)
            .await
            .map_err(|report| ToolError::Gateway {
                tool: name.to_string(),
                error: report.current_context().clone(),
            });

        if let Some(handle) = session {
            let summary = match &outcome {
                Ok(payload) => summarize(&payload.to_string()),
                Err(err) => summarize(&err.to_string()),
            };
            let record = ToolCallRecord::new(name, args, summary);
            if let Err(err) = handle.append_tool_call(record).await {
                warn!(tool = name, "failed to record tool call: {err}");
            }
        }

        outcome
    }
}

/// Fills omitted required identifiers from the session.
fn recover_context(
    definition: &ToolDefinition,
    document: &SessionDocument,
    args: &mut Map<String, JsonValue>,
) {
    let recovered = [
        ("parcel_id", document.last_selected_parcel()),
        ("deal_id", document.active_deal_id.as_deref()),
    ];
    for (field, value) in recovered {
        if !definition.requires(field) || !is_missing(args, field) {
            continue;
        }
        if let Some(value) = value {
            debug!(tool = %definition.name, field, value, "recovered argument from session");
            args.insert(field.to_string(), JsonValue::String(value.to_string()));
        }
    }
}

fn is_missing(args: &Map<String, JsonValue>, field: &str) -> bool {
    matches!(args.get(field), None | Some(JsonValue::Null))
}

fn summarize(text: &str) -> String {
    text.chars().take(MAX_SUMMARY_CHARS).collect()
}
