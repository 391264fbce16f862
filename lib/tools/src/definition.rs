//! Tool definitions and the registry that holds them.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Resource family a tool belongs to.
///
/// The family decides which handler runs the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFamily {
    /// Parcel lookup, search and ownership.
    Parcels,
    /// Zoning details, history and feasibility.
    Zoning,
    /// Flood zone, risk and insurance.
    Flood,
    /// Single-layer property screens.
    Screening,
    /// Deal pipeline management.
    Deals,
    /// Underwriting and memos.
    Analysis,
    /// Market, comps and demographics.
    Market,
    /// Document vault and knowledge base.
    Documents,
    /// Multi-step workflows.
    Workflows,
}

/// Definition of a tool offered to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON schema for the tool arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
    /// Family that handles the tool.
    #[serde(skip)]
    pub family: ToolFamily,
}

impl ToolDefinition {
    /// Creates a tool definition that accepts an empty object.
    #[must_use]
    pub fn new(family: ToolFamily, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::json!({ "type": "object", "properties": {} }),
            family,
        }
    }

    /// Sets the input schema.
    #[must_use]
    pub fn with_input_schema(mut self, schema: JsonValue) -> Self {
        self.input_schema = schema;
        self
    }

    /// Returns true if the schema lists `field` as required.
    #[must_use]
    pub fn requires(&self, field: &str) -> bool {
        self.input_schema
            .get("required")
            .and_then(JsonValue::as_array)
            .is_some_and(|required| required.iter().any(|name| name.as_str() == Some(field)))
    }
}

/// Registry of available tools.
///
/// Tools are listed in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the full tool catalog.
    #[must_use]
    pub fn catalog() -> Self {
        let mut registry = Self::new();
        for definition in crate::catalog::definitions() {
            registry.register(definition);
        }
        registry
    }

    /// Registers a tool definition, replacing one with the same name.
    pub fn register(&mut self, definition: ToolDefinition) {
        match self.index.get(&definition.name) {
            Some(&position) => self.definitions[position] = definition,
            None => {
                self.index
                    .insert(definition.name.clone(), self.definitions.len());
                self.definitions.push(definition);
            }
        }
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&position| &self.definitions[position])
    }

    /// Returns all registered tool definitions.
    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.definitions.iter()
    }

    /// Returns tool definitions of one family.
    pub fn by_family(&self, family: ToolFamily) -> impl Iterator<Item = &ToolDefinition> {
        self.definitions.iter().filter(move |d| d.family == family)
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
