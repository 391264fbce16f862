//! The per-conversation session document.
//!
//! A document remembers what the user is looking at across tool calls:
//! selected parcels, the active deal, the map viewport and a short history
//! of recent tool calls.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Number of tool calls kept in a session's history.
pub const MAX_RECENT_TOOL_CALLS: usize = 20;

/// Visible map area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapViewport {
    /// Map center as (longitude, latitude).
    pub center: (f64, f64),
    /// Zoom level.
    pub zoom: f64,
    /// Bounding box as (west, south, east, north).
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
}

/// One entry of the tool call history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Name of the tool.
    pub tool: String,
    /// Arguments the tool ran with.
    #[serde(default)]
    pub args: Map<String, JsonValue>,
    /// Short description of the outcome.
    #[serde(default)]
    pub result_summary: String,
    /// When the call completed.
    #[serde(default = "Utc::now")]
    pub called_at: DateTime<Utc>,
}

impl ToolCallRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(
        tool: impl Into<String>,
        args: Map<String, JsonValue>,
        result_summary: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            args,
            result_summary: result_summary.into(),
            called_at: Utc::now(),
        }
    }
}

/// Session state for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Selected parcel IDs, most recently selected last.
    #[serde(default)]
    pub selected_parcels: Vec<String>,
    /// Deal the conversation is working on.
    #[serde(default)]
    pub active_deal_id: Option<String>,
    /// Current map viewport.
    #[serde(default)]
    pub map_viewport: Option<MapViewport>,
    /// Most recent tool calls, oldest first.
    #[serde(default)]
    pub recent_tool_calls: Vec<ToolCallRecord>,
    /// Correlation ID supplied by the host.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// When the document last changed.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl SessionDocument {
    /// Creates an empty document stamped with the current time.
    ///
    /// Every call builds a new value; no two conversations share a default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            selected_parcels: Vec::new(),
            active_deal_id: None,
            map_viewport: None,
            recent_tool_calls: Vec::new(),
            conversation_id: None,
            updated_at: Utc::now(),
        }
    }

    /// Applies a partial update.
    ///
    /// Fields absent from the patch are left untouched. Explicit nulls
    /// clear a field; for list fields that means emptying the list.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(parcels) = patch.selected_parcels {
            self.selected_parcels = parcels.unwrap_or_default();
        }
        if let Some(deal) = patch.active_deal_id {
            self.active_deal_id = deal;
        }
        if let Some(viewport) = patch.map_viewport {
            self.map_viewport = viewport;
        }
        if let Some(calls) = patch.recent_tool_calls {
            self.recent_tool_calls = calls.unwrap_or_default();
            self.truncate_history();
        }
        if let Some(conversation) = patch.conversation_id {
            self.conversation_id = conversation;
        }
    }

    /// Appends a tool call, evicting the oldest entries beyond the cap.
    pub fn push_tool_call(&mut self, record: ToolCallRecord) {
        self.recent_tool_calls.push(record);
        self.truncate_history();
    }

    /// Returns the most recently selected parcel.
    #[must_use]
    pub fn last_selected_parcel(&self) -> Option<&str> {
        self.selected_parcels.last().map(String::as_str)
    }

    fn truncate_history(&mut self) {
        let excess = self
            .recent_tool_calls
            .len()
            .saturating_sub(MAX_RECENT_TOOL_CALLS);
        if excess > 0 {
            self.recent_tool_calls.drain(..excess);
        }
    }
}

impl Default for SessionDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns a timestamp strictly later than `previous`.
///
/// Uses `now` when the clock has moved past `previous`, otherwise
/// `previous` plus one microsecond.
#[must_use]
pub fn next_stamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

/// A partial session update.
///
/// Each field distinguishes "absent" (`None`) from "explicitly null"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_parcels: Option<Option<Vec<String>>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_deal_id: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub map_viewport: Option<Option<MapViewport>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub recent_tool_calls: Option<Option<Vec<ToolCallRecord>>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub conversation_id: Option<Option<String>>,
}

impl SessionPatch {
    /// Sets or clears the active deal.
    #[must_use]
    pub fn active_deal(mut self, deal_id: Option<String>) -> Self {
        self.active_deal_id = Some(deal_id);
        self
    }

    /// Replaces the selected parcels.
    #[must_use]
    pub fn selected_parcels(mut self, parcels: Vec<String>) -> Self {
        self.selected_parcels = Some(Some(parcels));
        self
    }

    /// Sets or clears the map viewport.
    #[must_use]
    pub fn map_viewport(mut self, viewport: Option<MapViewport>) -> Self {
        self.map_viewport = Some(viewport);
        self
    }
}

/// Marks a field as present whenever the key appears, even with a null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
