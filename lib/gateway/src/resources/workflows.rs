use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::request::segment;
use magnolia_core::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};

/// Status of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    /// Returns true once the run can no longer change.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Status of one step within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
}

/// A step of a workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub step_name: String,
    pub status: StepStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub output: Option<JsonValue>,
}

/// A workflow run as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub run_id: String,
    pub workflow_name: String,
    pub status: RunStatus,
    /// Completion between 0 and 1.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub result: Option<JsonValue>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Request to start a named workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartWorkflowRequest {
    pub workflow_name: String,
    pub deal_id: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Handle to a started run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunHandle {
    pub run_id: String,
}

/// Workflow orchestration endpoints.
#[derive(Debug, Clone)]
pub struct WorkflowsClient {
    client: GatewayClient,
}

impl WorkflowsClient {
    pub(crate) fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Starts a workflow run.
    ///
    /// Decode into [`RunHandle`] for just the run ID, or into a JSON value to
    /// keep everything the gateway reported.
    pub async fn start<T: DeserializeOwned>(
        &self,
        request: &StartWorkflowRequest,
    ) -> Result<T, GatewayError> {
        self.client.post("/api/workflows", request).await
    }

    /// Fetches the current state of a run.
    ///
    /// [`WorkflowRun`] only accepts the statuses it knows about; decode into a
    /// JSON value when the payload is forwarded untouched.
    pub async fn status<T: DeserializeOwned>(&self, run_id: &str) -> Result<T, GatewayError> {
        self.client.get(&run_path(run_id, "")).await
    }

    /// Requests cancellation of a run.
    pub async fn cancel(&self, run_id: &str) -> Result<JsonValue, GatewayError> {
        self.client
            .post(&run_path(run_id, "/cancel"), &json!({}))
            .await
    }

    /// Starts the due diligence workflow for a deal.
    pub async fn run_due_diligence(
        &self,
        deal_id: &str,
        params: Map<String, JsonValue>,
    ) -> Result<RunHandle, GatewayError> {
        self.start(&StartWorkflowRequest {
            workflow_name: "due_diligence".to_string(),
            deal_id: deal_id.to_string(),
            params,
            conversation_id: None,
        })
        .await
    }

    /// Starts the site selection workflow for a deal.
    pub async fn run_site_selection(
        &self,
        deal_id: &str,
        params: Map<String, JsonValue>,
    ) -> Result<RunHandle, GatewayError> {
        self.start(&StartWorkflowRequest {
            workflow_name: "site_selection".to_string(),
            deal_id: deal_id.to_string(),
            params,
            conversation_id: None,
        })
        .await
    }
}

fn run_path(run_id: &str, suffix: &str) -> String {
    format!("/api/workflows/{}{suffix}", segment(run_id))
}
