use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::request::segment;
use crate::resources::workflows::RunStatus;
use magnolia_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use std::fmt;

/// Specialist agents available on the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentName {
    ParcelAnalyst,
    MarketAnalyst,
    Underwriter,
    DueDiligenceCoordinator,
    EnvironmentalScreener,
    ZoningAnalyst,
    FloodAnalyst,
    DemographicAnalyst,
    CompAnalyst,
    DocumentReviewer,
    DealManager,
    MemoWriter,
    OwnershipResearcher,
    SiteSelector,
    PortfolioManager,
    RiskAssessor,
}

impl AgentName {
    /// Returns the wire name of the agent.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParcelAnalyst => "parcel_analyst",
            Self::MarketAnalyst => "market_analyst",
            Self::Underwriter => "underwriter",
            Self::DueDiligenceCoordinator => "due_diligence_coordinator",
            Self::EnvironmentalScreener => "environmental_screener",
            Self::ZoningAnalyst => "zoning_analyst",
            Self::FloodAnalyst => "flood_analyst",
            Self::DemographicAnalyst => "demographic_analyst",
            Self::CompAnalyst => "comp_analyst",
            Self::DocumentReviewer => "document_reviewer",
            Self::DealManager => "deal_manager",
            Self::MemoWriter => "memo_writer",
            Self::OwnershipResearcher => "ownership_researcher",
            Self::SiteSelector => "site_selector",
            Self::PortfolioManager => "portfolio_manager",
            Self::RiskAssessor => "risk_assessor",
        }
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to run an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInvokeRequest {
    pub agent_name: AgentName,
    pub payload: JsonValue,
}

/// Handle to an asynchronous agent task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    pub task_id: String,
}

/// Progress of an asynchronous agent task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTaskStatus {
    pub task_id: String,
    pub agent_name: AgentName,
    pub status: RunStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub result: Option<JsonValue>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Specialist agent endpoints.
#[derive(Debug, Clone)]
pub struct AgentsClient {
    client: GatewayClient,
}

impl AgentsClient {
    pub(crate) fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Runs an agent and waits for its result.
    pub async fn invoke(&self, request: &AgentInvokeRequest) -> Result<JsonValue, GatewayError> {
        self.client.post("/api/agents/invoke", request).await
    }

    /// Starts an agent task without waiting for it.
    pub async fn start_task(&self, request: &AgentInvokeRequest) -> Result<TaskHandle, GatewayError> {
        self.client.post("/api/agents/tasks", request).await
    }

    /// Polls an agent task.
    pub async fn task_status(&self, task_id: &str) -> Result<AgentTaskStatus, GatewayError> {
        self.client
            .get(&format!("/api/agents/tasks/{}", segment(task_id)))
            .await
    }

    /// Asks the deal manager agent to analyze a deal.
    pub async fn analyze_deal(
        &self,
        deal_id: &str,
        conversation_id: Option<&str>,
    ) -> Result<JsonValue, GatewayError> {
        self.invoke(&AgentInvokeRequest {
            agent_name: AgentName::DealManager,
            payload: json!({ "deal_id": deal_id, "conversation_id": conversation_id }),
        })
        .await
    }

    /// Asks the memo writer agent to draft a memo.
    pub async fn write_memo(
        &self,
        deal_id: &str,
        memo_type: &str,
        conversation_id: Option<&str>,
    ) -> Result<JsonValue, GatewayError> {
        self.invoke(&AgentInvokeRequest {
            agent_name: AgentName::MemoWriter,
            payload: json!({
                "deal_id": deal_id,
                "memo_type": memo_type,
                "conversation_id": conversation_id,
            }),
        })
        .await
    }
}
