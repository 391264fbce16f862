use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::request::segment;
use magnolia_core::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

const DEALS: &str = "/api/v1/deals";

/// Pipeline stage of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Prospecting,
    Screening,
    Underwriting,
    Loi,
    DueDiligence,
    Closing,
    Closed,
    Dead,
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Prospecting => "prospecting",
            Self::Screening => "screening",
            Self::Underwriting => "underwriting",
            Self::Loi => "loi",
            Self::DueDiligence => "due_diligence",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Dead => "dead",
        };
        f.write_str(name)
    }
}

/// Deal management endpoints.
#[derive(Debug, Clone)]
pub struct DealsClient {
    client: GatewayClient,
}

impl DealsClient {
    pub(crate) fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Lists deals matching the given filters.
    pub async fn list<T, Q>(&self, filters: &Q) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.client.get_with_query(DEALS, filters).await
    }

    /// Finds a deal by ID, name or SKU.
    pub async fn lookup<T, Q>(&self, params: &Q) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.client
            .get_with_query(&format!("{DEALS}/lookup"), params)
            .await
    }

    /// Fetches a single deal.
    pub async fn get<T: DeserializeOwned>(&self, deal_id: &str) -> Result<T, GatewayError> {
        self.client.get(&deal_path(deal_id, "")).await
    }

    /// Creates a deal.
    pub async fn create<T, B>(&self, deal: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client.post(DEALS, deal).await
    }

    /// Updates fields of an existing deal.
    pub async fn update<T, B>(&self, deal_id: &str, changes: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client.patch(&deal_path(deal_id, ""), changes).await
    }

    /// Moves a deal to a new pipeline stage.
    pub async fn update_stage<T: DeserializeOwned>(
        &self,
        deal_id: &str,
        stage: DealStage,
        notes: Option<&str>,
    ) -> Result<T, GatewayError> {
        self.client
            .post(
                &deal_path(deal_id, "/stage"),
                &json!({ "status": stage, "notes": notes }),
            )
            .await
    }

    /// Runs the analysis pipeline on a deal.
    pub async fn analyze<T, B>(&self, deal_id: &str, options: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client
            .post(&deal_path(deal_id, "/analyze"), options)
            .await
    }

    /// Generates an investment memo in the given format.
    pub async fn generate_memo<T: DeserializeOwned>(
        &self,
        deal_id: &str,
        format: &str,
    ) -> Result<T, GatewayError> {
        self.client
            .post(&deal_path(deal_id, "/memo"), &json!({ "format": format }))
            .await
    }

    /// Schedules the due diligence workflow for a deal.
    pub async fn run_due_diligence<T: DeserializeOwned>(
        &self,
        deal_id: &str,
        priority: &str,
    ) -> Result<T, GatewayError> {
        self.client
            .post(
                &deal_path(deal_id, "/due-diligence"),
                &json!({ "priority": priority }),
            )
            .await
    }

    /// Attaches a stored document to a deal.
    pub async fn add_document<T: DeserializeOwned>(
        &self,
        deal_id: &str,
        document_id: &str,
        document_type: Option<&str>,
    ) -> Result<T, GatewayError> {
        self.client
            .post(
                &deal_path(deal_id, "/documents"),
                &json!({ "document_id": document_id, "document_type": document_type }),
            )
            .await
    }
}

fn deal_path(deal_id: &str, suffix: &str) -> String {
    format!("{DEALS}/{}{suffix}", segment(deal_id))
}
