use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::request::segment;
use magnolia_core::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Property screening endpoints.
#[derive(Debug, Clone)]
pub struct ScreeningClient {
    client: GatewayClient,
}

impl ScreeningClient {
    pub(crate) fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Runs the full screening for one parcel.
    pub async fn screen<T, B>(&self, request: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client.post("/api/v1/screening/screen", request).await
    }

    /// Fetches a previously completed screening.
    pub async fn result<T: DeserializeOwned>(&self, parcel_id: &str) -> Result<T, GatewayError> {
        self.client
            .get(&format!("/api/v1/screening/{}", segment(parcel_id)))
            .await
    }

    /// Queues a batch screening job.
    pub async fn schedule_batch<T, B>(&self, request: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client.post("/api/v1/screening/batch", request).await
    }

    /// Runs a single screening layer such as `environmental`, `flood` or
    /// `zoning`.
    pub async fn layer<T, B>(&self, layer: &str, params: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client
            .post(&format!("/api/screening/{}", segment(layer)), params)
            .await
    }
}
