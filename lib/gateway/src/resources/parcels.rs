use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::request::segment;
use magnolia_core::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

const PARCELS: &str = "/api/v1/parcels";

/// Parcel endpoints.
#[derive(Debug, Clone)]
pub struct ParcelsClient {
    client: GatewayClient,
}

impl ParcelsClient {
    pub(crate) fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Searches parcels with natural language or structured filters.
    pub async fn search<T, B>(&self, params: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client
            .post(&format!("{PARCELS}/search"), params)
            .await
    }

    /// Resolves a parcel by ID, address or coordinates.
    pub async fn lookup<T, Q>(&self, params: &Q) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.client
            .get_with_query(&format!("{PARCELS}/lookup"), params)
            .await
    }

    /// Fetches a single parcel.
    pub async fn get<T: DeserializeOwned>(&self, parcel_id: &str) -> Result<T, GatewayError> {
        self.client.get(&parcel_path(parcel_id, "")).await
    }

    /// Fetches zoning for a parcel, optionally checked against a proposed use.
    pub async fn zoning<T: DeserializeOwned>(
        &self,
        parcel_id: &str,
        proposed_use: Option<&str>,
    ) -> Result<T, GatewayError> {
        self.client
            .get_with_query(
                &parcel_path(parcel_id, "/zoning"),
                &json!({ "proposed_use": proposed_use }),
            )
            .await
    }

    /// Fetches the flood risk summary for a parcel.
    pub async fn flood_risk<T: DeserializeOwned>(&self, parcel_id: &str) -> Result<T, GatewayError> {
        self.client.get(&parcel_path(parcel_id, "/flood-risk")).await
    }

    /// Searches ownership records by parcel, owner name or address.
    pub async fn ownership<T, Q>(&self, params: &Q) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.client
            .get_with_query(&format!("{PARCELS}/ownership"), params)
            .await
    }
}

fn parcel_path(parcel_id: &str, suffix: &str) -> String {
    format!("{PARCELS}/{}{suffix}", segment(parcel_id))
}
