use crate::client::GatewayClient;
use crate::error::GatewayError;
use magnolia_core::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Request for one market data time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDataRequest {
    /// Data source, e.g. `fred`, `bls`, `census`.
    pub source: String,
    /// Series identifier within the source.
    pub series_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl MarketDataRequest {
    #[must_use]
    pub fn new(source: impl Into<String>, series_id: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            series_id: series_id.into(),
            geography: None,
            start_date: None,
            end_date: None,
        }
    }

    #[must_use]
    pub fn with_geography(mut self, geography: impl Into<String>) -> Self {
        self.geography = Some(geography.into());
        self
    }

    #[must_use]
    pub fn with_range(mut self, start_date: Option<String>, end_date: Option<String>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }
}

/// Market data endpoints.
#[derive(Debug, Clone)]
pub struct MarketClient {
    client: GatewayClient,
}

impl MarketClient {
    pub(crate) fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Fetches one time series.
    pub async fn series<T: DeserializeOwned>(
        &self,
        request: &MarketDataRequest,
    ) -> Result<T, GatewayError> {
        self.client.post("/api/market/series", request).await
    }

    /// Fetches several time series in one call.
    pub async fn series_batch<T: DeserializeOwned>(
        &self,
        requests: &[MarketDataRequest],
    ) -> Result<T, GatewayError> {
        self.client.post("/api/market/series/batch", requests).await
    }

    /// Fetches a FRED series.
    pub async fn fred<T: DeserializeOwned>(
        &self,
        series_id: &str,
        start_date: Option<String>,
        end_date: Option<String>,
    ) -> Result<T, GatewayError> {
        let request = MarketDataRequest::new("fred", series_id).with_range(start_date, end_date);
        self.series(&request).await
    }

    /// Fetches current market indicators.
    pub async fn snapshot<T, Q>(&self, params: &Q) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.client
            .get_with_query("/api/market/snapshot", params)
            .await
    }

    /// Fetches historical values of one market metric.
    pub async fn trends<T, Q>(&self, params: &Q) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.client.get_with_query("/api/market/trends", params).await
    }

    /// Fetches census demographics for a geography.
    pub async fn demographics<T: DeserializeOwned>(
        &self,
        geography: &str,
        year: Option<u16>,
    ) -> Result<T, GatewayError> {
        self.client
            .get_with_query(
                "/api/market/demographics",
                &json!({ "geography": geography, "year": year }),
            )
            .await
    }

    /// Runs a comparable sales or lease analysis.
    pub async fn comps<T, B>(&self, params: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client.post("/api/market/comps", params).await
    }
}
