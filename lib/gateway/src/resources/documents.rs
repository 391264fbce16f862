use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::request::segment;
use magnolia_core::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Document vault and knowledge base endpoints.
#[derive(Debug, Clone)]
pub struct DocumentsClient {
    client: GatewayClient,
}

impl DocumentsClient {
    pub(crate) fn new(client: GatewayClient) -> Self {
        Self { client }
    }

    /// Semantic search across deal documents.
    pub async fn search<T, B>(&self, params: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client.post("/api/v1/documents/search", params).await
    }

    /// Fetches one document and its metadata.
    pub async fn get<T: DeserializeOwned>(
        &self,
        document_id: &str,
        include_full_text: bool,
    ) -> Result<T, GatewayError> {
        self.client
            .get_with_query(
                &format!("/api/v1/documents/{}", segment(document_id)),
                &json!({ "include_full_text": include_full_text }),
            )
            .await
    }

    /// Semantic search across the knowledge base.
    pub async fn search_knowledge<T, B>(&self, params: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client.post("/api/v1/knowledge/search", params).await
    }

    /// Fetches one knowledge base entry.
    pub async fn knowledge_entry<T: DeserializeOwned>(
        &self,
        entry_id: &str,
    ) -> Result<T, GatewayError> {
        self.client
            .get(&format!("/api/v1/knowledge/{}", segment(entry_id)))
            .await
    }
}
