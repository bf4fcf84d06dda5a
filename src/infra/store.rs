//! REST adapter for the hosted document store.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use crate::application::store::{DocumentStore, StoreError};
use crate::config::StoreSettings;
use crate::domain::collections::CollectionName;
use crate::domain::wire::{ListDocumentsResponse, WireDocument};

use super::error::InfraError;

/// Lists documents with a single unparameterised GET per collection.
#[derive(Clone, Debug)]
pub struct RestDocumentStore {
    client: Client,
    endpoint: Url,
    project_id: String,
}

impl RestDocumentStore {
    pub fn new(settings: &StoreSettings) -> Result<Self, InfraError> {
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            project_id: settings.project_id.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("showcase/", env!("CARGO_PKG_VERSION"))
    }

    /// `{endpoint}/projects/{project}/databases/(default)/documents/{collection}`
    pub fn collection_url(&self, collection: &CollectionName) -> Result<Url, StoreError> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let raw = format!(
            "{base}/projects/{}/databases/(default)/documents/{collection}",
            self.project_id
        );
        Url::parse(&raw).map_err(StoreError::transport)
    }

    async fn handle(resp: Response) -> Result<Vec<WireDocument>, StoreError> {
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(StoreError::transport)?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        let body: ListDocumentsResponse =
            serde_json::from_slice(&bytes).map_err(StoreError::decode)?;
        Ok(body.documents)
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn list_documents(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<WireDocument>, StoreError> {
        let url = self.collection_url(collection)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(StoreError::transport)?;
        Self::handle(resp).await
    }
}
