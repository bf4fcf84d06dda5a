//! Port for reading collections from the document store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::collections::CollectionName;
use crate::domain::wire::WireDocument;

/// Any failure to obtain a collection. Callers treat every variant the
/// same way; the variants only make logs more useful.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    /// Short label used as a log field and metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Transport(_) => "transport",
            StoreError::Status { .. } => "status",
            StoreError::Decode(_) => "decode",
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in `collection`, in store order.
    async fn list_documents(
        &self,
        collection: &CollectionName,
    ) -> Result<Vec<WireDocument>, StoreError>;
}
