use crate::types::{BatchRequest, TabId, ValueRange};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Tab not found: {title}")]
    TabNotFound { title: String },

    #[error("Unknown tab id: {tab_id}")]
    UnknownTabId { tab_id: TabId },

    #[error("Invalid range: {range}")]
    InvalidRange { range: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },
}

pub type SheetsResult<T> = Result<T, SheetsError>;

/// The spreadsheet backend as seen by the report builders
///
/// Implementations own transport, authentication and retries. Callers
/// await each call before issuing the next one.
#[async_trait]
pub trait SheetsProvider: Send + Sync {
    /// Map a tab title to its stable numeric id
    async fn resolve_tab_id(&self, title: &str) -> SheetsResult<TabId>;

    /// Rows previously written to a tab
    async fn fetch_tab_values(&self, tab_id: TabId) -> SheetsResult<Vec<Vec<String>>>;

    /// Append rows below the last non-empty row, returns the number appended
    async fn append_rows(&self, tab_title: &str, rows: Vec<Vec<String>>) -> SheetsResult<usize>;

    async fn update_values(&self, update: ValueRange) -> SheetsResult<()>;

    /// Apply requests in order, returns the number applied
    async fn batch_update(&self, requests: Vec<BatchRequest>) -> SheetsResult<usize>;

    fn provider_name(&self) -> &'static str;
}
