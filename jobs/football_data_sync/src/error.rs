use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Missing env vars: {0}")]
    Config(String),
    #[error("FD error {status}")]
    UpstreamFetch { status: u16 },
    #[error("FD payload error: {0}")]
    UpstreamDecode(#[from] serde_json::Error),
    #[error("Storage {table} upsert error: {body}")]
    StorageWrite { table: String, body: String },
    #[error("Row encoding error: {0}")]
    Encode(serde_json::Error),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SyncError {
    /// Status returned by the HTTP trigger for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SyncError::UpstreamFetch { .. } | SyncError::UpstreamDecode(_) => StatusCode::BAD_GATEWAY,
            SyncError::Config(_)
            | SyncError::StorageWrite { .. }
            | SyncError::Encode(_)
            | SyncError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
