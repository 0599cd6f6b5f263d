//! Error types for the TVMaze API client.

#[derive(Debug, thiserror::Error)]
pub enum TvMazeError {
    /// The search endpoint answered with a non-success status.
    #[error("Upstream error {status}: {reason}")]
    UpstreamStatus { status: u16, reason: String },
    /// The request could not be sent or its body could not be read.
    #[error("Upstream request failed")]
    Network(#[from] reqwest::Error),
}

impl TvMazeError {
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        Self::UpstreamStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
        }
    }
}
