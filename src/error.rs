//! Error types, one enum per concern.

use thiserror::Error;

/// Failures of the key-value backend. The plant store never hands these to
/// its callers; they are logged and replaced by defaults.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("failed to open database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("stored value is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the remote recognizer. All of them trigger the catalog fallback.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response carried no candidate text")]
    EmptyResponse,

    #[error("response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response violates the schema: {0}")]
    Schema(String),
}

/// Raised only when even the catalog fallback cannot produce a result.
#[derive(Debug, Error)]
pub enum IdentifyError {
    #[error("plant catalog for '{0}' is empty")]
    EmptyCatalog(crate::models::Language),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image is not a base64 data URI")]
    NotDataUri,

    #[error("image payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image is empty")]
    Empty,
}

/// Preconditions of controller transitions that a view violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("no plant with id '{0}'")]
    PlantNotFound(String),

    #[error("there is no identification waiting to be saved")]
    NothingPending,

    #[error("an analysis is already running")]
    AnalysisRunning,

    #[error("the scanner is not open")]
    ScannerClosed,

    #[error("no catalog entry at index {0}")]
    CatalogIndex(usize),
}
