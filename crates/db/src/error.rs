use thiserror::Error;

/// Failures raised by a document store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection is closed")]
    Closed,

    #[error("unsupported store endpoint '{0}'")]
    UnsupportedEndpoint(String),

    #[error("document is not a JSON object")]
    NotAnObject,
}
