//! Layout errors.

/// Failure of a remote layout request.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Layout server returned an empty response")]
    EmptyResponse,
}
