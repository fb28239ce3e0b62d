use std::path::PathBuf;
use thiserror::Error;

/// Rejected annotation payloads.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed annotation json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{count} skeletons exceeds the limit of {max}")]
    TooManySkeletons { count: usize, max: usize },
    #[error("skeleton {skeleton}: {count} {what} exceeds the limit of {max}")]
    TooMany { skeleton: usize, what: &'static str, count: usize, max: usize },
    #[error("skeleton {skeleton}: edge topology {found:?} is not the fixed tree")]
    Topology { skeleton: usize, found: Vec<[usize; 2]> },
    #[error("skeleton {skeleton}: coordinate out of bounds")]
    OutOfBounds { skeleton: usize },
    #[error("skeleton {skeleton}: node {node} position and tag disagree on whether it was placed")]
    NodeTagMismatch { skeleton: usize, node: usize },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no images to annotate")]
    NoImages,
    #[error("{path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("{path}: {source}")]
    Data { path: PathBuf, #[source] source: DataError },
}
