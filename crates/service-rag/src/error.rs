/// Error types for the retrieval core.
///
/// `Configuration` is fatal at startup: an index that failed to build must never serve
/// queries. `Embedding` and `InvalidQuery` are per-query and recoverable by the caller.
/// Application crates wrap `RagError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
