//! Error types.
//!
//! Playback itself never fails: the only fallible paths are loading the
//! algorithm catalog and writing to a persistence backend.

/// Result type for catalog loading.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error returned when an algorithm catalog cannot be loaded.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("malformed catalog json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed catalog toml: {0}")]
    Toml(String),

    #[error("duplicate algorithm name {name:?} in group {group}")]
    DuplicateName { group: usize, name: String },
}

/// Error returned by a persistence backend write.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
