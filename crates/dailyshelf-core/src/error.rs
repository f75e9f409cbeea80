use thiserror::Error;

/// Failures of a [`KeyValueStore`](crate::store::KeyValueStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum SelectionError {
    /// No eligible candidate in the pool; callers show a pending state.
    #[error("No eligible candidates for {namespace}")]
    EmptyPool { namespace: String },

    /// The store could not be read or written; the selection is ephemeral.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] StoreError),

    /// A persisted entry could not be parsed; handled as a cache miss.
    #[error("Failed to decode cached entry for {namespace}: {source}")]
    Decode {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Namespace must not be empty")]
    InvalidNamespace,
}

impl SelectionError {
    pub fn empty_pool(namespace: impl Into<String>) -> Self {
        SelectionError::EmptyPool {
            namespace: namespace.into(),
        }
    }

    /// True when the caller should show a loading/empty state and retry later.
    pub fn is_pending(&self) -> bool {
        matches!(self, SelectionError::EmptyPool { .. })
    }
}
