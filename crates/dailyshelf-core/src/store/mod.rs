//! Device-local key-value storage.
//!
//! The cache treats the store as an opaque string-to-string map. Two
//! backends are provided:
//! - `MemoryStore`: process-local map, used in tests and ephemeral sessions
//! - `FileStore`: one file per key inside a data directory

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Asynchronous string-keyed, string-valued storage.
///
/// A `get` issued after a completed `set` on the same key must observe it.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key).await
    }
}
