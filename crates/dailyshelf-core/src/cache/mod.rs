//! Daily selection cache.
//!
//! This module provides `DailyCache`, which hands out one randomly drawn
//! payload per namespace per calendar day. Entries are stored in a
//! `KeyValueStore` as JSON and are valid only on the day they were drawn.
//!
//! Namespaces used by the home screen:
//! - `quick_read`: one book id
//! - `quote_of_day`: a quoted insight with its source
//! - `microlearning_set`: up to ten book ids with insights

pub mod manager;

pub use manager::{
    CacheEntry, CacheStatus, DailyCache, Namespace, NamespaceStatus, Selection, SelectionSource,
};
