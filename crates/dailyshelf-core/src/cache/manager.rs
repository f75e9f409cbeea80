use std::fmt;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::date::{Clock, DateKey, SystemClock};
use crate::error::{SelectionError, StoreError};
use crate::selection::SelectionRule;
use crate::store::KeyValueStore;

/// Stable name of one cached daily concern. Doubles as the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(pub(crate) String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> Result<Self, SelectionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SelectionError::InvalidNamespace);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted form of a day's selection. Date key and payload live in one
/// value so they are always written together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub namespace: String,
    pub date_key: DateKey,
    pub payload: T,
}

impl<T> CacheEntry<T> {
    pub fn new(namespace: &Namespace, date_key: DateKey, payload: T) -> Self {
        Self {
            namespace: namespace.as_str().to_string(),
            date_key,
            payload,
        }
    }

    pub fn is_valid_for(&self, today: &DateKey) -> bool {
        self.date_key == *today
    }
}

/// How a returned payload was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSource {
    /// Served unchanged from today's persisted entry.
    CacheHit,
    /// Freshly drawn and persisted.
    Generated,
    /// Freshly drawn but not persisted because the store failed.
    Ephemeral { reason: String },
}

#[derive(Debug, Clone)]
pub struct Selection<T> {
    pub payload: T,
    pub date_key: DateKey,
    pub source: SelectionSource,
}

impl<T> Selection<T> {
    /// True when the payload was drawn during this call.
    pub fn is_new(&self) -> bool {
        !matches!(self.source, SelectionSource::CacheHit)
    }

    /// The persistence warning to surface, if any.
    pub fn warning(&self) -> Option<&str> {
        match &self.source {
            SelectionSource::Ephemeral { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Per-namespace daily selection cache over a key-value store.
pub struct DailyCache<S, C = SystemClock> {
    store: S,
    clock: C,
    rng: Mutex<StdRng>,
}

impl<S: KeyValueStore, C: Clock> DailyCache<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the random source, e.g. with a seeded generator in tests.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn today(&self) -> DateKey {
        self.clock.today_key()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    async fn load<T: DeserializeOwned>(
        &self,
        namespace: &Namespace,
    ) -> Result<Option<CacheEntry<T>>, SelectionError> {
        let Some(contents) = self.store.get(namespace.as_str()).await? else {
            return Ok(None);
        };
        let entry: CacheEntry<T> =
            serde_json::from_str(&contents).map_err(|source| SelectionError::Decode {
                namespace: namespace.to_string(),
                source,
            })?;
        if entry.namespace != namespace.as_str() {
            debug!(namespace = %namespace, found = %entry.namespace, "Entry belongs to another namespace");
            return Ok(None);
        }
        Ok(Some(entry))
    }

    async fn save<T: Serialize>(&self, entry: &CacheEntry<T>) -> Result<(), StoreError> {
        let contents = serde_json::to_string(entry)
            .map_err(|e| StoreError::Unavailable(format!("failed to encode entry: {}", e)))?;
        self.store.set(&entry.namespace, &contents).await
    }

    fn draw<I, R: SelectionRule<I>>(
        &self,
        namespace: &Namespace,
        pool: &[I],
        rule: &R,
    ) -> Result<R::Payload, SelectionError> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rule.select(pool, &mut *rng)
            .ok_or_else(|| SelectionError::empty_pool(namespace.as_str()))
    }

    /// Return today's payload for `namespace`, drawing and persisting a new
    /// one when the stored entry is absent, from another day, malformed, or
    /// no longer consistent with `pool`.
    ///
    /// Only `EmptyPool` is returned as an error. Store failures yield an
    /// ephemeral selection whose [`Selection::warning`] explains why.
    pub async fn get_or_create<I, R>(
        &self,
        namespace: &Namespace,
        pool: &[I],
        rule: &R,
    ) -> Result<Selection<R::Payload>, SelectionError>
    where
        R: SelectionRule<I>,
    {
        let today = self.today();
        let mut read_failure = None;

        match self.load::<R::Payload>(namespace).await {
            Ok(Some(entry)) if entry.is_valid_for(&today) => {
                if rule.is_consistent(pool, &entry.payload) {
                    debug!(namespace = %namespace, date = %today, "Daily selection cache hit");
                    return Ok(Selection {
                        payload: entry.payload,
                        date_key: today,
                        source: SelectionSource::CacheHit,
                    });
                }
                debug!(namespace = %namespace, "Cached selection no longer matches pool");
            }
            Ok(Some(entry)) => {
                debug!(namespace = %namespace, stored = %entry.date_key, date = %today, "Cached selection is stale");
            }
            Ok(None) => {
                debug!(namespace = %namespace, "No cached selection");
            }
            Err(SelectionError::PersistenceUnavailable(e)) => {
                warn!(namespace = %namespace, error = %e, "Store read failed, selection will not be persisted");
                read_failure = Some(e.to_string());
            }
            Err(e) => {
                debug!(namespace = %namespace, error = %e, "Discarding unreadable cached selection");
            }
        }

        let payload = self.draw(namespace, pool, rule)?;

        if let Some(reason) = read_failure {
            return Ok(Selection {
                payload,
                date_key: today,
                source: SelectionSource::Ephemeral { reason },
            });
        }

        let entry = CacheEntry::new(namespace, today, payload);
        let source = match self.save(&entry).await {
            Ok(()) => {
                debug!(namespace = %namespace, date = %entry.date_key, "Persisted new daily selection");
                SelectionSource::Generated
            }
            Err(e) => {
                warn!(namespace = %namespace, error = %e, "Failed to persist daily selection");
                SelectionSource::Ephemeral {
                    reason: e.to_string(),
                }
            }
        };

        Ok(Selection {
            payload: entry.payload,
            date_key: entry.date_key,
            source,
        })
    }

    /// Today's persisted payload, without drawing a new one.
    pub async fn peek<T: DeserializeOwned>(&self, namespace: &Namespace) -> Option<T> {
        let today = self.today();
        match self.load::<T>(namespace).await {
            Ok(Some(entry)) if entry.is_valid_for(&today) => Some(entry.payload),
            Ok(_) => None,
            Err(e) => {
                debug!(namespace = %namespace, error = %e, "Failed to peek cached selection");
                None
            }
        }
    }

    /// Date of the stored entry for `namespace`, whatever its validity.
    pub async fn entry_date(&self, namespace: &Namespace) -> Option<DateKey> {
        match self.load::<serde_json::Value>(namespace).await {
            Ok(entry) => entry.map(|e| e.date_key),
            Err(e) => {
                debug!(namespace = %namespace, error = %e, "Failed to load cache for date display");
                None
            }
        }
    }

    /// Drop the stored entry so the next query draws afresh.
    pub async fn invalidate(&self, namespace: &Namespace) -> Result<(), SelectionError> {
        self.store.remove(namespace.as_str()).await?;
        debug!(namespace = %namespace, "Invalidated daily selection");
        Ok(())
    }

    pub async fn status(&self, namespaces: &[Namespace]) -> CacheStatus {
        let today = self.today();
        let mut entries = Vec::with_capacity(namespaces.len());
        for namespace in namespaces {
            let date = self.entry_date(namespace).await;
            entries.push(NamespaceStatus {
                namespace: namespace.to_string(),
                fresh: date.as_ref() == Some(&today),
                date,
            });
        }
        CacheStatus { today, entries }
    }
}

#[derive(Debug, Clone)]
pub struct NamespaceStatus {
    pub namespace: String,
    pub date: Option<DateKey>,
    pub fresh: bool,
}

/// Snapshot of which namespaces hold today's selection.
#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub today: DateKey,
    pub entries: Vec<NamespaceStatus>,
}

impl CacheStatus {
    pub fn all_fresh(&self) -> bool {
        self.entries.iter().all(|e| e.fresh)
    }

    /// Human-readable date for a namespace, `"never"` when absent.
    pub fn date_display(&self, namespace: &str) -> String {
        self.entries
            .iter()
            .find(|e| e.namespace == namespace)
            .and_then(|e| e.date.as_ref())
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
