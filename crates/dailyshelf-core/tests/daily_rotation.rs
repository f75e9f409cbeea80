//! End-to-end behaviour of the daily selection cache against real stores.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use dailyshelf_core::content::{microlearning_rule, MICROLEARNING_SET};
use dailyshelf_core::{
    Book, Catalog, CacheEntry, ContentState, DailyCache, DailyContent, FileStore, FixedClock,
    KeyPoint, KeyValueStore, MemoryStore, Namespace, QuoteOfDay, SelectionSource, StoreError,
};

fn book(id: usize, with_insights: bool) -> Book {
    Book {
        id: id.to_string(),
        title: format!("Title {}", id),
        author: format!("Author {}", id),
        category: "Productivity".to_string(),
        cover: None,
        overview: None,
        about_author: None,
        status: None,
        key_points: vec![KeyPoint {
            id: "1".to_string(),
            title: "Key point".to_string(),
            summary: String::new(),
            insights: if with_insights {
                vec![format!("Insight {}", id)]
            } else {
                Vec::new()
            },
        }],
    }
}

/// Twelve books, the first five with insights.
fn twelve_books() -> Vec<Book> {
    (0..12).map(|i| book(i, i < 5)).collect()
}

fn may(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn microlearning() -> Namespace {
    Namespace::new(MICROLEARNING_SET).unwrap()
}

#[tokio::test]
async fn small_eligible_pool_returns_every_eligible_book() {
    let cache = DailyCache::new(MemoryStore::new(), FixedClock::new(may(30)))
        .with_rng(StdRng::seed_from_u64(1));
    let pool = twelve_books();

    let selection = cache
        .get_or_create(&microlearning(), &pool, &microlearning_rule(10))
        .await
        .unwrap();

    let mut ids = selection.payload.clone();
    ids.sort();
    assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
}

#[tokio::test]
async fn ineligible_books_never_selected_across_many_days() {
    let clock = Arc::new(FixedClock::new(may(1)));
    let cache = DailyCache::new(MemoryStore::new(), clock.clone())
        .with_rng(StdRng::seed_from_u64(2024));
    let pool = twelve_books();

    for _ in 0..100 {
        let selection = cache
            .get_or_create(&microlearning(), &pool, &microlearning_rule(3))
            .await
            .unwrap();
        assert!(selection.is_new());
        for id in &selection.payload {
            let chosen = pool.iter().find(|b| &b.id == id).unwrap();
            assert!(chosen.has_insights(), "book {} has no insights", id);
        }

        let quote = cache
            .get_or_create(&Namespace::new("quote_of_day").unwrap(), &pool, &QuoteOfDay)
            .await
            .unwrap();
        let source = pool.iter().find(|b| b.id == quote.payload.source.book_id).unwrap();
        assert!(source.has_insights());

        clock.advance_days(1);
    }
}

#[tokio::test]
async fn corrupted_entry_is_overwritten_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    store.set(MICROLEARNING_SET, "{not valid json").await.unwrap();

    let cache = DailyCache::new(store.clone(), FixedClock::new(may(30)));
    let pool = twelve_books();
    let selection = cache
        .get_or_create(&microlearning(), &pool, &microlearning_rule(10))
        .await
        .unwrap();
    assert_eq!(selection.source, SelectionSource::Generated);

    let raw = store.get(MICROLEARNING_SET).await.unwrap().unwrap();
    let entry: CacheEntry<Vec<String>> = serde_json::from_str(&raw).unwrap();
    assert_eq!(entry.payload, selection.payload);
}

#[tokio::test]
async fn file_store_keeps_selection_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let pool = twelve_books();

    let first = {
        let store = FileStore::open(dir.path()).await.unwrap();
        DailyCache::new(store, FixedClock::new(may(30)))
            .get_or_create(&microlearning(), &pool, &microlearning_rule(10))
            .await
            .unwrap()
    };

    let store = FileStore::open(dir.path()).await.unwrap();
    let second = DailyCache::new(store, FixedClock::new(may(30)))
        .get_or_create(&microlearning(), &pool, &microlearning_rule(10))
        .await
        .unwrap();

    assert_eq!(first.payload, second.payload);
    assert_eq!(second.source, SelectionSource::CacheHit);
}

/// Store whose reads always fail; counts write attempts.
#[derive(Default)]
struct BrokenStore {
    writes: AtomicUsize,
}

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("simulated I/O error")))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn read_failure_still_yields_eligible_payload_without_persisting() {
    let store = Arc::new(BrokenStore::default());
    let cache = DailyCache::new(store.clone(), FixedClock::new(may(30)));
    let pool = twelve_books();

    let selection = cache
        .get_or_create(&microlearning(), &pool, &microlearning_rule(10))
        .await
        .unwrap();

    assert!(!selection.payload.is_empty());
    assert!(selection.warning().is_some());
    assert!(selection
        .payload
        .iter()
        .all(|id| pool.iter().any(|b| &b.id == id && b.has_insights())));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn home_screen_surfaces_persistence_warning() {
    let store = Arc::new(BrokenStore::default());
    let cache = DailyCache::new(store, FixedClock::new(may(30)));
    let mut content = DailyContent::open(cache, 10).await;
    let catalog = Catalog::new(twelve_books());

    let today = content.today(&catalog).await;
    assert!(today.quick_read.is_ready());
    assert!(today.quote.is_ready());
    assert_eq!(today.stories.map(|s| s.len()), ContentState::Ready(5));
    assert_eq!(today.warnings.len(), 3);
}

#[tokio::test]
async fn completion_resets_when_day_rolls_over() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(may(30)));
    let catalog = Catalog::new(twelve_books());

    let cache = DailyCache::new(store.clone(), clock.clone());
    let mut content = DailyContent::open(cache, 10).await;
    content.today(&catalog).await;
    for i in 0..5 {
        content.mark_story_complete(i).await;
    }
    assert_eq!(content.completion().completed_count(), 5);

    clock.advance_days(1);
    let reopened = DailyCache::new(store, clock);
    let mut content = DailyContent::open(reopened, 10).await;
    assert_eq!(content.completion().completed_count(), 5);

    let today = content.today(&catalog).await;
    let stories = today.stories.ready().unwrap();
    assert_eq!(stories.len(), 5);
    assert!(stories.iter().all(|s| !s.completed));
    assert_eq!(content.completion().flags(), &[false; 5]);
}
