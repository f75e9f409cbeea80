//! Home-screen daily content.
//!
//! `DailyContent` ties the three daily namespaces to the catalog and keeps
//! the microlearning completion flags in step with the selection. Callers
//! only ever see a ready payload or a pending state.

use tracing::{debug, info, warn};

use crate::cache::{DailyCache, Namespace, Selection};
use crate::catalog::Catalog;
use crate::completion::CompletionTracker;
use crate::date::Clock;
use crate::error::SelectionError;
use crate::models::{Book, Quote};
use crate::selection::{PickOne, PickUpTo, QuoteOfDay, SelectionRule};
use crate::store::KeyValueStore;

pub const QUICK_READ: &str = "quick_read";
pub const QUOTE_OF_DAY: &str = "quote_of_day";
pub const MICROLEARNING_SET: &str = "microlearning_set";

/// Number of microlearning stories drawn per day.
pub const DEFAULT_MICROLEARNING_COUNT: usize = 10;

/// What a screen renders: a payload, or a loading placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentState<T> {
    Ready(T),
    Pending,
}

impl<T> ContentState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, ContentState::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            ContentState::Ready(value) => Some(value),
            ContentState::Pending => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ContentState<U> {
        match self {
            ContentState::Ready(value) => ContentState::Ready(f(value)),
            ContentState::Pending => ContentState::Pending,
        }
    }
}

/// A microlearning story with its finished flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Story<'a> {
    pub book: &'a Book,
    pub completed: bool,
}

/// Everything the home screen shows for one day.
#[derive(Debug, Clone)]
pub struct TodaysContent<'a> {
    pub quick_read: ContentState<&'a Book>,
    pub quote: ContentState<Quote>,
    pub stories: ContentState<Vec<Story<'a>>>,
    /// Persistence warnings; content is still shown but will not survive a
    /// restart.
    pub warnings: Vec<String>,
}

pub struct DailyContent<S, C> {
    cache: DailyCache<S, C>,
    completion: CompletionTracker<S>,
    microlearning_count: usize,
    quick_read: Namespace,
    quote_of_day: Namespace,
    microlearning: Namespace,
}

impl<S, C> DailyContent<S, C>
where
    S: KeyValueStore + Clone,
    C: Clock,
{
    /// Wrap `cache` and load persisted completion flags.
    pub async fn open(cache: DailyCache<S, C>, microlearning_count: usize) -> Self {
        let mut completion = CompletionTracker::new(cache.store().clone());
        completion.load().await;
        Self {
            cache,
            completion,
            microlearning_count,
            quick_read: Namespace(QUICK_READ.to_string()),
            quote_of_day: Namespace(QUOTE_OF_DAY.to_string()),
            microlearning: Namespace(MICROLEARNING_SET.to_string()),
        }
    }

    pub fn cache(&self) -> &DailyCache<S, C> {
        &self.cache
    }

    pub fn completion(&self) -> &CompletionTracker<S> {
        &self.completion
    }

    pub fn namespaces(&self) -> [Namespace; 3] {
        [
            self.quick_read.clone(),
            self.quote_of_day.clone(),
            self.microlearning.clone(),
        ]
    }

    fn settle<T>(
        result: Result<Selection<T>, SelectionError>,
        warnings: &mut Vec<String>,
    ) -> Option<Selection<T>> {
        match result {
            Ok(selection) => {
                if let Some(reason) = selection.warning() {
                    warnings.push(reason.to_string());
                }
                Some(selection)
            }
            Err(e) => {
                debug!(error = %e, "Daily content pending");
                None
            }
        }
    }

    pub async fn quick_read<'a>(&self, catalog: &'a Catalog) -> ContentState<&'a Book> {
        let result = self
            .cache
            .get_or_create(&self.quick_read, catalog.books(), &PickOne::any::<Book>())
            .await;
        Self::settle(result, &mut Vec::new())
            .and_then(|s| catalog.find(&s.payload))
            .map_or(ContentState::Pending, ContentState::Ready)
    }

    pub async fn quote_of_day(&self, catalog: &Catalog) -> ContentState<Quote> {
        let result = self
            .cache
            .get_or_create(&self.quote_of_day, catalog.books(), &QuoteOfDay)
            .await;
        Self::settle(result, &mut Vec::new())
            .map_or(ContentState::Pending, |s| ContentState::Ready(s.payload))
    }

    pub async fn stories<'a>(&mut self, catalog: &'a Catalog) -> ContentState<Vec<Story<'a>>> {
        let rule = microlearning_rule(self.microlearning_count);
        let result = self
            .cache
            .get_or_create(&self.microlearning, catalog.books(), &rule)
            .await;
        match Self::settle(result, &mut Vec::new()) {
            Some(selection) => ContentState::Ready(self.apply_stories(catalog, selection).await),
            None => ContentState::Pending,
        }
    }

    /// Resolve all three namespaces. They are independent, so they are
    /// looked up concurrently.
    pub async fn today<'a>(&mut self, catalog: &'a Catalog) -> TodaysContent<'a> {
        let books = catalog.books();
        let quick_rule = PickOne::any::<Book>();
        let story_rule = microlearning_rule(self.microlearning_count);

        let (quick, quote, stories) = futures::join!(
            self.cache.get_or_create(&self.quick_read, books, &quick_rule),
            self.cache.get_or_create(&self.quote_of_day, books, &QuoteOfDay),
            self.cache.get_or_create(&self.microlearning, books, &story_rule),
        );

        let mut warnings = Vec::new();
        let quick_read = Self::settle(quick, &mut warnings)
            .and_then(|s| catalog.find(&s.payload))
            .map_or(ContentState::Pending, ContentState::Ready);
        let quote = Self::settle(quote, &mut warnings)
            .map_or(ContentState::Pending, |s| ContentState::Ready(s.payload));
        let stories = match Self::settle(stories, &mut warnings) {
            Some(selection) => ContentState::Ready(self.apply_stories(catalog, selection).await),
            None => ContentState::Pending,
        };

        TodaysContent {
            quick_read,
            quote,
            stories,
            warnings,
        }
    }

    /// Bring completion flags in line with the day's selection and pair
    /// each book with its flag.
    async fn apply_stories<'a>(
        &mut self,
        catalog: &'a Catalog,
        selection: Selection<Vec<String>>,
    ) -> Vec<Story<'a>> {
        let len = selection.payload.len();
        if selection.is_new() {
            info!(count = len, date = %selection.date_key, "New microlearning selection, resetting completion");
            self.completion.reset(len, selection.date_key.clone()).await;
        } else if !self.completion.is_current_for(&selection.date_key) {
            warn!(
                stored = ?self.completion.date_key(),
                date = %selection.date_key,
                "Completion state belongs to another day, resetting"
            );
            self.completion.reset(len, selection.date_key.clone()).await;
        } else if self.completion.len() != len {
            warn!(
                stored = self.completion.len(),
                expected = len,
                "Completion state does not match selection, resetting"
            );
            self.completion.reset(len, selection.date_key.clone()).await;
        }

        selection
            .payload
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                catalog.find(id).map(|book| Story {
                    book,
                    completed: self.completion.is_complete(index),
                })
            })
            .collect()
    }

    /// Record that story `index` of today's selection was read to the end.
    pub async fn mark_story_complete(&mut self, index: usize) {
        self.completion.mark_complete(index).await;
    }

    pub fn is_story_complete(&self, index: usize) -> bool {
        self.completion.is_complete(index)
    }

    /// Drop today's picks and completion flags.
    pub async fn reset(&mut self) -> Result<(), SelectionError> {
        for namespace in self.namespaces() {
            self.cache.invalidate(&namespace).await?;
        }
        self.completion.clear().await;
        Ok(())
    }

    /// Today's microlearning book ids, if a selection exists.
    pub async fn current_story_ids(&self) -> Option<Vec<String>> {
        self.cache.peek(&self.microlearning).await
    }
}

/// Rule used for microlearning; exposed so other consumers draw the same way.
pub fn microlearning_rule(count: usize) -> impl SelectionRule<Book, Payload = Vec<String>> {
    PickUpTo::new(count, Book::has_insights)
}
