//! Core library for dailyshelf.
//!
//! Picks a quick read, a quote of the day and a set of microlearning
//! stories once per calendar day, remembers them in device-local storage
//! and tracks which stories have been finished.

pub mod cache;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod content;
pub mod date;
pub mod error;
pub mod models;
pub mod onboarding;
pub mod selection;
pub mod store;
pub mod utils;

pub use cache::{CacheEntry, CacheStatus, DailyCache, Namespace, Selection, SelectionSource};
pub use catalog::Catalog;
pub use completion::CompletionTracker;
pub use config::Config;
pub use content::{ContentState, DailyContent, Story, TodaysContent};
pub use date::{Clock, DateKey, FixedClock, SystemClock};
pub use error::{SelectionError, StoreError};
pub use models::{Book, KeyPoint, Quote, QuoteSource};
pub use onboarding::OnboardingFlags;
pub use selection::{Candidate, PickOne, PickUpTo, QuoteOfDay, SelectionRule};
pub use store::{FileStore, KeyValueStore, MemoryStore};
