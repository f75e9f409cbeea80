//! Data models for the book catalog and the daily picks derived from it.
//!
//! - `Book`, `KeyPoint`: catalog entries as shipped in `books.json`
//! - `Quote`, `QuoteSource`: the composite quote-of-the-day payload

pub mod book;
pub mod quote;

pub use book::{Book, BookId, KeyPoint};
pub use quote::{Quote, QuoteSource};
