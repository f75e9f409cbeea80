//! Quote-of-the-day payload.

use serde::{Deserialize, Serialize};

use super::BookId;

/// A quoted insight together with its attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Quote {
    pub quote: String,
    pub author: String,
    pub source: QuoteSource,
}

/// Where in the catalog a quote was taken from, for "read more" navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct QuoteSource {
    pub book_id: BookId,
    pub key_point_index: usize,
    pub insight_index: usize,
}
