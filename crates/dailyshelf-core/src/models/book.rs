//! Catalog book and key point models.

use serde::{Deserialize, Deserializer, Serialize};

pub type BookId = String;

/// Catalog ids appear as numbers or strings; both become strings.
fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// A summarised book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Book {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub key_points: Vec<KeyPoint>,
}

/// One chapter-like section of a book summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct KeyPoint {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl KeyPoint {
    pub fn has_insights(&self) -> bool {
        !self.insights.is_empty()
    }
}

impl Book {
    /// True when at least one key point carries at least one insight.
    /// Only such books can be shown as microlearning stories or quoted.
    pub fn has_insights(&self) -> bool {
        self.key_points.iter().any(KeyPoint::has_insights)
    }

    /// All insights in key point order, as shown in the story viewer.
    pub fn insights(&self) -> impl Iterator<Item = &str> {
        self.key_points
            .iter()
            .flat_map(|kp| kp.insights.iter().map(String::as_str))
    }
}
