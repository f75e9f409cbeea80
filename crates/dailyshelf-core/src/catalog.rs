//! Static book catalog.
//!
//! The catalog is the candidate pool for every daily pick. It is read from a
//! JSON array of books, normally `data/books.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::Book;

/// Locations tried when no catalog path is configured.
const DEFAULT_CATALOG_PATHS: [&str; 3] = [
    "data/books.json",
    "./data/books.json",
    "../data/books.json",
];

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let books: Vec<Book> =
            serde_json::from_str(json).context("Failed to parse book catalog")?;
        Ok(Self { books })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        let catalog = Self::from_json_str(&contents)
            .with_context(|| format!("Invalid catalog: {}", path.display()))?;
        debug!(path = %path.display(), count = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Load from `path` if given, otherwise from the first default location
    /// that exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let found = DEFAULT_CATALOG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .ok_or_else(|| anyhow::anyhow!("No book catalog found; pass --catalog <path>"))?;
        Self::load(&found)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn find(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
