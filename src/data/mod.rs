//! Table loading for the behavior log and news catalog
//!
//! The recommender only depends on the column contracts of the two tables. Where the
//! rows come from (MIND TSV dumps, JSON exports, in-memory fixtures) is the business
//! of a `TableLoader` implementation.

use std::collections::HashSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::{
    error::DataLoadError,
    models::{BehaviorRecord, NewsArticle},
};

pub mod file;
pub mod memory;

pub use file::FileTableLoader;
pub use memory::InMemoryTableLoader;

/// Physical layout of a table source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Headerless tab-separated rows in the MIND dataset column order
    Tsv,
    /// One JSON object per line
    JsonLines,
    /// A single JSON array of objects
    Json,
}

impl TableFormat {
    /// Infers the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "tsv" => Some(TableFormat::Tsv),
            "jsonl" | "ndjson" => Some(TableFormat::JsonLines),
            "json" => Some(TableFormat::Json),
            _ => None,
        }
    }
}

/// Opaque location of one input table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub location: PathBuf,
    /// Explicit format; inferred from the extension when absent
    pub format: Option<TableFormat>,
}

impl DataSource {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            format: None,
        }
    }

    /// Resolves the table format, failing for unrecognised extensions
    pub fn resolve_format(&self) -> Result<TableFormat, DataLoadError> {
        self.format
            .or_else(|| TableFormat::from_path(&self.location))
            .ok_or_else(|| DataLoadError::UnsupportedFormat {
                location: self.to_string(),
            })
    }
}

impl Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location.display())
    }
}

/// Loader collaborator for the two input tables
///
/// Implementations must be safe for concurrent read-only use. Tables are loaded in
/// full on every call; callers own any caching across calls.
#[cfg_attr(test, mockall::automock)]
pub trait TableLoader: Send + Sync {
    /// Loads the full behavior log
    fn load_behaviors(&self, source: &DataSource) -> Result<Vec<BehaviorRecord>, DataLoadError>;

    /// Loads the full news catalog, validated by `validate_catalog`
    fn load_news(&self, source: &DataSource) -> Result<Vec<NewsArticle>, DataLoadError>;
}

/// Checks the catalog invariants: non-empty, unique `news_id`s and non-empty categories
pub fn validate_catalog(articles: &[NewsArticle], location: &str) -> Result<(), DataLoadError> {
    let mut seen = HashSet::with_capacity(articles.len());

    for (index, article) in articles.iter().enumerate() {
        if article.news_id.trim().is_empty() {
            return Err(DataLoadError::Invalid {
                location: location.to_string(),
                message: format!("row {} has an empty news_id", index + 1),
            });
        }
        if article.category.trim().is_empty() {
            return Err(DataLoadError::Invalid {
                location: location.to_string(),
                message: format!("article {} has an empty category", article.news_id),
            });
        }
        if !seen.insert(article.news_id.as_str()) {
            return Err(DataLoadError::DuplicateNewsId {
                location: location.to_string(),
                news_id: article.news_id.clone(),
            });
        }
    }

    Ok(())
}
