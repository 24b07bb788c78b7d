use serde::de::DeserializeOwned;

use crate::{
    data::{validate_catalog, DataSource, TableFormat, TableLoader},
    error::DataLoadError,
    models::{BehaviorRecord, NewsArticle},
};

// MIND behaviors.tsv: impression_id, user_id, time, history, impressions
const BEHAVIOR_USER_COLUMN: usize = 1;
const BEHAVIOR_TIME_COLUMN: usize = 2;
const BEHAVIOR_HISTORY_COLUMN: usize = 3;

// MIND news.tsv: news_id, category, subcategory, title, abstract, url, title_entities, abstract_entities
const NEWS_ID_COLUMN: usize = 0;
const NEWS_CATEGORY_COLUMN: usize = 1;
const NEWS_TITLE_COLUMN: usize = 3;
const NEWS_URL_COLUMN: usize = 5;

/// Loads tables from files on disk (MIND TSV, JSON Lines or JSON arrays)
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTableLoader;

impl FileTableLoader {
    pub fn new() -> Self {
        Self
    }
}

impl TableLoader for FileTableLoader {
    fn load_behaviors(&self, source: &DataSource) -> Result<Vec<BehaviorRecord>, DataLoadError> {
        let format = source.resolve_format()?;
        let contents = read_source(source)?;
        let location = source.to_string();

        let records = match format {
            TableFormat::Tsv => parse_behaviors_tsv(&contents, &location)?,
            TableFormat::JsonLines => parse_json_lines(&contents, &location)?,
            TableFormat::Json => parse_json_array(&contents, &location)?,
        };

        tracing::info!(source = %source, rows = records.len(), "Loaded behavior log");
        Ok(records)
    }

    fn load_news(&self, source: &DataSource) -> Result<Vec<NewsArticle>, DataLoadError> {
        let format = source.resolve_format()?;
        let contents = read_source(source)?;
        let location = source.to_string();

        let articles = match format {
            TableFormat::Tsv => parse_news_tsv(&contents, &location)?,
            TableFormat::JsonLines => parse_json_lines(&contents, &location)?,
            TableFormat::Json => parse_json_array(&contents, &location)?,
        };

        validate_catalog(&articles, &location)?;

        tracing::info!(source = %source, rows = articles.len(), "Loaded news catalog");
        Ok(articles)
    }
}

fn read_source(source: &DataSource) -> Result<String, DataLoadError> {
    std::fs::read_to_string(&source.location).map_err(|error| DataLoadError::Io {
        location: source.to_string(),
        error,
    })
}

/// Non-blank lines split on tabs, paired with their 1-based line number
fn tsv_rows(contents: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_no, line)| (line_no, line.split('\t').collect()))
}

fn column<'a>(
    row: &[&'a str],
    index: usize,
    name: &'static str,
    location: &str,
    line: usize,
) -> Result<&'a str, DataLoadError> {
    row.get(index)
        .copied()
        .ok_or_else(|| DataLoadError::MissingColumn {
            location: location.to_string(),
            line,
            column: name,
        })
}

/// Empty cells are missing values
fn optional_column(row: &[&str], index: usize) -> Option<String> {
    row.get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_behaviors_tsv(contents: &str, location: &str) -> Result<Vec<BehaviorRecord>, DataLoadError> {
    tsv_rows(contents)
        .map(|(line, row)| -> Result<BehaviorRecord, DataLoadError> {
            let user_id = column(&row, BEHAVIOR_USER_COLUMN, "user_id", location, line)?;
            // The history column must be present even when empty
            column(&row, BEHAVIOR_HISTORY_COLUMN, "history", location, line)?;

            Ok(BehaviorRecord {
                user_id: user_id.trim().to_string(),
                timestamp: optional_column(&row, BEHAVIOR_TIME_COLUMN),
                history: optional_column(&row, BEHAVIOR_HISTORY_COLUMN),
            })
        })
        .collect()
}

fn parse_news_tsv(contents: &str, location: &str) -> Result<Vec<NewsArticle>, DataLoadError> {
    tsv_rows(contents)
        .map(|(line, row)| -> Result<NewsArticle, DataLoadError> {
            let news_id = column(&row, NEWS_ID_COLUMN, "news_id", location, line)?;
            let category = column(&row, NEWS_CATEGORY_COLUMN, "category", location, line)?;
            let title = column(&row, NEWS_TITLE_COLUMN, "title", location, line)?;

            Ok(NewsArticle {
                news_id: news_id.trim().to_string(),
                category: category.trim().to_string(),
                title: title.to_string(),
                url: optional_column(&row, NEWS_URL_COLUMN),
            })
        })
        .collect()
}

fn parse_json_lines<T: DeserializeOwned>(
    contents: &str,
    location: &str,
) -> Result<Vec<T>, DataLoadError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| DataLoadError::Parse {
                location: location.to_string(),
                line: index + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

fn parse_json_array<T: DeserializeOwned>(
    contents: &str,
    location: &str,
) -> Result<Vec<T>, DataLoadError> {
    serde_json::from_str(contents).map_err(|e| DataLoadError::Parse {
        location: location.to_string(),
        line: e.line(),
        message: e.to_string(),
    })
}
