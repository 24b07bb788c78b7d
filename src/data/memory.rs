use crate::{
    data::{validate_catalog, DataSource, TableLoader},
    error::DataLoadError,
    models::{BehaviorRecord, NewsArticle},
};

/// Serves pre-built tables regardless of the requested source.
///
/// Useful for embedding callers that already hold the rows, and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTableLoader {
    behaviors: Vec<BehaviorRecord>,
    news: Vec<NewsArticle>,
}

impl InMemoryTableLoader {
    pub fn new(behaviors: Vec<BehaviorRecord>, news: Vec<NewsArticle>) -> Self {
        Self { behaviors, news }
    }
}

impl TableLoader for InMemoryTableLoader {
    fn load_behaviors(&self, _source: &DataSource) -> Result<Vec<BehaviorRecord>, DataLoadError> {
        Ok(self.behaviors.clone())
    }

    fn load_news(&self, source: &DataSource) -> Result<Vec<NewsArticle>, DataLoadError> {
        validate_catalog(&self.news, &source.to_string())?;
        Ok(self.news.clone())
    }
}
