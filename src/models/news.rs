use serde::{Deserialize, Serialize};

/// A news catalog entry, projected to the fields recommendations expose
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsArticle {
    pub news_id: String,
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl NewsArticle {
    pub fn new(
        news_id: impl Into<String>,
        category: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            news_id: news_id.into(),
            category: category.into(),
            title: title.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
