use std::sync::Arc;

use crate::{
    config::Config,
    data::{DataSource, FileTableLoader, TableLoader},
};

/// Request defaults and limits applied by the handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationSettings {
    pub use_recency: bool,
    pub recency_weeks: u32,
    pub default_count: usize,
    pub max_count: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            use_recency: true,
            recency_weeks: 2,
            default_count: 5,
            max_count: 20,
        }
    }
}

/// Shared application state
///
/// Read-only: the tables are reloaded through `loader` on every request.
#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<dyn TableLoader>,
    pub behaviors: DataSource,
    pub news: DataSource,
    pub settings: RecommendationSettings,
}

impl AppState {
    pub fn new(
        loader: Arc<dyn TableLoader>,
        behaviors: DataSource,
        news: DataSource,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            loader,
            behaviors,
            news,
            settings,
        }
    }

    /// File-backed state for the configured table paths
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(FileTableLoader::new()),
            DataSource::new(&config.behaviors_path),
            DataSource::new(&config.news_path),
            RecommendationSettings {
                use_recency: config.use_recency,
                recency_weeks: config.recency_weeks,
                default_count: config.default_recommendations,
                max_count: config.max_recommendations,
            },
        )
    }
}
