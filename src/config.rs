use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Behavior log location (`.tsv`, `.jsonl` or `.json`)
    #[serde(default = "default_behaviors_path")]
    pub behaviors_path: String,

    /// News catalog location (`.tsv`, `.jsonl` or `.json`)
    #[serde(default = "default_news_path")]
    pub news_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Apply the recency window unless a request overrides it
    #[serde(default = "default_use_recency")]
    pub use_recency: bool,

    #[serde(default = "default_recency_weeks")]
    pub recency_weeks: u32,

    /// Count used when a request does not specify one
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Upper bound on the requested count
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_behaviors_path() -> String {
    "data/behaviors.tsv".to_string()
}

fn default_news_path() -> String {
    "data/news.tsv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_use_recency() -> bool {
    true
}

fn default_recency_weeks() -> u32 {
    2
}

fn default_recommendations() -> usize {
    5
}

fn default_max_recommendations() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.max_recommendations == 0 {
            anyhow::bail!("MAX_RECOMMENDATIONS must be at least 1");
        }
        if !(1..=self.max_recommendations).contains(&self.default_recommendations) {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS must be between 1 and {}",
                self.max_recommendations
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.behaviors_path, "data/behaviors.tsv");
        assert_eq!(config.news_path, "data/news.tsv");
        assert_eq!(config.port, 3000);
        assert!(config.use_recency);
        assert_eq!(config.recency_weeks, 2);
        assert_eq!(config.default_recommendations, 5);
        assert_eq!(config.max_recommendations, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("BEHAVIORS_PATH", "/srv/mind/behaviors.tsv"),
            ("USE_RECENCY", "false"),
            ("RECENCY_WEEKS", "4"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.behaviors_path, "/srv/mind/behaviors.tsv");
        assert!(!config.use_recency);
        assert_eq!(config.recency_weeks, 4);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_default_count_must_fit_maximum() {
        let config = from_pairs(&[
            ("DEFAULT_RECOMMENDATIONS", "30"),
            ("MAX_RECOMMENDATIONS", "20"),
        ])
        .unwrap();
        assert!(config.validate().is_err());

        let zero = from_pairs(&[("DEFAULT_RECOMMENDATIONS", "0")]).unwrap();
        assert!(zero.validate().is_err());
    }
}
