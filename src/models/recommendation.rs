use serde::Serialize;
use std::fmt::Display;

use super::NewsArticle;

/// Why a recommendation request produced no articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoResultReason {
    /// The user ID does not appear in the behavior log
    NoHistoryForUser,
    /// The selected records carry no viewed articles
    NoHistoryInWindow { recency_applied: bool },
    /// None of the viewed articles exist in the catalog
    NoCategorySignal,
    /// Every article in the favourite category was already viewed
    NoUnseenCandidates { category: String },
}

impl NoResultReason {
    /// Stable snake_case tag for API responses
    pub fn code(&self) -> &'static str {
        match self {
            NoResultReason::NoHistoryForUser => "no_history_for_user",
            NoResultReason::NoHistoryInWindow { .. } => "no_history_in_window",
            NoResultReason::NoCategorySignal => "no_category_signal",
            NoResultReason::NoUnseenCandidates { .. } => "no_unseen_candidates",
        }
    }
}

impl Display for NoResultReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Outcome of a category-frequency recommendation.
///
/// Both variants carry a human-readable rationale; callers display it either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationOutcome {
    Articles {
        category: String,
        items: Vec<NewsArticle>,
        rationale: String,
    },
    NoResult {
        reason: NoResultReason,
        rationale: String,
    },
}

impl RecommendationOutcome {
    pub fn rationale(&self) -> &str {
        match self {
            RecommendationOutcome::Articles { rationale, .. }
            | RecommendationOutcome::NoResult { rationale, .. } => rationale,
        }
    }

    /// Recommended articles; empty for a no-result outcome
    pub fn items(&self) -> &[NewsArticle] {
        match self {
            RecommendationOutcome::Articles { items, .. } => items.as_slice(),
            RecommendationOutcome::NoResult { .. } => &[],
        }
    }

    /// The favourite category, when one was identified
    pub fn category(&self) -> Option<&str> {
        match self {
            RecommendationOutcome::Articles { category, .. } => Some(category.as_str()),
            RecommendationOutcome::NoResult {
                reason: NoResultReason::NoUnseenCandidates { category },
                ..
            } => Some(category.as_str()),
            RecommendationOutcome::NoResult { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&NoResultReason> {
        match self {
            RecommendationOutcome::Articles { .. } => None,
            RecommendationOutcome::NoResult { reason, .. } => Some(reason),
        }
    }

    pub fn has_items(&self) -> bool {
        matches!(self, RecommendationOutcome::Articles { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(NoResultReason::NoHistoryForUser.code(), "no_history_for_user");
        assert_eq!(
            NoResultReason::NoHistoryInWindow { recency_applied: true }.to_string(),
            "no_history_in_window"
        );
        assert_eq!(NoResultReason::NoCategorySignal.code(), "no_category_signal");
    }

    #[test]
    fn test_reason_serde_tagged() {
        let reason = NoResultReason::NoUnseenCandidates {
            category: "sports".to_string(),
        };
        let json = serde_json::to_string(&reason).unwrap();
        assert_eq!(json, r#"{"kind":"no_unseen_candidates","category":"sports"}"#);
    }

    #[test]
    fn test_no_unseen_outcome_exposes_category() {
        let outcome = RecommendationOutcome::NoResult {
            reason: NoResultReason::NoUnseenCandidates {
                category: "sports".to_string(),
            },
            rationale: "nothing left".to_string(),
        };
        assert_eq!(outcome.category(), Some("sports"));
        assert!(outcome.items().is_empty());
        assert!(!outcome.has_items());
    }

    #[test]
    fn test_articles_outcome_accessors() {
        let outcome = RecommendationOutcome::Articles {
            category: "news".to_string(),
            items: vec![NewsArticle::new("N1", "news", "Title")],
            rationale: "because".to_string(),
        };
        assert_eq!(outcome.items().len(), 1);
        assert_eq!(outcome.rationale(), "because");
        assert_eq!(outcome.reason(), None);
        assert!(outcome.has_items());
    }
}
