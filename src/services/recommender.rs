use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

use chrono::{Duration, NaiveDateTime};
use tracing::instrument;

use crate::{
    data::{DataSource, TableLoader},
    error::DataLoadError,
    models::{BehaviorRecord, NewsArticle, NoResultReason, RecommendationOutcome},
};

pub const DEFAULT_RECENCY_WEEKS: i64 = 2;

/// Recency settings for a recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendOptions {
    /// Restrict analysis to records within `recency_window` of the user's latest session
    pub use_recency: bool,
    pub recency_window: Duration,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            use_recency: true,
            recency_window: Duration::weeks(DEFAULT_RECENCY_WEEKS),
        }
    }
}

/// Loads both tables and recommends unseen articles from the user's most-read category.
///
/// Only a failure to load the tables is an error. Every other way of coming up empty
/// (unknown user, empty window, no category signal, nothing unseen) is an
/// `Ok(RecommendationOutcome::NoResult)` with a rationale.
#[instrument(skip_all, fields(user_id = %user_id, n = n.get()))]
pub fn recommend(
    loader: &dyn TableLoader,
    user_id: &str,
    n: NonZeroUsize,
    behaviors_source: &DataSource,
    news_source: &DataSource,
    options: &RecommendOptions,
) -> Result<RecommendationOutcome, DataLoadError> {
    let behaviors = loader.load_behaviors(behaviors_source)?;
    let catalog = loader.load_news(news_source)?;

    Ok(recommend_from_tables(
        &behaviors, &catalog, user_id, n, options,
    ))
}

/// Category-frequency recommendation over already-loaded tables.
///
/// Candidates keep catalog order. When categories tie on frequency, the one whose first
/// resolved view comes earliest in the user's concatenated history wins.
pub fn recommend_from_tables(
    behaviors: &[BehaviorRecord],
    catalog: &[NewsArticle],
    user_id: &str,
    n: NonZeroUsize,
    options: &RecommendOptions,
) -> RecommendationOutcome {
    let user_records: Vec<&BehaviorRecord> = behaviors
        .iter()
        .filter(|record| record.user_id == user_id)
        .collect();

    if user_records.is_empty() {
        tracing::debug!(user_id, "No behavior records for user");
        return no_result(
            NoResultReason::NoHistoryForUser,
            format!("No behavior records found for user {}", user_id),
        );
    }

    let (selected, recency_applied) = select_recent(&user_records, options);

    tracing::debug!(
        user_id,
        total_records = user_records.len(),
        selected_records = selected.len(),
        recency_applied,
        "Selected behavior records"
    );

    let viewed: Vec<&str> = selected
        .iter()
        .flat_map(|record| record.history_ids())
        .collect();

    if viewed.is_empty() {
        let rationale = if recency_applied {
            format!(
                "User {} has no reading history in the last {}.",
                user_id,
                describe_window(options.recency_window)
            )
        } else {
            format!("User {} has no reading history.", user_id)
        };
        return no_result(
            NoResultReason::NoHistoryInWindow { recency_applied },
            rationale,
        );
    }

    let category_by_id: HashMap<&str, &str> = catalog
        .iter()
        .map(|article| (article.news_id.as_str(), article.category.as_str()))
        .collect();

    let resolved: Vec<&str> = viewed
        .iter()
        .filter_map(|id| category_by_id.get(id).copied())
        .collect();

    let dropped = viewed.len() - resolved.len();
    if dropped > 0 {
        tracing::debug!(
            user_id,
            dropped,
            viewed = viewed.len(),
            "Viewed articles missing from catalog"
        );
    }

    let Some(top_category) = most_frequent(&resolved) else {
        return no_result(
            NoResultReason::NoCategorySignal,
            "No category information found for the user's history.".to_string(),
        );
    };

    let read_ids: HashSet<&str> = viewed.iter().copied().collect();
    let items: Vec<NewsArticle> = catalog
        .iter()
        .filter(|article| {
            article.category == top_category && !read_ids.contains(article.news_id.as_str())
        })
        .take(n.get())
        .cloned()
        .collect();

    if items.is_empty() {
        tracing::debug!(user_id, category = top_category, "No unseen articles in category");
        return no_result(
            NoResultReason::NoUnseenCandidates {
                category: top_category.to_string(),
            },
            format!(
                "Based on your history, you appear to favor {} news, \
                 but no unseen articles remain in that category.",
                top_category
            ),
        );
    }

    tracing::info!(
        user_id,
        category = top_category,
        returned = items.len(),
        "Recommendations computed"
    );

    let rationale = format!(
        "Based on your reading history, you appear to favor {} news. \
         Here {} {} {} you haven't read yet:",
        top_category,
        if items.len() == 1 { "is" } else { "are" },
        items.len(),
        if items.len() == 1 { "article" } else { "articles" },
    );

    RecommendationOutcome::Articles {
        category: top_category.to_string(),
        items,
        rationale,
    }
}

/// Applies the recency window when enabled and at least one timestamp parses.
///
/// Records without a valid timestamp do not survive an applied window. Returns the
/// selected records and whether the window was applied.
fn select_recent<'a>(
    records: &[&'a BehaviorRecord],
    options: &RecommendOptions,
) -> (Vec<&'a BehaviorRecord>, bool) {
    let timed: Vec<(&BehaviorRecord, Option<NaiveDateTime>)> = records
        .iter()
        .map(|record| (*record, record.parsed_timestamp()))
        .collect();

    let latest = timed.iter().filter_map(|(_, timestamp)| *timestamp).max();

    match latest {
        Some(latest) if options.use_recency => {
            let threshold = latest
                .checked_sub_signed(options.recency_window)
                .unwrap_or(NaiveDateTime::MIN);

            let selected = timed
                .into_iter()
                .filter(|(_, timestamp)| timestamp.is_some_and(|t| t >= threshold))
                .map(|(record, _)| record)
                .collect();
            (selected, true)
        }
        _ => (records.to_vec(), false),
    }
}

/// Most frequent value; ties go to the value seen first
fn most_frequent<'a>(values: &[&'a str]) -> Option<&'a str> {
    let mut counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        counts.entry(*value).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Human-readable window length, e.g. "2 weeks" or "36 hours"
fn describe_window(window: Duration) -> String {
    const UNITS: &[(i64, &str)] = &[
        (604_800, "week"),
        (86_400, "day"),
        (3_600, "hour"),
        (60, "minute"),
    ];

    let seconds = window.num_seconds();
    let (amount, unit) = UNITS
        .iter()
        .find(|(size, _)| seconds >= *size && seconds % size == 0)
        .map(|(size, unit)| (seconds / size, *unit))
        .unwrap_or((seconds, "second"));

    format!("{} {}{}", amount, unit, if amount == 1 { "" } else { "s" })
}

fn no_result(reason: NoResultReason, rationale: String) -> RecommendationOutcome {
    RecommendationOutcome::NoResult { reason, rationale }
}
