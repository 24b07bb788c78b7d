use std::num::NonZeroUsize;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{NewsArticle, RecommendationOutcome},
    services::{self, RecommendOptions},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub n: Option<usize>,
    pub use_recency: Option<bool>,
    pub recency_weeks: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: String,
    pub n: Option<usize>,
    pub use_recency: Option<bool>,
    pub recency_weeks: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_id: String,
    /// Favourite category, when one was identified
    pub category: Option<String>,
    pub items: Vec<NewsArticle>,
    pub rationale: String,
    /// Tag explaining an empty result; `null` when items were returned
    pub reason: Option<&'static str>,
}

impl RecommendationResponse {
    fn new(user_id: String, outcome: RecommendationOutcome) -> Self {
        let category = outcome.category().map(str::to_string);
        let reason = outcome.reason().map(|reason| reason.code());

        match outcome {
            RecommendationOutcome::Articles {
                items, rationale, ..
            } => Self {
                user_id,
                category,
                items,
                rationale,
                reason,
            },
            RecommendationOutcome::NoResult { rationale, .. } => Self {
                user_id,
                category,
                items: Vec::new(),
                rationale,
                reason,
            },
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommendations for a user, with options as query parameters
pub async fn recommend_for_user(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    run_recommendation(state, request_id, user_id, query).await
}

/// Recommendations for a user, with options in a JSON body
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let query = RecommendationQuery {
        n: request.n,
        use_recency: request.use_recency,
        recency_weeks: request.recency_weeks,
    };
    run_recommendation(state, request_id, request.user_id, query).await
}

async fn run_recommendation(
    state: AppState,
    request_id: RequestId,
    user_id: String,
    query: RecommendationQuery,
) -> AppResult<Json<RecommendationResponse>> {
    let user_id = user_id.trim().to_string();
    if user_id.is_empty() {
        return Err(AppError::InvalidInput("user_id must not be empty".to_string()));
    }

    let settings = state.settings;
    let requested = query.n.unwrap_or(settings.default_count);
    let n = NonZeroUsize::new(requested)
        .filter(|n| n.get() <= settings.max_count)
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "n must be between 1 and {}, got {}",
                settings.max_count, requested
            ))
        })?;

    let options = RecommendOptions {
        use_recency: query.use_recency.unwrap_or(settings.use_recency),
        recency_window: chrono::Duration::weeks(i64::from(
            query.recency_weeks.unwrap_or(settings.recency_weeks),
        )),
    };

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        n = n.get(),
        use_recency = options.use_recency,
        "Processing recommendation request"
    );

    let task_user_id = user_id.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        services::recommend(
            state.loader.as_ref(),
            &task_user_id,
            n,
            &state.behaviors,
            &state.news,
            &options,
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
    .map_err(|e| {
        tracing::error!(request_id = %request_id, error = %e, "Failed to load tables");
        AppError::from(e)
    })?;

    tracing::info!(
        request_id = %request_id,
        has_items = outcome.has_items(),
        returned = outcome.items().len(),
        reason = outcome.reason().map(|r| r.code()).unwrap_or("none"),
        "Recommendation completed"
    );

    Ok(Json(RecommendationResponse::new(user_id, outcome)))
}
