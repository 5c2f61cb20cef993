use crate::config::Config;
use crate::errors::AppError;
use crate::models::{GenderFilter, MatchResult, SearchResponse};
use crate::search::AgeMatchSearch;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use moka::future::Cache;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 100;
pub const MAX_LIMIT: usize = 100;

/// Cache key for a finished search.
pub type SearchKey = (u32, GenderFilter, usize);

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The age-match search; holds no per-request state.
    pub search: AgeMatchSearch,
    /// Finished non-empty searches, keyed by (age, gender, limit).
    /// `None` when `SEARCH_CACHE_TTL_SECS` is 0.
    pub search_cache: Option<Cache<SearchKey, Arc<Vec<MatchResult>>>>,
}

impl AppState {
    pub fn new(config: Config, search: AgeMatchSearch) -> Self {
        let search_cache = if config.search_cache_ttl.is_zero() {
            None
        } else {
            Some(
                Cache::builder()
                    .time_to_live(config.search_cache_ttl)
                    .max_capacity(1_000)
                    .build(),
            )
        };

        Self {
            config,
            search,
            search_cache,
        }
    }
}

/// Raw query string of `GET /api/search`.
///
/// Fields are kept as strings so malformed values produce our own 400 body
/// rather than the extractor's rejection text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub limit: Option<String>,
}

/// Validated search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    pub age: u32,
    pub gender: GenderFilter,
    pub limit: usize,
}

impl SearchParams {
    /// Validates the query, falling back to `default_limit` when no limit is given.
    pub fn validate(&self, default_limit: usize) -> Result<SearchRequest, AppError> {
        let age = self
            .age
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .ok_or_else(|| AppError::BadRequest("Valid age required (1-100)".to_string()))?;

        let gender = match self.gender.as_deref() {
            Some(raw) => raw.parse::<GenderFilter>()?,
            None => GenderFilter::Both,
        };

        let limit = match self.limit.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| (1..=MAX_LIMIT).contains(limit))
                .ok_or_else(|| {
                    AppError::BadRequest(format!("limit must be between 1 and {}", MAX_LIMIT))
                })?,
            None => default_limit,
        };

        Ok(SearchRequest { age, gender, limit })
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "mode": "tmdb-only"
        })),
    )
}

/// GET /api/search?age={n}&gender={both|actors|actresses}&limit={n}
///
/// Runs the age-match search against TMDB. Invalid input is rejected with
/// 400 before any provider call is made; provider trouble never fails the
/// request, it only shrinks the result list.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `params` - Query parameters (age required; gender and limit optional).
///
/// # Returns
///
/// * `Result<Json<SearchResponse>, AppError>` - The ranked matches or a validation error.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let request = params.validate(state.config.search.result_limit)?;
    tracing::info!(
        "GET /api/search - age: {}, gender: {}, limit: {}",
        request.age,
        request.gender,
        request.limit
    );

    let key: SearchKey = (request.age, request.gender, request.limit);

    if let Some(cache) = &state.search_cache {
        if let Some(cached) = cache.get(&key).await {
            tracing::debug!("Search cache HIT for {:?}", key);
            return Ok(Json(SearchResponse::new(
                &cached,
                request.age,
                request.gender,
            )));
        }
    }

    let matches = state
        .search
        .search(request.age, request.gender, request.limit)
        .await;

    tracing::info!(
        "Found {} results for age {}",
        matches.len(),
        request.age
    );

    let response = SearchResponse::new(&matches, request.age, request.gender);

    // Empty results may just mean the provider was down; don't pin them
    if let Some(cache) = &state.search_cache {
        if !matches.is_empty() {
            cache.insert(key, Arc::new(matches)).await;
        }
    }

    Ok(Json(response))
}
