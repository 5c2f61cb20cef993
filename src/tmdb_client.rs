use crate::errors::AppError;
use crate::tmdb_models::{CreditsResponse, DiscoverPage, PersonResponse};
use reqwest;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing;

/// Discovery filters sent with every `/discover/movie` page request.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub year_start: i32,
    pub year_end: i32,
    pub original_language: String,
    pub exclude_genre_id: u32,
    pub min_vote_count: u32,
}

impl DiscoverQuery {
    fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("sort_by", "popularity.desc".to_string()),
            ("primary_release_date.gte", format!("{}-01-01", self.year_start)),
            ("primary_release_date.lte", format!("{}-12-31", self.year_end)),
            ("vote_count.gte", self.min_vote_count.to_string()),
            ("with_original_language", self.original_language.clone()),
            ("without_genres", self.exclude_genre_id.to_string()),
            ("page", page.to_string()),
        ]
    }
}

/// Client for the TMDB v3 REST API.
#[derive(Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Creates a new `TmdbClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://api.themoviedb.org/3`.
    /// * `api_key` - TMDB v3 API key, sent as the `api_key` query parameter.
    /// * `timeout` - Per-request timeout applied by the HTTP client.
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create TMDB client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Fetches one page of popularity-sorted discovery results.
    pub async fn discover_movies(
        &self,
        query: &DiscoverQuery,
        page: u32,
    ) -> Result<DiscoverPage, AppError> {
        let url = format!("{}/discover/movie", self.base_url);
        tracing::debug!(
            "Discovering movies {}-{} page {}",
            query.year_start,
            query.year_end,
            page
        );
        self.get_json(&url, &query.params(page)).await
    }

    /// Fetches the credited cast of a movie.
    pub async fn movie_credits(&self, movie_id: u64) -> Result<CreditsResponse, AppError> {
        let url = format!("{}/movie/{}/credits", self.base_url, movie_id);
        self.get_json(&url, &[]).await
    }

    /// Fetches a person's detail record (birthday, gender).
    pub async fn person_details(&self, person_id: u64) -> Result<PersonResponse, AppError> {
        let url = format!("{}/person/{}", self.base_url, person_id);
        self.get_json(&url, &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, AppError> {
        let mut query: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        // Build URL with proper parameter encoding
        let full_url = reqwest::Url::parse_with_params(url, &query)
            .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        // Redact the key from logs
        tracing::trace!("TMDB GET {}?api_key=[REDACTED]", url);

        let response = self.client.get(full_url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "TMDB returned {} for {}: {}",
                status, url, error_text
            )));
        }

        Ok(response.json().await?)
    }
}
