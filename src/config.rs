use regex::Regex;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_timeout: Duration,
    /// TTL of the endpoint-level result cache. Zero disables it.
    pub search_cache_ttl: Duration,
    pub search: SearchConfig,
}

/// Tunables for the age-match search.
///
/// Defaults mirror the values the service has been running with in
/// production; every field can be overridden through a `SEARCH_*`
/// environment variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Earliest primary release year considered (inclusive).
    pub year_start: i32,
    /// Latest primary release year considered (inclusive).
    pub year_end: i32,
    /// Maximum number of candidate films pulled from discovery.
    pub total_movies: usize,
    /// ISO 639-1 original language filter.
    pub original_language: String,
    /// Genre excluded from discovery (16 = Animation).
    pub exclude_genre_id: u32,
    pub min_movie_popularity: f64,
    pub min_vote_count: u32,
    /// Top-billed cast entries checked per film.
    pub actors_per_movie: usize,
    pub min_actor_popularity: f64,
    /// Films whose credits are looked up concurrently.
    pub batch_size: usize,
    /// Pause between batches to stay under the provider's rate limit.
    pub batch_delay: Duration,
    /// Result limit used when the caller does not pass one.
    pub result_limit: usize,
    /// Floor on the number of results returned when more are available.
    pub min_return: usize,
    /// Accumulated raw matches after which no further batches are issued.
    pub early_terminate_count: usize,
    /// Popularity differences up to this value are ranked as ties.
    pub popularity_tie_tolerance: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            year_start: 1950,
            year_end: 2010,
            total_movies: 500,
            original_language: "en".to_string(),
            exclude_genre_id: 16,
            min_movie_popularity: 0.0,
            min_vote_count: 10,
            actors_per_movie: 4,
            min_actor_popularity: 1.0,
            batch_size: 10,
            batch_delay: Duration::from_millis(100),
            result_limit: 20,
            min_return: 30,
            early_terminate_count: 50,
            popularity_tie_tolerance: 0.1,
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let config = Self {
            year_start: env_or("SEARCH_YEAR_START", defaults.year_start)?,
            year_end: env_or("SEARCH_YEAR_END", defaults.year_end)?,
            total_movies: env_or("SEARCH_TOTAL_MOVIES", defaults.total_movies)?,
            original_language: env_or(
                "SEARCH_ORIGINAL_LANGUAGE",
                defaults.original_language.clone(),
            )?,
            exclude_genre_id: env_or("SEARCH_EXCLUDE_GENRE_ID", defaults.exclude_genre_id)?,
            min_movie_popularity: env_or(
                "SEARCH_MIN_MOVIE_POPULARITY",
                defaults.min_movie_popularity,
            )?,
            min_vote_count: env_or("SEARCH_MIN_VOTE_COUNT", defaults.min_vote_count)?,
            actors_per_movie: env_or("SEARCH_ACTORS_PER_MOVIE", defaults.actors_per_movie)?,
            min_actor_popularity: env_or(
                "SEARCH_MIN_ACTOR_POPULARITY",
                defaults.min_actor_popularity,
            )?,
            batch_size: env_or("SEARCH_BATCH_SIZE", defaults.batch_size)?,
            batch_delay: Duration::from_millis(env_or(
                "SEARCH_BATCH_DELAY_MS",
                defaults.batch_delay.as_millis() as u64,
            )?),
            result_limit: env_or("SEARCH_RESULT_LIMIT", defaults.result_limit)?,
            min_return: env_or("SEARCH_MIN_RETURN", defaults.min_return)?,
            early_terminate_count: env_or(
                "SEARCH_EARLY_TERMINATE_COUNT",
                defaults.early_terminate_count,
            )?,
            popularity_tie_tolerance: env_or(
                "SEARCH_POPULARITY_TIE_TOLERANCE",
                defaults.popularity_tie_tolerance,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.year_start > self.year_end {
            anyhow::bail!(
                "SEARCH_YEAR_START ({}) must not be after SEARCH_YEAR_END ({})",
                self.year_start,
                self.year_end
            );
        }
        if self.total_movies == 0 {
            anyhow::bail!("SEARCH_TOTAL_MOVIES must be at least 1");
        }
        if self.batch_size == 0 {
            anyhow::bail!("SEARCH_BATCH_SIZE must be at least 1");
        }
        if self.actors_per_movie == 0 {
            anyhow::bail!("SEARCH_ACTORS_PER_MOVIE must be at least 1");
        }
        if self.result_limit == 0 {
            anyhow::bail!("SEARCH_RESULT_LIMIT must be at least 1");
        }
        if self.original_language.trim().is_empty() {
            anyhow::bail!("SEARCH_ORIGINAL_LANGUAGE cannot be empty");
        }
        if self.min_movie_popularity < 0.0
            || self.min_actor_popularity < 0.0
            || self.popularity_tie_tolerance < 0.0
        {
            anyhow::bail!("Popularity floors and tie tolerance must be non-negative");
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            tmdb_api_key: resolve_tmdb_api_key()?,
            tmdb_base_url: std::env::var("TMDB_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            tmdb_timeout: Duration::from_secs(env_or("TMDB_TIMEOUT_SECS", 30u64)?),
            search_cache_ttl: Duration::from_secs(env_or("SEARCH_CACHE_TTL_SECS", 3600u64)?),
            search: SearchConfig::from_env()?,
        };

        validate_base_url(&config.tmdb_base_url)?;

        // Log successful configuration load (without the API key)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("TMDB Base URL: {}", config.tmdb_base_url);
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Search window: {}-{}, up to {} films, batches of {}",
            config.search.year_start,
            config.search.year_end,
            config.search.total_movies,
            config.search.batch_size
        );

        Ok(config)
    }
}

fn validate_base_url(base_url: &str) -> anyhow::Result<()> {
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        anyhow::bail!("TMDB_BASE_URL must start with http:// or https://");
    }
    url::Url::parse(base_url)
        .map_err(|e| anyhow::anyhow!("TMDB_BASE_URL is not a valid URL: {}", e))?;
    Ok(())
}

/// Reads the provider key from `TMDB_API_KEY`, falling back to the
/// credentials file named by `TMDB_CREDENTIALS_FILE`.
fn resolve_tmdb_api_key() -> anyhow::Result<String> {
    if let Some(key) = std::env::var("TMDB_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
    {
        return Ok(key.trim().to_string());
    }

    if let Ok(path) = std::env::var("TMDB_CREDENTIALS_FILE") {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                if let Some(key) = extract_key_from_credentials(&content) {
                    tracing::debug!("TMDB API key read from credentials file {}", path);
                    return Ok(key);
                }
                tracing::warn!("Credentials file {} has no TMDB_API_KEY entry", path);
            }
            Err(e) => {
                tracing::error!("Error reading TMDB credentials from {}: {}", path, e);
            }
        }
    }

    anyhow::bail!("TMDB_API_KEY environment variable or TMDB_CREDENTIALS_FILE required")
}

/// Extracts the key from a `TMDB_API_KEY='...'` line.
pub fn extract_key_from_credentials(content: &str) -> Option<String> {
    let re = Regex::new(r"TMDB_API_KEY='([^']+)'").ok()?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, raw)),
        _ => Ok(default),
    }
}
