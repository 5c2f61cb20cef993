//! Age-match search over the TMDB catalogue.
//!
//! Flow of one search:
//! 1. Page through `/discover/movie` (popularity desc) to build the candidate films
//! 2. Look up credits for a batch of films concurrently, pausing between batches
//! 3. Resolve birthdays of eligible top-billed cast and keep exact age matches
//! 4. De-duplicate, rank and truncate
//!
//! A failed provider call only removes its own unit of work (a page, a film,
//! a person) from the result. Nothing here returns an error to the caller.

use futures::future::join_all;
use std::collections::HashSet;

use crate::age::age_on;
use crate::config::SearchConfig;
use crate::models::{CastCredit, Film, GenderFilter, MatchResult, PersonDetail};
use crate::ranking::{combined_score, dedup_matches, prominence_score, rank_matches, result_cap};
use crate::tmdb_client::{DiscoverQuery, TmdbClient};
use crate::tmdb_models::DiscoverMovie;

/// TMDB refuses discovery pages beyond this.
const MAX_DISCOVER_PAGE: u32 = 500;

#[derive(Clone)]
pub struct AgeMatchSearch {
    client: TmdbClient,
    config: SearchConfig,
}

impl AgeMatchSearch {
    pub fn new(client: TmdbClient, config: SearchConfig) -> Self {
        Self { client, config }
    }

    /// Finds performers who were exactly `target_age` on a film's release date.
    ///
    /// Returns at most `max(limit, min_return)` results, ranked by person
    /// popularity, then film popularity, then billing.
    pub async fn search(
        &self,
        target_age: u32,
        gender: GenderFilter,
        limit: usize,
    ) -> Vec<MatchResult> {
        tracing::info!("Searching TMDB for {} aged {}", gender, target_age);

        let films = self.candidate_films().await;
        if films.is_empty() {
            tracing::warn!("No candidate films available for age {}", target_age);
            return Vec::new();
        }

        let target_age = target_age as i32;
        let batch_count = films.len().div_ceil(self.config.batch_size);
        let mut collected = Vec::new();
        let mut batches_run = 0;

        for (index, batch) in films.chunks(self.config.batch_size).enumerate() {
            let per_film = join_all(
                batch
                    .iter()
                    .map(|film| self.matches_in_film(film, target_age, gender)),
            )
            .await;
            collected.extend(per_film.into_iter().flatten());
            batches_run += 1;

            if collected.len() >= self.config.early_terminate_count {
                tracing::debug!(
                    "Early termination after {} of {} batches ({} matches)",
                    batches_run,
                    batch_count,
                    collected.len()
                );
                break;
            }

            if index + 1 < batch_count && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }

        let mut matches = dedup_matches(collected);
        rank_matches(&mut matches, self.config.popularity_tie_tolerance);
        matches.truncate(result_cap(limit, self.config.min_return));

        tracing::info!(
            "Found {} matches for age {} ({} films, {} batches)",
            matches.len(),
            target_age,
            films.len(),
            batches_run
        );

        matches
    }

    /// Popular films inside the configured release window, de-duplicated in
    /// discovery order and filtered by the popularity floor.
    pub async fn candidate_films(&self) -> Vec<Film> {
        let query = self.discover_query();
        let mut seen = HashSet::new();
        let mut movies: Vec<DiscoverMovie> = Vec::new();
        let mut page = 1;
        // Unknown until a page has been read
        let mut last_page: Option<u32> = None;

        while movies.len() < self.config.total_movies {
            match self.client.discover_movies(&query, page).await {
                Ok(discovered) => {
                    if discovered.results.is_empty() {
                        break;
                    }
                    last_page = Some(discovered.total_pages.min(MAX_DISCOVER_PAGE));

                    for movie in discovered.results {
                        if seen.insert(movie.id) {
                            movies.push(movie);
                        }
                    }
                }
                Err(e) if last_page.is_none() => {
                    tracing::warn!("Discovery page {} unavailable, stopping: {}", page, e);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Discovery page {} unavailable, skipping: {}", page, e);
                }
            }

            match last_page {
                Some(last) if page < last => page += 1,
                _ => break,
            }
        }

        movies.truncate(self.config.total_movies);

        movies
            .iter()
            .filter_map(Film::from_discover)
            .filter(|film| film.popularity >= self.config.min_movie_popularity)
            .collect()
    }

    /// Exact-age matches among the top-billed cast of one film.
    pub async fn matches_in_film(
        &self,
        film: &Film,
        target_age: i32,
        gender: GenderFilter,
    ) -> Vec<MatchResult> {
        let credits = match self.client.movie_credits(film.id).await {
            Ok(credits) => credits,
            Err(e) => {
                tracing::debug!("Skipping '{}' ({}): {}", film.title, film.id, e);
                return Vec::new();
            }
        };

        let candidates = credits
            .cast
            .iter()
            .take(self.config.actors_per_movie)
            .enumerate()
            .map(|(billing, member)| CastCredit::from_cast_member(film.id, billing, member))
            .filter(|credit| self.is_eligible(credit, gender));

        join_all(candidates.map(|credit| self.match_credit(film, credit, target_age)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    fn is_eligible(&self, credit: &CastCredit, gender: GenderFilter) -> bool {
        credit.is_acting()
            && credit.popularity >= self.config.min_actor_popularity
            && gender.admits(credit.gender)
            // known from the credit, before any person lookup
            && !credit.is_voice_role()
    }

    async fn match_credit(
        &self,
        film: &Film,
        credit: CastCredit,
        target_age: i32,
    ) -> Option<MatchResult> {
        let person = match self.client.person_details(credit.person_id).await {
            Ok(person) => PersonDetail::from(person),
            Err(e) => {
                tracing::debug!("Skipping person {}: {}", credit.person_id, e);
                return None;
            }
        };

        let birth_date = person.birth_date?;
        let age = age_on(birth_date, film.release_date);
        if age != target_age {
            return None;
        }
        tracing::trace!("Person {} was {} at release of {}", person.id, age, film.id);

        let credit = credit.filled_from(&person);

        let prominence = prominence_score(credit.billing_position);
        Some(MatchResult {
            film: film.clone(),
            credit,
            age_at_release: age,
            prominence_score: prominence,
            combined_score: combined_score(film.popularity, prominence),
        })
    }

    fn discover_query(&self) -> DiscoverQuery {
        DiscoverQuery {
            year_start: self.config.year_start,
            year_end: self.config.year_end,
            original_language: self.config.original_language.clone(),
            exclude_genre_id: self.config.exclude_genre_id,
            min_vote_count: self.config.min_vote_count,
        }
    }
}
