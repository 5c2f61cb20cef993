//! FilmAge API Library
//!
//! Finds film actors who were exactly a given age when a notable film of
//! theirs was released, using TMDB as the live data source.
//!
//! # Modules
//!
//! - `age`: Date parsing and exact calendar age.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Domain values and response views.
//! - `ranking`: Scoring, de-duplication and ordering of matches.
//! - `search`: The age-match search.
//! - `tmdb_client`: TMDB API client.
//! - `tmdb_models`: TMDB wire types.

pub mod age;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod ranking;
pub mod search;
pub mod tmdb_client;
pub mod tmdb_models;
