//! Wire types for the TMDB v3 endpoints the search consumes.
//!
//! Only the fields the search reads are modelled; every optional field is
//! tolerant of `null` or absence because TMDB omits them freely.

use serde::{Deserialize, Serialize};

/// One page of `GET /discover/movie`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<DiscoverMovie>,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// `YYYY-MM-DD`, sometimes an empty string.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

/// `GET /movie/{id}/credits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditsResponse {
    #[serde(default)]
    pub id: Option<u64>,
    /// Already ordered by billing.
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    /// 0 = unspecified, 1 = female, 2 = male (3 = non-binary in newer data).
    #[serde(default)]
    pub gender: Option<u8>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

/// `GET /person/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonResponse {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub gender: Option<u8>,
}
