use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::age::parse_provider_date;
use crate::errors::AppError;
use crate::tmdb_models::{CastMember, DiscoverMovie, PersonResponse};

/// Department a credit must be classified under to be eligible.
pub const ACTING_DEPARTMENT: &str = "Acting";

/// Marker TMDB appends to voice-only character names.
pub const VOICE_ROLE_MARKER: &str = "(voice)";

// ============ Domain Values ============

/// Gender code exactly as the provider encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenderCode(pub u8);

impl GenderCode {
    pub const UNSPECIFIED: GenderCode = GenderCode(0);
    pub const FEMALE: GenderCode = GenderCode(1);
    pub const MALE: GenderCode = GenderCode(2);
}

/// Which cast members a search keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenderFilter {
    #[default]
    Both,
    Actors,
    Actresses,
}

impl GenderFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderFilter::Both => "both",
            GenderFilter::Actors => "actors",
            GenderFilter::Actresses => "actresses",
        }
    }

    /// Whether a credit with this gender code passes the filter.
    pub fn admits(&self, gender: GenderCode) -> bool {
        match self {
            GenderFilter::Both => true,
            GenderFilter::Actors => gender == GenderCode::MALE,
            GenderFilter::Actresses => gender == GenderCode::FEMALE,
        }
    }

    /// Product copy shown when a search comes back empty.
    pub fn no_matches_message(&self, age: u32) -> String {
        match self {
            GenderFilter::Actresses => "We can't find any actresses who were your age. \
                 Remember: Hollywood is a sexist, ageist cesspool."
                .to_string(),
            _ => format!(
                "No matches found for age {}. Try a different age or check back later as we add more movies!",
                age
            ),
        }
    }
}

impl FromStr for GenderFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "" => Ok(GenderFilter::Both),
            "actors" => Ok(GenderFilter::Actors),
            "actresses" => Ok(GenderFilter::Actresses),
            other => Err(AppError::BadRequest(format!(
                "Invalid gender filter '{}' (expected both, actors or actresses)",
                other
            ))),
        }
    }
}

impl fmt::Display for GenderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate film from discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct Film {
    pub id: u64,
    pub title: String,
    pub release_date: NaiveDate,
    pub release_year: i32,
    pub popularity: f64,
}

impl Film {
    /// Builds a film from a discovery row. Rows without a usable release
    /// date can never produce an age match and are dropped here.
    pub fn from_discover(movie: &DiscoverMovie) -> Option<Film> {
        let release_date = movie.release_date.as_deref().and_then(parse_provider_date)?;

        Some(Film {
            id: movie.id,
            title: movie.title.clone().unwrap_or_default(),
            release_date,
            release_year: release_date.year(),
            popularity: movie.popularity.unwrap_or(0.0).max(0.0),
        })
    }
}

/// One billed cast entry of a film.
#[derive(Debug, Clone, PartialEq)]
pub struct CastCredit {
    pub film_id: u64,
    pub person_id: u64,
    pub name: String,
    /// 0-based position in the credited cast; lower is more prominent.
    pub billing_position: usize,
    pub department: Option<String>,
    pub character: String,
    pub gender: GenderCode,
    pub popularity: f64,
}

impl CastCredit {
    pub fn from_cast_member(film_id: u64, billing_position: usize, member: &CastMember) -> Self {
        Self {
            film_id,
            person_id: member.id,
            name: member.name.clone().unwrap_or_default(),
            billing_position,
            department: member.known_for_department.clone(),
            character: member.character.clone().unwrap_or_default(),
            gender: GenderCode(member.gender.unwrap_or(0)),
            popularity: member.popularity.unwrap_or(0.0),
        }
    }

    pub fn is_acting(&self) -> bool {
        self.department.as_deref() == Some(ACTING_DEPARTMENT)
    }

    pub fn is_voice_role(&self) -> bool {
        self.character.to_lowercase().contains(VOICE_ROLE_MARKER)
    }

    /// Fills a blank name or an unspecified gender from the person record.
    /// Values present on the credit always win.
    pub fn filled_from(mut self, person: &PersonDetail) -> Self {
        if self.name.is_empty() {
            self.name = person.name.clone();
        }
        if self.gender == GenderCode::UNSPECIFIED {
            self.gender = person.gender;
        }
        self
    }
}

/// Person detail as resolved from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonDetail {
    pub id: u64,
    pub name: String,
    pub gender: GenderCode,
    pub birth_date: Option<NaiveDate>,
}

impl From<PersonResponse> for PersonDetail {
    fn from(person: PersonResponse) -> Self {
        Self {
            id: person.id,
            name: person.name.unwrap_or_default(),
            gender: GenderCode(person.gender.unwrap_or(0)),
            birth_date: person.birthday.as_deref().and_then(parse_provider_date),
        }
    }
}

/// A credit whose performer was exactly the target age at release.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub film: Film,
    pub credit: CastCredit,
    pub age_at_release: i32,
    pub prominence_score: u8,
    pub combined_score: f64,
}

impl MatchResult {
    /// Identity used for de-duplication.
    pub fn key(&self) -> (u64, u64) {
        (self.film.id, self.credit.person_id)
    }
}

// ============ Response Views ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieView {
    pub tmdb_id: u64,
    pub title: String,
    pub release_year: i32,
    pub popularity_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorView {
    pub tmdb_id: u64,
    pub name: String,
    pub gender: GenderCode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleView {
    pub character_name: String,
    pub age_at_filming: i32,
    pub prominence_score: u8,
    pub billing_order: usize,
}

/// Serialized shape of a [`MatchResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResultView {
    pub movie: MovieView,
    pub actor: ActorView,
    pub role: RoleView,
    pub combined_score: f64,
}

impl From<&MatchResult> for MatchResultView {
    fn from(m: &MatchResult) -> Self {
        Self {
            movie: MovieView {
                tmdb_id: m.film.id,
                title: m.film.title.clone(),
                release_year: m.film.release_year,
                popularity_score: m.film.popularity,
            },
            actor: ActorView {
                tmdb_id: m.credit.person_id,
                name: m.credit.name.clone(),
                gender: m.credit.gender,
            },
            role: RoleView {
                character_name: m.credit.character.clone(),
                age_at_filming: m.age_at_release,
                prominence_score: m.prominence_score,
                billing_order: m.credit.billing_position,
            },
            combined_score: m.combined_score,
        }
    }
}

/// Body of `GET /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<MatchResultView>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn new(matches: &[MatchResult], age: u32, gender: GenderFilter) -> Self {
        let results: Vec<MatchResultView> = matches.iter().map(MatchResultView::from).collect();
        let count = results.len();
        let message = (count == 0).then(|| gender.no_matches_message(age));

        Self {
            results,
            count,
            message,
        }
    }
}
