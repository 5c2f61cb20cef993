//! Scoring, de-duplication and ordering of age matches.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::MatchResult;

/// Billing positions below this count as leads.
const LEAD_BILLING_CUTOFF: usize = 2;

const FILM_POPULARITY_WEIGHT: f64 = 0.7;
const PROMINENCE_WEIGHT: f64 = 0.3;

/// 0 for leads, 1 for everyone billed further down.
pub fn prominence_score(billing_position: usize) -> u8 {
    if billing_position < LEAD_BILLING_CUTOFF {
        0
    } else {
        1
    }
}

pub fn combined_score(film_popularity: f64, prominence_score: u8) -> f64 {
    film_popularity * FILM_POPULARITY_WEIGHT + (3.0 - f64::from(prominence_score)) * PROMINENCE_WEIGHT
}

/// Drops repeated (film, person) pairs, keeping the first occurrence.
pub fn dedup_matches(matches: Vec<MatchResult>) -> Vec<MatchResult> {
    let mut seen = HashSet::with_capacity(matches.len());
    matches.into_iter().filter(|m| seen.insert(m.key())).collect()
}

/// Orders two matches: person popularity desc, film popularity desc, billing asc.
/// Popularity gaps no larger than `tolerance` fall through to the next key.
pub fn compare_matches(a: &MatchResult, b: &MatchResult, tolerance: f64) -> Ordering {
    descending_with_tolerance(a.credit.popularity, b.credit.popularity, tolerance)
        .then_with(|| descending_with_tolerance(a.film.popularity, b.film.popularity, tolerance))
        .then_with(|| a.credit.billing_position.cmp(&b.credit.billing_position))
}

fn descending_with_tolerance(a: f64, b: f64, tolerance: f64) -> Ordering {
    let diff = b - a;
    if diff.abs() > tolerance {
        if diff > 0.0 {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    } else {
        Ordering::Equal
    }
}

/// Stable in-place ranking.
///
/// The tolerance comparator is not transitive, which `slice::sort_by` is
/// allowed to panic on, so this is a plain insertion sort. Every adjacent
/// pair ends up in non-decreasing order under `compare_matches`, but pairs
/// further apart are not compared: popularities 10.0, 10.08, 10.16 stay in
/// input order even though 10.16 clears the tolerance against 10.0.
pub fn rank_matches(matches: &mut [MatchResult], tolerance: f64) {
    for i in 1..matches.len() {
        let mut j = i;
        while j > 0 && compare_matches(&matches[j - 1], &matches[j], tolerance) == Ordering::Greater
        {
            matches.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Number of results handed back for a requested limit.
pub fn result_cap(limit: usize, min_return: usize) -> usize {
    limit.max(min_return)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CastCredit, Film, GenderCode};
    use chrono::NaiveDate;

    fn make_match(film_id: u64, person_id: u64, person_pop: f64, film_pop: f64, billing: usize) -> MatchResult {
        let release_date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let prominence = prominence_score(billing);
        MatchResult {
            film: Film {
                id: film_id,
                title: format!("Film {}", film_id),
                release_date,
                release_year: 2000,
                popularity: film_pop,
            },
            credit: CastCredit {
                film_id,
                person_id,
                name: format!("Person {}", person_id),
                billing_position: billing,
                department: Some("Acting".to_string()),
                character: "Lead".to_string(),
                gender: GenderCode::MALE,
                popularity: person_pop,
            },
            age_at_release: 30,
            prominence_score: prominence,
            combined_score: combined_score(film_pop, prominence),
        }
    }

    #[test]
    fn test_prominence_cutoff() {
        assert_eq!(prominence_score(0), 0);
        assert_eq!(prominence_score(1), 0);
        assert_eq!(prominence_score(2), 1);
        assert_eq!(prominence_score(7), 1);
    }

    #[test]
    fn test_combined_score_formula() {
        assert!((combined_score(10.0, 0) - 7.9).abs() < 1e-9);
        assert!((combined_score(10.0, 1) - 7.6).abs() < 1e-9);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let first = make_match(1, 1, 5.0, 5.0, 0);
        let mut second = make_match(1, 1, 9.0, 9.0, 3);
        second.credit.character = "Other".to_string();
        let third = make_match(1, 2, 5.0, 5.0, 1);

        let deduped = dedup_matches(vec![first.clone(), second, third]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0], first);
    }

    #[test]
    fn test_person_popularity_dominates() {
        let mut matches = vec![
            make_match(1, 1, 5.0, 90.0, 0),
            make_match(2, 2, 20.0, 1.0, 5),
        ];
        rank_matches(&mut matches, 0.1);
        assert_eq!(matches[0].credit.person_id, 2);
    }

    #[test]
    fn test_small_person_gap_falls_through_to_film() {
        let mut matches = vec![
            make_match(1, 1, 10.05, 3.0, 0),
            make_match(2, 2, 10.0, 50.0, 0),
        ];
        rank_matches(&mut matches, 0.1);
        assert_eq!(matches[0].film.id, 2);
    }

    #[test]
    fn test_billing_breaks_full_ties() {
        let mut matches = vec![
            make_match(1, 1, 10.0, 10.0, 3),
            make_match(1, 2, 10.0, 10.0, 0),
        ];
        rank_matches(&mut matches, 0.1);
        assert_eq!(matches[0].credit.billing_position, 0);
    }

    #[test]
    fn test_ranking_is_stable_for_ties() {
        let mut matches = vec![
            make_match(1, 1, 10.0, 10.0, 1),
            make_match(2, 2, 10.0, 10.0, 1),
            make_match(3, 3, 10.0, 10.0, 1),
        ];
        rank_matches(&mut matches, 0.1);
        let ids: Vec<u64> = matches.iter().map(|m| m.film.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_result_cap() {
        assert_eq!(result_cap(20, 30), 30);
        assert_eq!(result_cap(50, 30), 50);
    }

    #[test]
    fn test_ranking_only_orders_adjacent_pairs() {
        let mut matches = vec![
            make_match(1, 1, 10.0, 5.0, 0),
            make_match(2, 2, 10.08, 5.0, 0),
            make_match(3, 3, 10.16, 5.0, 0),
        ];
        rank_matches(&mut matches, 0.1);

        let order: Vec<u64> = matches.iter().map(|m| m.credit.person_id).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(
            compare_matches(&matches[0], &matches[2], 0.1),
            Ordering::Greater
        );
    }
}
