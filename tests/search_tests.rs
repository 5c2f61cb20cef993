/// Unit tests for request validation and the response contract
/// Tests query validation, the serialized result shape and no-match copy
use chrono::NaiveDate;
use filmage_api::handlers::SearchParams;
use filmage_api::models::{
    CastCredit, Film, GenderCode, GenderFilter, MatchResult, SearchResponse,
};
use filmage_api::ranking::{combined_score, prominence_score};

fn sample_match() -> MatchResult {
    let prominence = prominence_score(2);
    MatchResult {
        film: Film {
            id: 603,
            title: "The Matrix".to_string(),
            release_date: NaiveDate::from_ymd_opt(1999, 3, 30).unwrap(),
            release_year: 1999,
            popularity: 83.2,
        },
        credit: CastCredit {
            film_id: 603,
            person_id: 530,
            name: "Carrie-Anne Moss".to_string(),
            billing_position: 2,
            department: Some("Acting".to_string()),
            character: "Trinity".to_string(),
            gender: GenderCode::FEMALE,
            popularity: 21.4,
        },
        age_at_release: 31,
        prominence_score: prominence,
        combined_score: combined_score(83.2, prominence),
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn params(age: &str, gender: Option<&str>, limit: Option<&str>) -> SearchParams {
        SearchParams {
            age: Some(age.to_string()),
            gender: gender.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = params("25", Some("actresses"), Some("10")).validate(20).unwrap();
        assert_eq!(request.age, 25);
        assert_eq!(request.gender, GenderFilter::Actresses);
        assert_eq!(request.limit, 10);
    }

    #[test]
    fn test_out_of_range_age_rejected_not_empty() {
        for age in ["0", "101", "-1", "1000"] {
            let err = params(age, None, None).validate(20).unwrap_err();
            assert_eq!(err.to_string(), "Bad request: Valid age required (1-100)");
        }
    }

    #[test]
    fn test_non_integer_age_rejected() {
        assert!(params("25.5", None, None).validate(20).is_err());
        assert!(params("twenty", None, None).validate(20).is_err());
    }

    #[test]
    fn test_unknown_gender_rejected() {
        assert!(params("25", Some("robots"), None).validate(20).is_err());
    }

    #[test]
    fn test_limit_bounds() {
        assert!(params("25", None, Some("0")).validate(20).is_err());
        assert!(params("25", None, Some("101")).validate(20).is_err());
        assert_eq!(params("25", None, Some("100")).validate(20).unwrap().limit, 100);
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn test_result_serialized_shape() {
        let response = SearchResponse::new(&[sample_match()], 31, GenderFilter::Both);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["count"], 1);
        assert!(value.get("message").is_none());

        let result = &value["results"][0];
        assert_eq!(result["movie"]["tmdb_id"], 603);
        assert_eq!(result["movie"]["title"], "The Matrix");
        assert_eq!(result["movie"]["release_year"], 1999);
        assert_eq!(result["movie"]["popularity_score"], 83.2);
        assert_eq!(result["actor"]["tmdb_id"], 530);
        assert_eq!(result["actor"]["name"], "Carrie-Anne Moss");
        assert_eq!(result["actor"]["gender"], 1);
        assert_eq!(result["role"]["character_name"], "Trinity");
        assert_eq!(result["role"]["age_at_filming"], 31);
        assert_eq!(result["role"]["prominence_score"], 1);
        assert_eq!(result["role"]["billing_order"], 2);
        assert!(result["combined_score"].is_number());
    }

    #[test]
    fn test_empty_response_copy_depends_on_filter() {
        let actresses = SearchResponse::new(&[], 45, GenderFilter::Actresses);
        let actors = SearchResponse::new(&[], 45, GenderFilter::Actors);

        assert_eq!(actresses.count, 0);
        assert!(actresses.results.is_empty());
        assert!(actresses.message.as_deref().unwrap().contains("actresses"));
        assert!(actors.message.as_deref().unwrap().contains("45"));
        assert_ne!(actresses.message, actors.message);
    }
}
