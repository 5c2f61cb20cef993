use chrono::{Datelike, NaiveDate};

/// Parses a provider date (`YYYY-MM-DD`). Blank or malformed values yield `None`.
pub fn parse_provider_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Exact calendar age of someone born on `birth` as of `on`.
///
/// The age only ticks over once the birthday has been reached within the
/// year of `on`.
pub fn age_on(birth: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
