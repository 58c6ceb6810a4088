use chrono::{Datelike, NaiveDate};

const FOUR_DIGIT_YEAR: [&str; 4] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"];
const TWO_DIGIT_YEAR: [&str; 3] = ["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

/// Parses a day-first date, trying `format` before the common layouts.
///
/// `%Y` accepts "24" as the year 24, so a four-digit-year match below 1000 is
/// discarded and the two-digit-year layouts get their own pass. Statement and
/// ledger both go through here so the same text always yields the same date.
pub fn parse_day_first_date(s: &str, format: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    std::iter::once(format)
        .chain(FOUR_DIGIT_YEAR)
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(|d| d.year() >= 1000)
        .or_else(|| {
            TWO_DIGIT_YEAR
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn four_digit_year() {
        assert_eq!(parse_day_first_date("01/03/2024", "%d/%m/%Y"), Some(date(2024, 3, 1)));
        assert_eq!(parse_day_first_date("2024-03-01", "%d/%m/%Y"), Some(date(2024, 3, 1)));
        assert_eq!(parse_day_first_date("01.03.2024", "%d/%m/%Y"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn two_digit_year_is_not_year_24() {
        assert_eq!(parse_day_first_date("01/03/24", "%d/%m/%Y"), Some(date(2024, 3, 1)));
        assert_eq!(parse_day_first_date("01-03-24", "%d/%m/%Y"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn configured_format_wins() {
        assert_eq!(parse_day_first_date("2024/01/03", "%Y/%d/%m"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn invalid() {
        assert_eq!(parse_day_first_date("", "%d/%m/%Y"), None);
        assert_eq!(parse_day_first_date("31/02/2024", "%d/%m/%Y"), None);
        assert_eq!(parse_day_first_date("ontem", "%d/%m/%Y"), None);
    }
}
