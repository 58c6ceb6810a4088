use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The reference month of a statement, as printed in its header
/// (`MARÇO/2024`, `MARCH/2024` or `03/2024`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatementPeriod {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognised statement period: '{0}'")]
pub struct InvalidPeriod(pub String);

impl fmt::Display for StatementPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

impl StatementPeriod {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| StatementPeriod { year, month })
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Last calendar day of the month (inclusive).
    pub fn end_date(self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|first| first.pred_opt())
            .unwrap_or_default()
    }
}

impl std::str::FromStr for StatementPeriod {
    type Err = InvalidPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidPeriod(s.to_string());
        let (month_part, year_part) = s.trim().split_once('/').ok_or_else(err)?;
        let year: i32 = year_part.trim().parse().map_err(|_| err())?;
        let month_part = month_part.trim();
        let month = match month_part.parse::<u32>() {
            Ok(n) => n,
            Err(_) => month_name_to_num(month_part).ok_or_else(err)?,
        };
        StatementPeriod::new(year, month).ok_or_else(err)
    }
}

fn month_name_to_num(name: &str) -> Option<u32> {
    match name.to_uppercase().as_str() {
        "JANEIRO" | "JANUARY" | "JAN" => Some(1),
        "FEVEREIRO" | "FEBRUARY" | "FEV" | "FEB" => Some(2),
        "MARÇO" | "MARCO" | "MARCH" | "MAR" => Some(3),
        "ABRIL" | "APRIL" | "ABR" | "APR" => Some(4),
        "MAIO" | "MAY" | "MAI" => Some(5),
        "JUNHO" | "JUNE" | "JUN" => Some(6),
        "JULHO" | "JULY" | "JUL" => Some(7),
        "AGOSTO" | "AUGUST" | "AGO" | "AUG" => Some(8),
        "SETEMBRO" | "SEPTEMBER" | "SET" | "SEP" => Some(9),
        "OUTUBRO" | "OCTOBER" | "OUT" | "OCT" => Some(10),
        "NOVEMBRO" | "NOVEMBER" | "NOV" => Some(11),
        "DEZEMBRO" | "DECEMBER" | "DEZ" | "DEC" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_portuguese_month_name() {
        let p: StatementPeriod = "MARÇO/2024".parse().unwrap();
        assert_eq!((p.year(), p.month()), (2024, 3));
    }

    #[test]
    fn parse_english_and_numeric() {
        assert_eq!("MARCH/2024".parse::<StatementPeriod>().unwrap().month(), 3);
        assert_eq!("11/2023".parse::<StatementPeriod>().unwrap().month(), 11);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("FOO/2024".parse::<StatementPeriod>().is_err());
        assert!("13/2024".parse::<StatementPeriod>().is_err());
        assert!("MARÇO 2024".parse::<StatementPeriod>().is_err());
    }

    #[test]
    fn end_date_handles_month_lengths() {
        assert_eq!(StatementPeriod::new(2024, 2).unwrap().end_date(), date(2024, 2, 29));
        assert_eq!(StatementPeriod::new(2023, 2).unwrap().end_date(), date(2023, 2, 28));
        assert_eq!(StatementPeriod::new(2024, 12).unwrap().end_date(), date(2024, 12, 31));
    }

    #[test]
    fn display_is_numeric() {
        assert_eq!(StatementPeriod::new(2024, 3).unwrap().to_string(), "03/2024");
    }
}
