use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::AccountKey;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Application,
    Redemption,
    /// Inferred from a balance delta, never printed as a row.
    Yield,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Application => write!(f, "APPLICATION"),
            TransactionKind::Redemption => write!(f, "REDEMPTION"),
            TransactionKind::Yield => write!(f, "YIELD"),
        }
    }
}

impl TransactionKind {
    /// Maps a statement row label to a movement kind. The label must be exactly
    /// one of the known words once trimmed; case is ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "APPLICATION" | "APLICAÇÃO" | "APLICACAO" => Some(TransactionKind::Application),
            "REDEMPTION" | "RESGATE" => Some(TransactionKind::Redemption),
            _ => None,
        }
    }
}

/// A movement read from an investment statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTransaction {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    /// Magnitude only; direction is carried by `kind`.
    pub value: Decimal,
    pub account_key: Option<AccountKey>,
    pub source_file: String,
}

impl StatementTransaction {
    pub fn new(
        date: NaiveDate,
        kind: TransactionKind,
        value: Decimal,
        account_key: Option<AccountKey>,
        source_file: impl Into<String>,
    ) -> Self {
        StatementTransaction {
            date,
            kind,
            value: value.abs(),
            account_key,
            source_file: source_file.into(),
        }
    }

    pub fn join_key(&self) -> Option<JoinKey> {
        let account_key = self.account_key.clone()?;
        Some(JoinKey::new(account_key, self.date, self.value))
    }
}

/// One row of the accounting ledger export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// `None` when the ledger cell could not be read as a date.
    pub date: Option<NaiveDate>,
    pub value: Decimal,
    pub account_key: Option<AccountKey>,
    pub document_ref: Option<String>,
}

impl LedgerTransaction {
    pub fn join_key(&self) -> Option<JoinKey> {
        let account_key = self.account_key.clone()?;
        let date = self.date?;
        Some(JoinKey::new(account_key, date, self.value))
    }
}

/// `(account, date, |value|)` with the value rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct JoinKey {
    pub account_key: AccountKey,
    pub date: NaiveDate,
    pub value: Money,
}

impl JoinKey {
    pub fn new(account_key: AccountKey, date: NaiveDate, value: Decimal) -> Self {
        JoinKey {
            account_key,
            date,
            value: Money::from_decimal(value.abs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn key(s: &str) -> AccountKey {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn kind_from_label_is_exact_after_trim() {
        assert_eq!(TransactionKind::from_label("  APPLICATION "), Some(TransactionKind::Application));
        assert_eq!(TransactionKind::from_label("Resgate"), Some(TransactionKind::Redemption));
        assert_eq!(TransactionKind::from_label("APLICAÇÃO"), Some(TransactionKind::Application));
        assert_eq!(TransactionKind::from_label("APPLICATIONS TOTAL"), None);
        assert_eq!(TransactionKind::from_label(""), None);
    }

    #[test]
    fn statement_value_is_stored_as_magnitude() {
        let tx = StatementTransaction::new(
            date(2024, 3, 1),
            TransactionKind::Redemption,
            dec("-500.00"),
            Some(key("12345")),
            "a.pdf",
        );
        assert_eq!(tx.value, dec("500.00"));
    }

    #[test]
    fn join_key_ignores_sign_and_sub_cent_noise() {
        let a = JoinKey::new(key("12345"), date(2024, 3, 1), dec("100.004"));
        let b = JoinKey::new(key("12345"), date(2024, 3, 1), dec("-100.001"));
        assert_eq!(a, b);
    }

    #[test]
    fn statement_without_account_has_no_join_key() {
        let tx = StatementTransaction::new(
            date(2024, 3, 1),
            TransactionKind::Yield,
            dec("1"),
            None,
            "a.pdf",
        );
        assert!(tx.join_key().is_none());
    }

    #[test]
    fn ledger_without_date_has_no_join_key() {
        let tx = LedgerTransaction {
            date: None,
            value: dec("1"),
            account_key: Some(key("12345")),
            document_ref: None,
        };
        assert!(tx.join_key().is_none());
    }

    #[test]
    fn kind_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Application).unwrap(),
            "\"APPLICATION\""
        );
    }
}
