use concilia_core::{Money, StatementPeriod, StatementTransaction};
use serde::{Deserialize, Serialize};

/// A table cell as the document reader hands it over; merged or blank cells
/// come through as `None`.
pub type Cell = Option<String>;
pub type Row = Vec<Cell>;
pub type Table = Vec<Row>;

/// One decoded page: its flowing text and the tables found on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStatementPage {
    pub text: String,
    pub tables: Vec<Table>,
}

impl RawStatementPage {
    pub fn new(text: impl Into<String>, tables: Vec<Table>) -> Self {
        Self { text: text.into(), tables }
    }

    pub fn text_only(text: impl Into<String>) -> Self {
        Self { text: text.into(), tables: vec![] }
    }
}

/// Builds a table from string literals; empty strings become `None`.
pub fn table_from<const N: usize>(rows: &[[&str; N]]) -> Table {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Investment,
    CurrentAccount,
    Unknown,
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementKind::Investment => write!(f, "investment"),
            StatementKind::CurrentAccount => write!(f, "current_account"),
            StatementKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Statement header fields. Each one is optional because templates differ in
/// what they print.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub branch: Option<String>,
    /// Account number exactly as printed, before key normalisation.
    pub account_raw: Option<String>,
    pub period: Option<String>,
}

impl HeaderInfo {
    /// Fills any field missing here from `earlier`.
    pub fn inherit(self, earlier: &HeaderInfo) -> HeaderInfo {
        HeaderInfo {
            branch: self.branch.or_else(|| earlier.branch.clone()),
            account_raw: self.account_raw.or_else(|| earlier.account_raw.clone()),
            period: self.period.or_else(|| earlier.period.clone()),
        }
    }

    pub fn statement_period(&self) -> Option<StatementPeriod> {
        self.period.as_deref()?.parse().ok()
    }
}

/// Whether a balance-inferred yield is emitted for losses as well as gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldPolicy {
    /// Any non-zero delta.
    #[default]
    Nonzero,
    /// Only deltas greater than zero.
    PositiveOnly,
}

impl YieldPolicy {
    pub fn admits(self, delta: Money) -> bool {
        match self {
            YieldPolicy::Nonzero => !delta.is_zero(),
            YieldPolicy::PositiveOnly => delta.is_positive(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    pub yield_policy: YieldPolicy,
    /// Horizontal glyph tolerance handed to the text reader. Only readers that
    /// group glyphs into words and table cells themselves use it; the
    /// `pdf-extract` text reader and [`MockReader`](crate::MockReader) do not.
    pub x_tolerance: f32,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            yield_policy: YieldPolicy::default(),
            x_tolerance: 2.0,
        }
    }
}

/// Statement layouts, in the order they are tried on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// One table row per application or redemption.
    DetailedRows,
    /// Previous/current balance rows in a table; the delta is the yield.
    SummaryBalance,
    /// The period summary printed as running text.
    TextSummary,
}

/// The period figures of a summary-style statement. Absent figures are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub previous_balance: Money,
    pub applications: Money,
    pub redemptions: Money,
    pub net_yield: Option<Money>,
    pub current_balance: Money,
}

impl BalanceSummary {
    /// The labelled net yield, or what the balances imply once the period's
    /// applications and redemptions are taken out.
    pub fn implied_yield(&self) -> Money {
        self.net_yield.unwrap_or_else(|| {
            self.current_balance - self.previous_balance - self.applications + self.redemptions
        })
    }
}

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Not an investment statement page.
    Skipped { kind: StatementKind },
    /// The statement says nothing moved in the period.
    NoMovement,
    /// A layout was recognised; `count` may be zero (e.g. a flat balance).
    Extracted { strategy: ExtractionStrategy, count: usize },
    /// An investment page with no layout we know.
    NoLayout,
}

/// Everything read from one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageExtraction {
    pub header: HeaderInfo,
    pub outcome: PageOutcome,
    pub summary: Option<BalanceSummary>,
    pub transactions: Vec<StatementTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_inherit_fills_gaps_only() {
        let first = HeaderInfo {
            branch: Some("1234-5".into()),
            account_raw: Some("12.345-6".into()),
            period: Some("MARÇO/2024".into()),
        };
        let later = HeaderInfo {
            account_raw: Some("99.999-9".into()),
            ..HeaderInfo::default()
        };
        let merged = later.inherit(&first);
        assert_eq!(merged.branch.as_deref(), Some("1234-5"));
        assert_eq!(merged.account_raw.as_deref(), Some("99.999-9"));
        assert_eq!(merged.period.as_deref(), Some("MARÇO/2024"));
    }

    #[test]
    fn yield_policy_admits() {
        let gain = Money::from_cents(100);
        let loss = Money::from_cents(-100);
        assert!(YieldPolicy::Nonzero.admits(gain));
        assert!(YieldPolicy::Nonzero.admits(loss));
        assert!(!YieldPolicy::Nonzero.admits(Money::zero()));
        assert!(YieldPolicy::PositiveOnly.admits(gain));
        assert!(!YieldPolicy::PositiveOnly.admits(loss));
    }

    #[test]
    fn implied_yield_prefers_label() {
        let s = BalanceSummary {
            previous_balance: Money::from_cents(100_000),
            applications: Money::from_cents(50_000),
            redemptions: Money::from_cents(20_000),
            net_yield: None,
            current_balance: Money::from_cents(131_000),
        };
        assert_eq!(s.implied_yield(), Money::from_cents(1_000));
        let labelled = BalanceSummary { net_yield: Some(Money::from_cents(999)), ..s };
        assert_eq!(labelled.implied_yield(), Money::from_cents(999));
    }

    #[test]
    fn table_from_blanks_become_none() {
        let t = table_from(&[["01/03/2024", "", "1,00"]]);
        assert_eq!(t[0][1], None);
        assert_eq!(t[0][2].as_deref(), Some("1,00"));
    }

    #[test]
    fn page_outcome_serializes_tagged() {
        let json = serde_json::to_string(&PageOutcome::Extracted {
            strategy: ExtractionStrategy::DetailedRows,
            count: 2,
        })
        .unwrap();
        assert_eq!(json, r#"{"outcome":"extracted","strategy":"detailed_rows","count":2}"#);
    }
}
