use chrono::NaiveDate;
use concilia_core::{
    normalize_account_key, normalize_amount, parse_day_first_date, AccountKey, Money,
    StatementTransaction, TransactionKind,
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::classify::{classify, is_no_movement};
use crate::extract::{extract_header, extract_text_summary, signed_money};
use crate::types::{
    BalanceSummary, ExtractionOptions, ExtractionStrategy, HeaderInfo, PageExtraction,
    PageOutcome, RawStatementPage, Row, StatementKind, Table,
};

const DATE_COL: usize = 0;
const LABEL_COL: usize = 1;
const AMOUNT_COL: usize = 2;

/// Why a table row was not taken as a transaction or balance line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row has {len} cells, expected at least {needed}")]
    TooShort { len: usize, needed: usize },
    #[error("cell {0} is empty")]
    EmptyCell(usize),
    #[error("label '{0}' is not recognised")]
    UnknownLabel(String),
    #[error("invalid date: '{0}'")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BalanceLabel {
    Previous,
    Current,
}

impl BalanceLabel {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "PREVIOUS BALANCE" | "SALDO ANTERIOR" => Some(BalanceLabel::Previous),
            "CURRENT BALANCE" | "SALDO ATUAL" => Some(BalanceLabel::Current),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BalanceLine {
    label: BalanceLabel,
    date: NaiveDate,
    amount: Money,
}

fn cell(row: &Row, idx: usize) -> Result<&str, RowError> {
    let value = row
        .get(idx)
        .ok_or(RowError::TooShort { len: row.len(), needed: idx + 1 })?
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if value.is_empty() {
        return Err(RowError::EmptyCell(idx));
    }
    Ok(value)
}

/// Accepts `dd/mm/yyyy`, `dd/mm/yy` and ISO dates.
pub fn parse_statement_date(s: &str) -> Result<NaiveDate, RowError> {
    parse_day_first_date(s, "%d/%m/%Y").ok_or_else(|| RowError::InvalidDate(s.trim().to_string()))
}

/// `date | APPLICATION/REDEMPTION | amount`
pub fn parse_detail_row(row: &Row) -> Result<(NaiveDate, TransactionKind, Money), RowError> {
    let label = cell(row, LABEL_COL)?;
    let kind = TransactionKind::from_label(label)
        .ok_or_else(|| RowError::UnknownLabel(label.to_string()))?;
    let date = parse_statement_date(cell(row, DATE_COL)?)?;
    let amount = Money::from_decimal(normalize_amount(cell(row, AMOUNT_COL)?));
    Ok((date, kind, amount))
}

fn parse_balance_row(row: &Row) -> Result<BalanceLine, RowError> {
    let label = cell(row, LABEL_COL)?;
    let label = BalanceLabel::from_label(label)
        .ok_or_else(|| RowError::UnknownLabel(label.to_string()))?;
    let date = parse_statement_date(cell(row, DATE_COL)?)?;
    let amount = signed_money(cell(row, AMOUNT_COL)?);
    Ok(BalanceLine { label, date, amount })
}

fn rows(tables: &[Table]) -> impl Iterator<Item = &Row> {
    tables.iter().flat_map(|t| t.iter())
}

// ── Strategies ───────────────────────────────────────────────────────────────

struct PageContext<'a> {
    page: &'a RawStatementPage,
    header: &'a HeaderInfo,
    account_key: Option<AccountKey>,
    source_file: &'a str,
    options: &'a ExtractionOptions,
}

impl PageContext<'_> {
    fn transaction(&self, date: NaiveDate, kind: TransactionKind, value: Money) -> StatementTransaction {
        StatementTransaction::new(
            date,
            kind,
            value.as_decimal(),
            self.account_key.clone(),
            self.source_file,
        )
    }

    fn yield_transaction(&self, date: NaiveDate, delta: Money) -> Option<StatementTransaction> {
        self.options
            .yield_policy
            .admits(delta)
            .then(|| self.transaction(date, TransactionKind::Yield, delta.abs()))
    }
}

/// What a strategy found once it recognised its layout.
struct StrategyOutput {
    summary: Option<BalanceSummary>,
    transactions: Vec<StatementTransaction>,
}

impl ExtractionStrategy {
    pub const PRIORITY: [ExtractionStrategy; 3] = [
        ExtractionStrategy::DetailedRows,
        ExtractionStrategy::SummaryBalance,
        ExtractionStrategy::TextSummary,
    ];

    /// `None` means the layout is not on this page and the next strategy
    /// should be tried.
    fn apply(self, ctx: &PageContext<'_>) -> Option<StrategyOutput> {
        match self {
            ExtractionStrategy::DetailedRows => detailed_rows(ctx),
            ExtractionStrategy::SummaryBalance => summary_balance(ctx),
            ExtractionStrategy::TextSummary => text_summary(ctx),
        }
    }
}

fn detailed_rows(ctx: &PageContext<'_>) -> Option<StrategyOutput> {
    let transactions: Vec<_> = rows(&ctx.page.tables)
        .filter_map(|row| match parse_detail_row(row) {
            Ok((date, kind, amount)) => Some(ctx.transaction(date, kind, amount)),
            Err(e) => {
                trace!("skipping row in {}: {e}", ctx.source_file);
                None
            }
        })
        .collect();

    (!transactions.is_empty()).then_some(StrategyOutput { summary: None, transactions })
}

fn summary_balance(ctx: &PageContext<'_>) -> Option<StrategyOutput> {
    let mut previous = None;
    let mut current = None;
    for line in rows(&ctx.page.tables).filter_map(|row| parse_balance_row(row).ok()) {
        let slot = match line.label {
            BalanceLabel::Previous => &mut previous,
            BalanceLabel::Current => &mut current,
        };
        slot.get_or_insert(line);
    }
    let (previous, current) = (previous?, current?);

    let delta = current.amount - previous.amount;
    let summary = BalanceSummary {
        previous_balance: previous.amount,
        current_balance: current.amount,
        ..BalanceSummary::default()
    };
    Some(StrategyOutput {
        summary: Some(summary),
        transactions: ctx.yield_transaction(current.date, delta).into_iter().collect(),
    })
}

fn text_summary(ctx: &PageContext<'_>) -> Option<StrategyOutput> {
    let summary = extract_text_summary(&ctx.page.text)?;
    let transactions = match ctx.header.statement_period() {
        Some(period) => ctx
            .yield_transaction(period.end_date(), summary.implied_yield())
            .into_iter()
            .collect(),
        None => {
            debug!("{}: text summary without a reference period, yield not dated", ctx.source_file);
            vec![]
        }
    };
    Some(StrategyOutput { summary: Some(summary), transactions })
}

// ── Page extraction ──────────────────────────────────────────────────────────

/// Turns one decoded page into transactions.
///
/// `inherited` is the header seen so far in the same document; fields this
/// page does not print are taken from it. Pages that are not investment
/// statements, and pages declaring no movement, produce no transactions.
pub fn extract_page(
    page: &RawStatementPage,
    source_file: &str,
    inherited: &HeaderInfo,
    options: &ExtractionOptions,
) -> PageExtraction {
    let page_header = extract_header(&page.text);

    let kind = classify(&page.text);
    if kind != StatementKind::Investment {
        return PageExtraction {
            header: page_header,
            outcome: PageOutcome::Skipped { kind },
            summary: None,
            transactions: vec![],
        };
    }

    let header = page_header.inherit(inherited);
    if is_no_movement(&page.text) {
        return PageExtraction {
            header,
            outcome: PageOutcome::NoMovement,
            summary: None,
            transactions: vec![],
        };
    }

    let ctx = PageContext {
        page,
        header: &header,
        account_key: normalize_account_key(header.account_raw.as_deref()),
        source_file,
        options,
    };

    let found = ExtractionStrategy::PRIORITY
        .into_iter()
        .find_map(|strategy| strategy.apply(&ctx).map(|out| (strategy, out)));

    match found {
        Some((strategy, out)) => {
            let count = out.transactions.len();
            PageExtraction {
                header,
                outcome: PageOutcome::Extracted { strategy, count },
                summary: out.summary,
                transactions: out.transactions,
            }
        }
        None => PageExtraction {
            header,
            outcome: PageOutcome::NoLayout,
            summary: None,
            transactions: vec![],
        },
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
