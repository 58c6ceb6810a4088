use std::borrow::Cow;

use chrono::NaiveDate;
use concilia_core::{
    normalize_account_key, normalize_amount_with, parse_day_first_date, DecimalSeparator,
    LedgerTransaction,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Header names of the ledger columns the normalizer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerColumns {
    pub account_column: String,
    pub date_column: String,
    pub value_column: String,
    pub document_column: Option<String>,
}

impl Default for LedgerColumns {
    fn default() -> Self {
        Self {
            account_column: "Conta".to_string(),
            date_column: "Data".to_string(),
            value_column: "Valor".to_string(),
            document_column: Some("Documento".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEncoding {
    Utf8,
    Windows1252,
    /// UTF-8 when the bytes are valid UTF-8, Windows-1252 otherwise.
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerProfile {
    pub columns: LedgerColumns,
    pub delimiter: String,
    pub encoding: LedgerEncoding,
    pub decimal_separator: DecimalSeparator,
    pub date_format: String,
}

impl Default for LedgerProfile {
    fn default() -> Self {
        Self {
            columns: LedgerColumns::default(),
            delimiter: ";".to_string(),
            encoding: LedgerEncoding::Auto,
            decimal_separator: DecimalSeparator::Comma,
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Ledger is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("Ledger column '{column}' not found; columns present: {}", available.join(", "))]
    MissingColumn { column: String, available: Vec<String> },
}

/// Resolved header positions for one file.
struct ColumnIndex {
    account: usize,
    date: usize,
    value: usize,
    document: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, columns: &LedgerColumns) -> Result<Self, LedgerError> {
        let available: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let find = |name: &str| -> Result<usize, LedgerError> {
            let wanted = name.trim();
            available
                .iter()
                .position(|h| h == wanted)
                .ok_or_else(|| LedgerError::MissingColumn {
                    column: wanted.to_string(),
                    available: available.clone(),
                })
        };

        Ok(Self {
            account: find(&columns.account_column)?,
            date: find(&columns.date_column)?,
            value: find(&columns.value_column)?,
            document: columns.document_column.as_deref().map(find).transpose()?,
        })
    }
}

pub fn decode(data: &[u8], encoding: LedgerEncoding) -> Result<Cow<'_, str>, LedgerError> {
    match encoding {
        LedgerEncoding::Utf8 => Ok(Cow::Borrowed(std::str::from_utf8(strip_bom(data))?)),
        LedgerEncoding::Windows1252 => Ok(encoding_rs::WINDOWS_1252.decode(data).0),
        LedgerEncoding::Auto => match std::str::from_utf8(strip_bom(data)) {
            Ok(s) => Ok(Cow::Borrowed(s)),
            Err(_) => {
                // Excel exports on Western-locale machines
                debug!("Ledger is not UTF-8, decoding as Windows-1252");
                Ok(encoding_rs::WINDOWS_1252.decode(data).0)
            }
        },
    }
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data)
}

/// Parses a ledger date with the configured format first, then the common
/// day-first and ISO layouts, reading two-digit years the way statements do.
pub fn parse_ledger_date(s: &str, format: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Spreadsheet exports often append a midnight time to the date.
    let s = s.split_whitespace().next().unwrap_or(s);
    parse_day_first_date(s, format)
}

/// Reads a ledger export into canonical transactions, one per data row.
///
/// The header row is checked against the configured column names before any
/// data row is read. Values are stored as magnitudes. A row whose date cannot
/// be read is kept with no date so it still shows up as unmatched.
pub fn import_ledger(data: &[u8], profile: &LedgerProfile) -> Result<Vec<LedgerTransaction>, LedgerError> {
    let text = decode(data, profile.encoding)?;
    let delimiter = profile.delimiter.as_bytes().first().copied().unwrap_or(b';');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let index = ColumnIndex::resolve(reader.headers()?, &profile.columns)?;

    let mut transactions = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let field = |i: usize| record.get(i).unwrap_or_default();

        let date = parse_ledger_date(field(index.date), &profile.date_format);
        if date.is_none() {
            trace!("Ledger row {} has unreadable date {:?}", line + 2, field(index.date));
        }

        let document_ref = index
            .document
            .map(field)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        transactions.push(LedgerTransaction {
            date,
            value: normalize_amount_with(field(index.value), profile.decimal_separator),
            account_key: normalize_account_key(Some(field(index.account))),
            document_ref,
        });
    }

    debug!("Imported {} ledger row(s)", transactions.len());
    Ok(transactions)
}
