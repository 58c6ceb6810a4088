use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use concilia_core::{AccountKey, LedgerTransaction, Money, StatementTransaction};
use concilia_import::MatchedPair;
use rust_decimal::Decimal;

use crate::error::RunError;
use crate::run::ReconciliationRun;

pub const MATCHED_FILE: &str = "conciliados.csv";
pub const STATEMENT_ONLY_FILE: &str = "somente_extrato.csv";
pub const LEDGER_ONLY_FILE: &str = "somente_razao.csv";

// Semicolon-separated, comma decimals, day-first dates, UTF-8.
fn writer<W: Write>(w: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(b';').from_writer(w)
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default()
}

fn fmt_value(value: Decimal) -> String {
    Money::from_decimal(value).to_comma_string()
}

fn fmt_account(key: Option<&AccountKey>) -> String {
    key.map(|k| k.to_string()).unwrap_or_default()
}

fn statement_fields(tx: &StatementTransaction) -> [String; 5] {
    [
        fmt_account(tx.account_key.as_ref()),
        fmt_date(Some(tx.date)),
        fmt_value(tx.value),
        tx.kind.to_string(),
        tx.source_file.clone(),
    ]
}

fn ledger_fields(tx: &LedgerTransaction) -> [String; 4] {
    [
        fmt_account(tx.account_key.as_ref()),
        fmt_date(tx.date),
        fmt_value(tx.value),
        tx.document_ref.clone().unwrap_or_default(),
    ]
}

pub fn write_matched<W: Write>(w: W, pairs: &[MatchedPair]) -> Result<(), RunError> {
    let mut wtr = writer(w);
    wtr.write_record(["conta", "data", "valor", "tipo", "arquivo", "valor_razao", "documento"])?;
    for pair in pairs {
        let [account, date, value, kind, file] = statement_fields(&pair.statement);
        wtr.write_record([
            account,
            date,
            value,
            kind,
            file,
            fmt_value(pair.ledger.value),
            pair.ledger.document_ref.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_statement_only<W: Write>(w: W, txs: &[StatementTransaction]) -> Result<(), RunError> {
    let mut wtr = writer(w);
    wtr.write_record(["conta", "data", "valor", "tipo", "arquivo"])?;
    for tx in txs {
        wtr.write_record(statement_fields(tx))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_ledger_only<W: Write>(w: W, txs: &[LedgerTransaction]) -> Result<(), RunError> {
    let mut wtr = writer(w);
    wtr.write_record(["conta", "data", "valor", "documento"])?;
    for tx in txs {
        wtr.write_record(ledger_fields(tx))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the three result tables into `dir` and returns their paths.
pub fn export_all(dir: &Path, run: &ReconciliationRun) -> Result<Vec<PathBuf>, RunError> {
    let create = |name: &str| -> Result<(PathBuf, std::fs::File), RunError> {
        let path = dir.join(name);
        let file = std::fs::File::create(&path)?;
        Ok((path, file))
    };

    let (matched, file) = create(MATCHED_FILE)?;
    write_matched(file, &run.result.matched)?;
    let (statement_only, file) = create(STATEMENT_ONLY_FILE)?;
    write_statement_only(file, &run.result.statement_only)?;
    let (ledger_only, file) = create(LEDGER_ONLY_FILE)?;
    write_ledger_only(file, &run.result.ledger_only)?;

    tracing::info!("Exported results to {}", dir.display());
    Ok(vec![matched, statement_only, ledger_only])
}
