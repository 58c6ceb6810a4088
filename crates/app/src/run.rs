use std::path::Path;

use concilia_core::{LedgerTransaction, StatementTransaction};
use concilia_import::{import_ledger, reconcile, ReconciliationResult};
use concilia_statement::{
    DocumentFailure, DocumentReport, DuplicateDocument, StatementDocument, StatementPipeline,
    StatementReader,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::error::RunError;

/// Everything one reconciliation request produced. Owned by the caller; a new
/// run replaces it wholesale.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationRun {
    pub documents: Vec<DocumentReport>,
    pub failures: Vec<DocumentFailure>,
    pub duplicates: Vec<DuplicateDocument>,
    pub statement: Vec<StatementTransaction>,
    pub ledger: Vec<LedgerTransaction>,
    pub result: ReconciliationResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub duplicate_documents: usize,
    pub statement_transactions: usize,
    pub ledger_transactions: usize,
    pub matched_pairs: usize,
    pub statement_only: usize,
    pub ledger_only: usize,
}

impl ReconciliationRun {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            documents_processed: self.documents.len(),
            documents_failed: self.failures.len(),
            duplicate_documents: self.duplicates.len(),
            statement_transactions: self.statement.len(),
            ledger_transactions: self.ledger.len(),
            matched_pairs: self.result.matched.len(),
            statement_only: self.result.statement_only.len(),
            ledger_only: self.result.ledger_only.len(),
        }
    }
}

/// Extract every statement, normalize the ledger and join the two.
///
/// The ledger header is validated before any statement is decoded, so a
/// column mapping mistake fails fast. Unreadable statements are recorded in
/// `failures` and do not stop the run.
pub fn run_reconciliation<R: StatementReader>(
    reader: R,
    documents: &[StatementDocument],
    ledger_csv: &[u8],
    config: &RunConfig,
) -> Result<ReconciliationRun, RunError> {
    let ledger = import_ledger(ledger_csv, &config.ledger)?;

    let pipeline = StatementPipeline::new(reader, config.extraction);
    let batch = pipeline.process_batch(documents);
    info!(
        "Extracted {} statement transaction(s) from {} document(s), {} failed",
        batch.transactions.len(),
        batch.reports.len(),
        batch.failures.len()
    );

    let result = reconcile(&batch.transactions, &ledger).inspect_err(|e| warn!("{e}"))?;

    Ok(ReconciliationRun {
        documents: batch.reports,
        failures: batch.failures,
        duplicates: batch.duplicates,
        statement: batch.transactions,
        ledger,
        result,
    })
}

/// Loads statement files from disk, named by their file name.
pub fn read_documents<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<StatementDocument>, RunError> {
    paths
        .iter()
        .map(|p| {
            let path = p.as_ref();
            let data = std::fs::read(path).map_err(|source| RunError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(StatementDocument::new(name, data))
        })
        .collect()
}
