use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use concilia_core::StatementTransaction;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::hash;
use crate::reader::{ReaderError, StatementReader};
use crate::transactions::extract_page;
use crate::types::{BalanceSummary, ExtractionOptions, HeaderInfo, PageOutcome};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Document read failed: {0}")]
    Reader(#[from] ReaderError),
    #[error("Document reader crashed: {0}")]
    Panicked(String),
}

/// One uploaded statement file.
#[derive(Debug, Clone)]
pub struct StatementDocument {
    pub name: String,
    pub data: Vec<u8>,
}

impl StatementDocument {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), data: data.into() }
    }
}

/// Per-file account of what extraction did.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub file_name: String,
    /// SHA-256 hex digest of the file contents.
    pub fingerprint: String,
    /// Header in effect on the last investment page.
    pub header: HeaderInfo,
    pub pages: Vec<PageOutcome>,
    pub summaries: Vec<BalanceSummary>,
    pub transaction_count: usize,
}

impl DocumentReport {
    /// True when at least one page declared that nothing moved and no page
    /// produced a transaction.
    pub fn is_no_movement(&self) -> bool {
        self.transaction_count == 0 && self.pages.contains(&PageOutcome::NoMovement)
    }
}

/// A file that could not be processed. It contributes nothing to the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub file_name: String,
    pub message: String,
}

/// A file whose bytes repeat an earlier file in the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateDocument {
    pub file_name: String,
    pub duplicate_of: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchExtraction {
    pub reports: Vec<DocumentReport>,
    pub failures: Vec<DocumentFailure>,
    pub duplicates: Vec<DuplicateDocument>,
    pub transactions: Vec<StatementTransaction>,
}

/// Orchestrates: fingerprint → dedup check → decode → classify → extract.
pub struct StatementPipeline<R: StatementReader> {
    reader: R,
    options: ExtractionOptions,
}

impl<R: StatementReader> StatementPipeline<R> {
    pub fn new(reader: R, options: ExtractionOptions) -> Self {
        Self { reader, options }
    }

    /// Decode and extract a single file.
    pub fn process_document(
        &self,
        doc: &StatementDocument,
    ) -> Result<(DocumentReport, Vec<StatementTransaction>), PipelineError> {
        let pages = self.reader.read_pages(&doc.data, self.options.x_tolerance)?;

        let mut carried = HeaderInfo::default();
        let mut outcomes = Vec::with_capacity(pages.len());
        let mut summaries = Vec::new();
        let mut transactions = Vec::new();

        for (idx, page) in pages.iter().enumerate() {
            let extraction = extract_page(page, &doc.name, &carried, &self.options);
            debug!("{} page {}: {:?}", doc.name, idx + 1, extraction.outcome);

            if !matches!(extraction.outcome, PageOutcome::Skipped { .. }) {
                carried = extraction.header;
            }
            summaries.extend(extraction.summary);
            transactions.extend(extraction.transactions);
            outcomes.push(extraction.outcome);
        }

        let report = DocumentReport {
            file_name: doc.name.clone(),
            fingerprint: hash::fingerprint(&doc.data),
            header: carried,
            pages: outcomes,
            summaries,
            transaction_count: transactions.len(),
        };
        Ok((report, transactions))
    }

    /// Process every file in order. A file that fails to decode is reported
    /// and left out; the remaining files are still processed.
    pub fn process_batch(&self, docs: &[StatementDocument]) -> BatchExtraction {
        let mut batch = BatchExtraction::default();
        let mut seen: HashMap<String, String> = HashMap::new();

        for doc in docs {
            let fingerprint = hash::fingerprint(&doc.data);
            if let Some(first) = seen.get(&fingerprint) {
                warn!("{} duplicates {}, skipped", doc.name, first);
                batch.duplicates.push(DuplicateDocument {
                    file_name: doc.name.clone(),
                    duplicate_of: first.clone(),
                });
                continue;
            }
            seen.insert(fingerprint, doc.name.clone());

            // Third-party decoders can panic on malformed input; contain it to this file.
            let result = panic::catch_unwind(AssertUnwindSafe(|| self.process_document(doc)))
                .unwrap_or_else(|payload| Err(PipelineError::Panicked(panic_message(&*payload))));

            match result {
                Ok((report, transactions)) => {
                    info!("{}: {} transaction(s)", doc.name, transactions.len());
                    batch.transactions.extend(transactions);
                    batch.reports.push(report);
                }
                Err(e) => {
                    warn!("Failed to process {}: {e}", doc.name);
                    batch.failures.push(DocumentFailure {
                        file_name: doc.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        batch
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
