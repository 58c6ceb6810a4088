pub mod config;
pub mod error;
pub mod export;
pub mod run;

pub use config::RunConfig;
pub use error::RunError;
pub use run::{read_documents, run_reconciliation, ReconciliationRun, RunSummary};

pub use concilia_import::{LedgerColumns, LedgerEncoding, LedgerProfile, ReconciliationResult};
#[cfg(feature = "pdf")]
pub use concilia_statement::PdfTextReader;
pub use concilia_statement::{
    ExtractionOptions, MockReader, StatementDocument, StatementReader, YieldPolicy,
};

/// Installs the global `tracing` subscriber. Filtering follows `RUST_LOG`,
/// defaulting to `info` for the concilia crates. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "concilia=info,concilia_statement=info,concilia_import=info".into()
            }),
        )
        .try_init();
}
