pub mod classify;
pub mod extract;
pub mod hash;
pub mod pipeline;
pub mod reader;
pub mod transactions;
pub mod types;

pub use classify::{classify, is_no_movement};
pub use extract::{extract_header, extract_text_summary};
pub use hash::fingerprint;
pub use pipeline::{
    BatchExtraction, DocumentFailure, DocumentReport, DuplicateDocument, PipelineError,
    StatementDocument, StatementPipeline,
};
#[cfg(feature = "pdf")]
pub use reader::pdf_backend::PdfTextReader;
pub use reader::{pages_from_text, MockReader, ReaderError, StatementReader};
pub use transactions::{extract_page, parse_detail_row, parse_statement_date, RowError};
pub use types::{
    table_from, BalanceSummary, Cell, ExtractionOptions, ExtractionStrategy, HeaderInfo,
    PageExtraction, PageOutcome, RawStatementPage, Row, StatementKind, Table, YieldPolicy,
};
