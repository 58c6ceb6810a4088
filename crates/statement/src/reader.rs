use std::collections::HashMap;

use thiserror::Error;

use crate::types::RawStatementPage;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Document could not be decoded: {0}")]
    Decode(String),
    #[error("Document has no pages")]
    Empty,
}

/// Abstraction over a document decoder.
/// Implementations accept the raw bytes of one statement file and return its
/// pages, each with extracted text and tables. `x_tolerance` is the horizontal
/// gap, in points, below which adjacent glyphs belong to the same word; readers
/// that do their own word grouping may ignore it.
pub trait StatementReader: Send + Sync {
    fn read_pages(&self, data: &[u8], x_tolerance: f32) -> Result<Vec<RawStatementPage>, ReaderError>;
}

// ── Mock reader (always available, used for tests) ───────────────────────────

/// Serves prepared pages keyed by document bytes. Bytes it was not given fail
/// to decode, which stands in for a corrupt upload.
#[derive(Default)]
pub struct MockReader {
    documents: HashMap<Vec<u8>, Vec<RawStatementPage>>,
}

impl MockReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, data: impl Into<Vec<u8>>, pages: Vec<RawStatementPage>) -> Self {
        self.documents.insert(data.into(), pages);
        self
    }
}

impl StatementReader for MockReader {
    fn read_pages(&self, data: &[u8], _x_tolerance: f32) -> Result<Vec<RawStatementPage>, ReaderError> {
        self.documents
            .get(data)
            .cloned()
            .ok_or_else(|| ReaderError::Decode("unrecognised document bytes".to_string()))
    }
}

/// Builds text-only pages from per-page text, dropping blank pages.
pub fn pages_from_text<I, S>(texts: I) -> Result<Vec<RawStatementPage>, ReaderError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let pages: Vec<RawStatementPage> = texts
        .into_iter()
        .map(Into::<String>::into)
        .filter(|t| !t.trim().is_empty())
        .map(RawStatementPage::text_only)
        .collect();
    if pages.is_empty() {
        return Err(ReaderError::Empty);
    }
    Ok(pages)
}

// ── PDF text backend (optional, gated behind `pdf` feature) ──────────────────

#[cfg(feature = "pdf")]
pub mod pdf_backend {
    use super::{pages_from_text, ReaderError, StatementReader};
    use crate::types::RawStatementPage;

    /// Text-only reader over `pdf-extract`. It finds no tables, so only the
    /// text-summary layout can be recognised from its output. Word grouping is
    /// done by `pdf-extract` itself; `x_tolerance` has no effect here.
    #[derive(Debug, Default)]
    pub struct PdfTextReader;

    impl StatementReader for PdfTextReader {
        fn read_pages(
            &self,
            data: &[u8],
            _x_tolerance: f32,
        ) -> Result<Vec<RawStatementPage>, ReaderError> {
            let texts = pdf_extract::extract_text_from_mem_by_pages(data)
                .map_err(|e| ReaderError::Decode(e.to_string()))?;
            pages_from_text(texts)
        }
    }
}
