use crate::parser::{DocumentParser, ParseError, ParsedDocument};
use pdf_extract::OutputError;
use std::path::Path;
use tracing::debug;

/// In-process PDF text extraction backed by `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalPdfParser;

impl LocalPdfParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for LocalPdfParser {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn parse(&self, path: &Path) -> Result<ParsedDocument, ParseError> {
        let bytes = std::fs::read(path)?;
        debug!("Parsing {} ({} bytes)", path.display(), bytes.len());

        match pdf_extract::extract_text_from_mem(&bytes) {
            Ok(text) => Ok(ParsedDocument::with_content(text)),
            Err(OutputError::PdfError(e)) => Err(ParseError::Corrupted {
                message: e.to_string(),
            }),
            Err(OutputError::FormatError(e)) => Err(ParseError::Corrupted {
                message: e.to_string(),
            }),
            Err(e) => Err(ParseError::Backend {
                message: e.to_string(),
            }),
        }
    }
}
