use crate::parser::{DocumentParser, ParseError, ParsedDocument};
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Why a document produced no text. Always recovered locally.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionFailure {
    #[error("No \"content\" found in the extracted PDF file: {path}")]
    MissingContent { path: String },

    #[error("The PDF file {path} appears to be encrypted or corrupted")]
    Corrupted { path: String },

    #[error("Could not extract text from {path}. Reason: {reason}")]
    Other { path: String, reason: String },
}

impl ExtractionFailure {
    pub fn path(&self) -> &str {
        match self {
            ExtractionFailure::MissingContent { path }
            | ExtractionFailure::Corrupted { path }
            | ExtractionFailure::Other { path, .. } => path,
        }
    }
}

/// Runs the parser and classifies the outcome. Backend panics are caught
/// and reported as [`ExtractionFailure::Other`].
pub fn try_extract_text(
    parser: &dyn DocumentParser,
    path: &Path,
) -> Result<String, ExtractionFailure> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| parser.parse(path)));
    let display_path = path.display().to_string();

    match outcome {
        Ok(Ok(ParsedDocument {
            content: Some(text),
            ..
        })) => Ok(text),
        Ok(Ok(ParsedDocument { content: None, .. })) => Err(ExtractionFailure::MissingContent {
            path: display_path,
        }),
        Ok(Err(ParseError::Corrupted { .. } | ParseError::Encrypted { .. })) => {
            Err(ExtractionFailure::Corrupted { path: display_path })
        }
        Ok(Err(e)) => Err(ExtractionFailure::Other {
            path: display_path,
            reason: e.to_string(),
        }),
        Err(payload) => Err(ExtractionFailure::Other {
            path: display_path,
            reason: format!(
                "{} parser panicked: {}",
                parser.name(),
                panic_message(payload.as_ref())
            ),
        }),
    }
}

/// Extracts the text of one document, returning `""` on any failure.
///
/// Each failure is logged once at WARN level; no error reaches the caller.
pub fn extract_text(parser: &dyn DocumentParser, path: &Path) -> String {
    match try_extract_text(parser, path) {
        Ok(text) => text,
        Err(failure) => {
            warn!("{}", failure);
            String::new()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
