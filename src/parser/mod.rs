//! Document parsing backends.
//!
//! The pipeline never parses PDFs itself; it hands each path to a
//! [`DocumentParser`] and only interprets the structured result.

pub mod local;
pub mod tika;

pub use local::LocalPdfParser;
pub use tika::TikaParser;

use crate::config::ParserConfig;
use crate::error::Result;
use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Structured parser output. `content` is `None` when the backend answered
/// but produced no text field at all. `metadata` holds whatever string
/// properties the backend reports besides the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub content: Option<String>,
    pub metadata: IndexMap<String, String>,
}

impl ParsedDocument {
    pub fn with_content<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
            metadata: IndexMap::new(),
        }
    }

    pub fn without_content() -> Self {
        Self::default()
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("document could not be decoded: {message}")]
    Corrupted { message: String },

    #[error("document is encrypted: {message}")]
    Encrypted { message: String },

    #[error("{message}")]
    Backend { message: String },
}

pub trait DocumentParser: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse(&self, path: &Path) -> std::result::Result<ParsedDocument, ParseError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// In-process extraction with pdf-extract
    #[default]
    Local,
    /// Apache Tika server over HTTP
    Tika,
}

pub fn build_parser(config: &ParserConfig) -> Result<Box<dyn DocumentParser>> {
    match config.backend {
        ParserKind::Local => Ok(Box::new(LocalPdfParser::new())),
        ParserKind::Tika => Ok(Box::new(TikaParser::new(
            &config.tika_url,
            config.timeout(),
        )?)),
    }
}
