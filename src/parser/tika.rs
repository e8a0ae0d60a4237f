use crate::error::{PdfTextError, Result};
use crate::parser::{DocumentParser, ParseError, ParsedDocument};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Metadata key under which Tika's recursive metadata endpoint reports text.
pub const TIKA_CONTENT_KEY: &str = "X-TIKA:content";

/// Client for an Apache Tika server (`/rmeta/text` endpoint).
///
/// The blocking client owns its own runtime, so construct and drop it
/// outside of async contexts.
pub struct TikaParser {
    client: Client,
    endpoint: Url,
}

impl TikaParser {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("rmeta/text")?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PdfTextError::Parser {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl DocumentParser for TikaParser {
    fn name(&self) -> &'static str {
        "tika"
    }

    fn parse(&self, path: &Path) -> std::result::Result<ParsedDocument, ParseError> {
        let body = std::fs::read(path)?;
        debug!("Sending {} to {}", path.display(), self.endpoint);

        let response = self
            .client
            .put(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/pdf")
            .body(body)
            .send()
            .map_err(|e| ParseError::Backend {
                message: format!("Tika request failed: {}", e),
            })?;

        let status = response.status();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ParseError::Encrypted {
                message: format!("Tika could not process the document ({})", status),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(ParsedDocument::without_content());
        }
        if !status.is_success() {
            return Err(ParseError::Backend {
                message: format!("Tika server responded with {}", status),
            });
        }

        let documents: Vec<Map<String, Value>> =
            response.json().map_err(|e| ParseError::Backend {
                message: format!("invalid Tika response: {}", e),
            })?;

        let Some(first) = documents.first() else {
            return Ok(ParsedDocument::without_content());
        };

        Ok(document_from_rmeta(first))
    }
}

/// Splits one `/rmeta` object into text and string-valued metadata.
/// Multi-valued keys keep their first value.
fn document_from_rmeta(object: &Map<String, Value>) -> ParsedDocument {
    let content = object
        .get(TIKA_CONTENT_KEY)
        .and_then(Value::as_str)
        .map(str::to_owned);

    let metadata = object
        .iter()
        .filter(|(key, _)| key.as_str() != TIKA_CONTENT_KEY)
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Array(items) => items.first()?.as_str()?.to_owned(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), value))
        })
        .collect();

    ParsedDocument { content, metadata }
}
