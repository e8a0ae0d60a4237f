use pdftext::parser::tika::{TikaParser, TIKA_CONTENT_KEY};
use pdftext::{try_extract_text, DocumentParser, ExtractionFailure, ParseError, ParsedDocument};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_pdf(dir: &TempDir) -> PathBuf {
    let pdf = dir.path().join("a.pdf");
    fs::write(&pdf, b"%PDF-1.4 fake body").unwrap();
    pdf
}

/// The blocking client must be built and dropped off the runtime threads.
async fn parse_blocking(base_url: String, pdf: PathBuf) -> Result<ParsedDocument, ParseError> {
    tokio::task::spawn_blocking(move || {
        let parser = TikaParser::new(&base_url, Duration::from_secs(5)).unwrap();
        parser.parse(&pdf)
    })
    .await
    .unwrap()
}

async fn extract_blocking(base_url: String, pdf: PathBuf) -> Result<String, ExtractionFailure> {
    tokio::task::spawn_blocking(move || {
        let parser = TikaParser::new(&base_url, Duration::from_secs(5)).unwrap();
        try_extract_text(&parser, &pdf)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tika_content_is_returned() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&temp_dir);

    Mock::given(method("PUT"))
        .and(path("/rmeta/text"))
        .and(header("content-type", "application/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "X-TIKA:content": "Hello from Tika", "Content-Type": "application/pdf" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let document = parse_blocking(mock_server.uri(), pdf).await.unwrap();

    assert_eq!(TIKA_CONTENT_KEY, "X-TIKA:content");
    assert_eq!(document.content.as_deref(), Some("Hello from Tika"));
    assert_eq!(
        document.metadata.get("Content-Type").map(String::as_str),
        Some("application/pdf")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tika_missing_content_key() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&temp_dir);

    Mock::given(method("PUT"))
        .and(path("/rmeta/text"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "Content-Type": "application/pdf" }])),
        )
        .mount(&mock_server)
        .await;

    let failure = extract_blocking(mock_server.uri(), pdf.clone())
        .await
        .unwrap_err();

    assert_eq!(
        failure,
        ExtractionFailure::MissingContent {
            path: pdf.display().to_string()
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tika_no_content_status() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&temp_dir);

    Mock::given(method("PUT"))
        .and(path("/rmeta/text"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let document = parse_blocking(mock_server.uri(), pdf).await.unwrap();

    assert!(document.content.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tika_unprocessable_document_is_corrupted() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&temp_dir);

    Mock::given(method("PUT"))
        .and(path("/rmeta/text"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&mock_server)
        .await;

    let failure = extract_blocking(mock_server.uri(), pdf).await.unwrap_err();

    assert!(matches!(failure, ExtractionFailure::Corrupted { .. }));
    assert!(failure.to_string().contains("appears to be encrypted or corrupted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tika_server_error_is_reported_with_reason() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&temp_dir);

    Mock::given(method("PUT"))
        .and(path("/rmeta/text"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let failure = extract_blocking(mock_server.uri(), pdf).await.unwrap_err();

    match failure {
        ExtractionFailure::Other { reason, .. } => assert!(reason.contains("500")),
        other => panic!("unexpected failure: {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tika_unreachable_server() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&temp_dir);

    // Nothing listens on the discard port.
    let result = parse_blocking("http://127.0.0.1:9".to_string(), pdf).await;

    assert!(matches!(result, Err(ParseError::Backend { .. })));
}
