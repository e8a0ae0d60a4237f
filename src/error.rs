use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfTextError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive operation failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Document parser unavailable: {message}")]
    Parser { message: String },

    #[error("Background extraction task failed: {message}")]
    Task { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for PdfTextError {
    fn user_message(&self) -> String {
        match self {
            PdfTextError::Io(e) => format!("File system error: {}", e),
            PdfTextError::Archive(e) => format!("Could not write the zip archive: {}", e),
            PdfTextError::Config { message } => format!("Configuration error: {}", message),
            PdfTextError::InvalidPath { path } => format!("Invalid folder path: {}", path),
            PdfTextError::Parser { message } => {
                format!("Could not set up the document parser: {}", message)
            }
            PdfTextError::Task { message } => format!("Extraction was interrupted: {}", message),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            PdfTextError::Io(_) | PdfTextError::Archive(_) => Some(
                "Ensure you have write permission for the target folder and enough free disk space.".to_string()
            ),
            PdfTextError::Config { .. } => Some(
                "Check your configuration file syntax (run with --generate-config for a sample).".to_string()
            ),
            PdfTextError::InvalidPath { .. } => Some(
                "Provide the path of an existing folder that contains PDF files.".to_string()
            ),
            PdfTextError::Parser { .. } => Some(
                "Use --parser local, or make sure the Tika server URL is correct and reachable.".to_string()
            ),
            PdfTextError::Task { .. } => None,
        }
    }
}

impl PdfTextError {
    /// Process exit code reported by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PdfTextError::InvalidPath { .. } => 2,
            PdfTextError::Config { .. } | PdfTextError::Parser { .. } => 3,
            PdfTextError::Io(_) | PdfTextError::Archive(_) => 4,
            PdfTextError::Task { .. } => 1,
        }
    }
}

impl From<url::ParseError> for PdfTextError {
    fn from(error: url::ParseError) -> Self {
        PdfTextError::Config {
            message: format!("invalid URL: {}", error),
        }
    }
}

impl From<toml::de::Error> for PdfTextError {
    fn from(error: toml::de::Error) -> Self {
        PdfTextError::Config {
            message: error.to_string(),
        }
    }
}

impl From<regex::Error> for PdfTextError {
    fn from(error: regex::Error) -> Self {
        PdfTextError::Config {
            message: format!("invalid exclude pattern: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfTextError>;
