use crate::error::{PdfTextError, Result};
use crate::extractor::LayoutKind;
use crate::parser::ParserKind;
use ini::Ini;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Files looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["pdftext.toml", "config.ini"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "DEFAULT", alias = "default")]
    pub logging: LoggingConfig,
    pub scan: ScanConfig,
    pub output: OutputConfig,
    pub parser: ParserConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; console logging when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub include_hidden: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub layout: LayoutKind,
    pub generate_archive: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserConfig {
    pub backend: ParserKind,
    pub tika_url: String,
    pub timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["pdf".to_string()],
            exclude_patterns: Vec::new(),
            include_hidden: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            layout: LayoutKind::Console,
            generate_archive: true,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            backend: ParserKind::Local,
            tika_url: "http://localhost:9998".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ParserConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PdfTextError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| PdfTextError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let is_ini = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ini"));

        let parsed = if is_ini {
            Self::from_ini_str(&content)
        } else {
            toml::from_str(&content).map_err(PdfTextError::from)
        };

        parsed.map_err(|e| match e {
            PdfTextError::Config { message } => PdfTextError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Reads an INI file such as `config.ini`. Only the `[DEFAULT]` section
    /// is consulted; values may be bare or quoted.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let ini = Ini::load_from_str_noescape(content).map_err(|e| PdfTextError::Config {
            message: e.to_string(),
        })?;

        let mut config = Self::default();
        let defaults = ini
            .iter()
            .filter(|(section, _)| section.is_some_and(|s| s.eq_ignore_ascii_case("default")))
            .map(|(_, properties)| properties);

        for properties in defaults {
            if let Some(log_path) = properties.get("log_path") {
                let log_path = log_path.trim();
                config.logging.log_path =
                    (!log_path.is_empty()).then(|| PathBuf::from(log_path));
            }
            if let Some(log_level) = properties.get("log_level") {
                config.logging.log_level = log_level.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                for default_path in DEFAULT_CONFIG_PATHS {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(layout) = cli_args.layout {
            self.output.layout = layout;
        }

        if cli_args.no_archive {
            self.output.generate_archive = false;
        }

        if let Some(backend) = cli_args.parser {
            self.parser.backend = backend;
        }

        if let Some(ref tika_url) = cli_args.tika_url {
            self.parser.tika_url = tika_url.clone();
        }

        if let Some(ref log_path) = cli_args.log_path {
            self.logging.log_path = Some(log_path.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(PdfTextError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        for pattern in &self.scan.exclude_patterns {
            Regex::new(pattern)?;
        }

        if self.parser.timeout_secs == 0 {
            return Err(PdfTextError::Config {
                message: "Parser timeout must be greater than 0".to_string(),
            });
        }

        Url::parse(&self.parser.tika_url)?;

        if self.logging.log_level.trim().is_empty() {
            return Err(PdfTextError::Config {
                message: "Log level must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub layout: Option<LayoutKind>,
    pub no_archive: bool,
    pub parser: Option<ParserKind>,
    pub tika_url: Option<String>,
    pub log_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: Option<LayoutKind>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_no_archive(mut self, no_archive: bool) -> Self {
        self.no_archive = no_archive;
        self
    }

    pub fn with_parser(mut self, parser: Option<ParserKind>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_tika_url(mut self, tika_url: Option<String>) -> Self {
        self.tika_url = tika_url;
        self
    }

    pub fn with_log_path(mut self, log_path: Option<PathBuf>) -> Self {
        self.log_path = log_path;
        self
    }
}
