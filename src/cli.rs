use crate::config::{CliOverrides, Config};
use crate::error::{PdfTextError, Result};
use crate::extractor::LayoutKind;
use crate::parser::ParserKind;
use crate::ui::OutputMode;
use clap::Parser;
use console::Term;
use std::path::PathBuf;

pub const FOLDER_PROMPT: &str = "Enter the path to the folder containing the PDF files: ";

#[derive(Parser, Debug)]
#[command(name = "pdftext")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract the text of every PDF in a folder")]
#[command(
    long_about = "pdftext extracts the text of every PDF file in a folder, writes one .txt \
                  file per document and bundles them into a zip archive."
)]
#[command(after_help = "EXAMPLES:\n  \
    pdftext ./invoices\n  \
    pdftext ./reports --layout desktop\n  \
    pdftext ./scans --parser tika --tika-url http://localhost:9998\n  \
    pdftext ./papers --no-archive --output-format json\n  \
    pdftext --generate-config --config pdftext.toml")]
pub struct Cli {
    /// Folder containing the PDF files (prompted for when omitted)
    pub folder: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output layout profile
    #[arg(long, value_enum)]
    pub layout: Option<LayoutKind>,

    /// Skip writing text files and the zip archive
    #[arg(long)]
    pub no_archive: bool,

    /// Text extraction backend
    #[arg(long, value_enum)]
    pub parser: Option<ParserKind>,

    /// Base URL of the Tika server
    #[arg(long, env = "PDFTEXT_TIKA_URL")]
    pub tika_url: Option<String>,

    /// Write log lines to this file instead of stderr
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputMode::Human)]
    pub output_format: OutputMode,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_layout(self.layout)
            .with_no_archive(self.no_archive)
            .with_parser(self.parser)
            .with_tika_url(self.tika_url.clone())
            .with_log_path(self.log_path.clone())
    }

    /// The folder argument, or the answer to the interactive prompt.
    pub fn resolve_folder(&self) -> Result<PathBuf> {
        if let Some(ref folder) = self.folder {
            return parse_folder_input(&folder.to_string_lossy());
        }

        let term = if self.prompt_on_stderr() {
            Term::stderr()
        } else {
            Term::stdout()
        };
        term.write_str(FOLDER_PROMPT)?;
        term.flush()?;

        let answer = if term.is_term() {
            term.read_line()?
        } else {
            // piped input
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line
        };
        parse_folder_input(&answer)
    }

    /// JSON mode keeps stdout for the report alone.
    pub fn prompt_on_stderr(&self) -> bool {
        self.output_format == OutputMode::Json
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Trims whitespace and one pair of surrounding quotes, as left behind by
/// drag-and-drop into a terminal.
pub fn parse_folder_input(input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed)
        .trim();

    if unquoted.is_empty() {
        return Err(PdfTextError::InvalidPath {
            path: "no folder was given".to_string(),
        });
    }

    Ok(PathBuf::from(unquoted))
}
