pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod parser;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::Cli;
pub use config::{CliOverrides, Config, LoggingConfig, OutputConfig, ParserConfig, ScanConfig};
pub use error::{PdfTextError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    extract_text, extract_text_from_folder, try_extract_text, ExtractionFailure,
    ExtractionProgress, ExtractionResult, FolderExtractor, FolderReport, LayoutKind,
    OutputArtifact, OutputLayout, OutputManager,
};
pub use parser::{build_parser, DocumentParser, ParseError, ParsedDocument, ParserKind};
pub use scanner::{FileFilter, PdfScanner, SourceFile};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;
use tokio::task;

/// Main library interface: one configured extraction front end.
pub struct PdfText {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl PdfText {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        config.validate()?;

        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode != OutputMode::Json);

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
        })
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Self::new(
            config,
            cli_args.output_format,
            cli_args.verbosity_level(),
            cli_args.quiet,
        )
    }

    /// Runs the whole pipeline for `folder` on the blocking pool.
    ///
    /// The parser is built inside the blocking task, so a Tika client never
    /// lives on a runtime thread.
    pub async fn run(&self, folder: &Path) -> Result<FolderReport> {
        self.output_formatter
            .start_operation(&format!("Extracting text from {}", folder.display()));

        let file_progress = self.progress_manager.create_file_progress(0);

        let parser_config = self.config.parser.clone();
        let scan_config = self.config.scan.clone();
        let layout = OutputLayout::from_kind(self.config.output.layout);
        let generate_archive = self.config.output.generate_archive;
        let folder = folder.to_path_buf();
        let pb = file_progress.clone();

        let report = task::spawn_blocking(move || -> Result<FolderReport> {
            let parser = build_parser(&parser_config)?;
            let extractor = FolderExtractor::new(parser.as_ref(), &scan_config, layout);

            let progress_callback =
                |progress: &ExtractionProgress| ui::progress::update_file_progress(&pb, progress);
            extractor.extract_folder(&folder, generate_archive, Some(&progress_callback))
        })
        .await
        .map_err(|e| PdfTextError::Task {
            message: e.to_string(),
        })??;

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Extracted {} PDF files", report.files_processed()),
            report.elapsed,
        );

        if !report.folder_found {
            self.output_formatter
                .warning(&format!("Folder {} was not found", report.folder.display()));
        }
        for failure in &report.failures {
            self.output_formatter.info(&failure.to_string());
        }

        Ok(report)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    pub fn handle_error(&self, error: &PdfTextError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
