use crate::config::ScanConfig;
use crate::error::Result;
use crate::extractor::archive::list_entries;
use crate::extractor::output_manager::{OutputArtifact, OutputLayout, OutputManager};
use crate::extractor::text_extractor::{try_extract_text, ExtractionFailure};
use crate::parser::DocumentParser;
use crate::scanner::PdfScanner;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Source path to extracted text, in scan order. Failed documents map to `""`.
pub type ExtractionResult = IndexMap<PathBuf, String>;

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub failed_files: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl ExtractionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            failed_files: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_file(&mut self, filename: String, failed: bool) {
        self.files_processed += 1;
        if failed {
            self.failed_files += 1;
        }
        self.current_file = Some(filename);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let rate = self.files_processed as f64 / self.elapsed().as_secs_f64();
        let remaining_files = self.total_files.saturating_sub(self.files_processed);

        if rate > 0.0 {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct FolderReport {
    pub folder: PathBuf,
    /// False when `folder` was not an existing directory; nothing is written then.
    pub folder_found: bool,
    pub results: ExtractionResult,
    pub output_directory: Option<PathBuf>,
    pub artifacts: Vec<OutputArtifact>,
    pub archive_path: Option<PathBuf>,
    pub failures: Vec<ExtractionFailure>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub elapsed: Duration,
}

impl FolderReport {
    pub fn files_processed(&self) -> usize {
        self.results.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn archive_generated(&self) -> bool {
        self.archive_path.is_some()
    }
}

pub struct FolderExtractor<'a> {
    parser: &'a dyn DocumentParser,
    scanner: PdfScanner,
    layout: OutputLayout,
}

impl<'a> FolderExtractor<'a> {
    pub fn new(parser: &'a dyn DocumentParser, scan: &ScanConfig, layout: OutputLayout) -> Self {
        Self {
            parser,
            scanner: PdfScanner::new(scan),
            layout,
        }
    }

    /// Scans `folder`, extracts every PDF in order, and (when
    /// `generate_archive` is set) writes the text files and the zip.
    ///
    /// Extraction failures never fail the run; only file-system errors on
    /// the output side are returned.
    pub fn extract_folder(
        &self,
        folder: &Path,
        generate_archive: bool,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> Result<FolderReport> {
        let started_at = Local::now();
        let start = Instant::now();
        let folder_found = folder.is_dir();

        let sources = self.scanner.scan_folder(folder);
        debug!("{}", self.scanner.get_statistics(&sources).display_summary());
        info!(
            "Found {} PDF files in {} (parser: {})",
            sources.len(),
            folder.display(),
            self.parser.name()
        );

        let mut progress = ExtractionProgress::new(sources.len());
        let mut results = ExtractionResult::with_capacity(sources.len());
        let mut failures = Vec::new();

        for source in &sources {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let (text, failed) = match try_extract_text(self.parser, &source.path) {
                Ok(text) => (text, false),
                Err(failure) => {
                    warn!("{}", failure);
                    failures.push(failure);
                    (String::new(), true)
                }
            };

            progress.update_file(source.file_name.clone(), failed);
            results.insert(source.path.clone(), text);
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        let mut report = FolderReport {
            folder: folder.to_path_buf(),
            folder_found,
            results,
            output_directory: None,
            artifacts: Vec::new(),
            archive_path: None,
            failures,
            started_at,
            finished_at: started_at,
            elapsed: Duration::ZERO,
        };

        if generate_archive && folder_found {
            let manager = OutputManager::new(folder, self.layout.clone());
            manager.initialize()?;

            let artifacts = manager.write_artifacts(&report.results)?;
            let archive_path = manager.write_archive(&artifacts)?;
            debug!(
                "Archive {} holds {} entries",
                archive_path.display(),
                list_entries(&archive_path)?.len()
            );

            report.output_directory = Some(manager.get_output_directory().to_path_buf());
            report.artifacts = artifacts;
            report.archive_path = Some(archive_path);
        }

        report.finished_at = Local::now();
        report.elapsed = start.elapsed();
        Ok(report)
    }
}

/// Extracts every PDF in `folder` with the console layout and returns the
/// path-to-text mapping.
pub fn extract_text_from_folder(
    parser: &dyn DocumentParser,
    folder: &Path,
    generate_archive: bool,
) -> Result<ExtractionResult> {
    let extractor = FolderExtractor::new(parser, &ScanConfig::default(), OutputLayout::console());
    Ok(extractor.extract_folder(folder, generate_archive, None)?.results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseError, ParsedDocument};
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Returns the file's own bytes as text; files containing `BROKEN`
    /// fail to decode.
    struct EchoParser;

    impl DocumentParser for EchoParser {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn parse(&self, path: &Path) -> std::result::Result<ParsedDocument, ParseError> {
            let text = fs::read_to_string(path)?;
            if text.contains("BROKEN") {
                return Err(ParseError::Corrupted {
                    message: "bad stream".to_string(),
                });
            }
            Ok(ParsedDocument::with_content(text))
        }
    }

    fn console_extractor() -> FolderExtractor<'static> {
        FolderExtractor::new(&EchoParser, &ScanConfig::default(), OutputLayout::console())
    }

    fn setup_folder() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.pdf"), "Hello").unwrap();
        fs::write(temp_dir.path().join("b.pdf"), "BROKEN").unwrap();
        temp_dir
    }

    #[test]
    fn test_results_keep_every_file_in_order() {
        let folder = setup_folder();
        let extractor = console_extractor();

        let report = extractor.extract_folder(folder.path(), false, None).unwrap();

        let entries: Vec<_> = report.results.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (&folder.path().join("a.pdf"), &"Hello".to_string()));
        assert_eq!(entries[1], (&folder.path().join("b.pdf"), &String::new()));
        assert_eq!(report.failed_count(), 1);
        assert!(matches!(report.failures[0], ExtractionFailure::Corrupted { .. }));
    }

    #[test]
    fn test_no_archive_writes_nothing() {
        let folder = setup_folder();
        let extractor = console_extractor();

        let report = extractor.extract_folder(folder.path(), false, None).unwrap();

        assert!(!report.archive_generated());
        assert!(report.artifacts.is_empty());
        assert!(!folder.path().join("txt").exists());
        assert!(!folder.path().join("txt.zip").exists());
    }

    #[test]
    fn test_archive_run_writes_artifacts() {
        let folder = setup_folder();
        let extractor = console_extractor();

        let report = extractor.extract_folder(folder.path(), true, None).unwrap();

        assert_eq!(report.output_directory, Some(folder.path().join("txt")));
        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(
            fs::read_to_string(folder.path().join("txt/a.txt")).unwrap(),
            "Hello"
        );
        assert_eq!(fs::read_to_string(folder.path().join("txt/b.txt")).unwrap(), "");
        assert!(report.folder_found);
        assert_eq!(report.archive_path, Some(folder.path().join("txt.zip")));
    }

    #[test]
    fn test_missing_folder_is_graceful() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let extractor = console_extractor();

        let report = extractor.extract_folder(&missing, true, None).unwrap();

        assert!(!report.folder_found);
        assert!(report.results.is_empty());
        assert!(report.archive_path.is_none());
        assert!(!missing.exists());
    }

    #[test]
    fn test_progress_callback_sees_each_file() {
        let folder = setup_folder();
        let extractor = console_extractor();
        let seen = RefCell::new(Vec::new());

        let callback =
            |p: &ExtractionProgress| seen.borrow_mut().push((p.files_processed, p.failed_files));
        extractor.extract_folder(folder.path(), false, Some(&callback)).unwrap();

        assert_eq!(*seen.borrow(), vec![(0, 0), (1, 0), (2, 1)]);
    }

    #[test]
    fn test_progress_tracking() {
        let mut progress = ExtractionProgress::new(4);
        assert_eq!(progress.estimated_remaining(), Duration::ZERO);

        progress.update_file("a.pdf".to_string(), false);
        progress.update_file("b.pdf".to_string(), true);

        assert_eq!(progress.files_processed, 2);
        assert_eq!(progress.failed_files, 1);
        assert_eq!(progress.current_file.as_deref(), Some("b.pdf"));
    }

    #[test]
    fn test_convenience_function() {
        let folder = setup_folder();

        let results = extract_text_from_folder(&EchoParser, folder.path(), true).unwrap();

        assert_eq!(results.len(), 2);
        assert!(folder.path().join("txt.zip").exists());
    }
}
