use crate::config::ScanConfig;
use crate::scanner::file_filter::FileFilter;
use crate::ui::output::format_bytes;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A PDF discovered by a folder scan.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl SourceFile {
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            file_name,
            size,
            modified,
        }
    }
}

pub struct PdfScanner {
    filter: FileFilter,
}

impl PdfScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            filter: FileFilter::new(config),
        }
    }

    /// Lists matching files directly inside `folder`, sorted by file name.
    ///
    /// Never fails: a missing folder or unreadable entries simply yield
    /// fewer (or zero) files.
    pub fn scan_folder<P: AsRef<Path>>(&self, folder: P) -> Vec<SourceFile> {
        let folder = folder.as_ref();

        if !folder.is_dir() {
            warn!(
                "Folder {} does not exist or is not a directory; no PDF files found",
                folder.display()
            );
            return Vec::new();
        }

        let walker = WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut sources = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if let Some(source) = self.process_entry(&entry) {
                        sources.push(source);
                    }
                }
                Err(err) => debug!("Skipping unreadable entry: {}", err),
            }
        }

        sources
    }

    fn process_entry(&self, entry: &DirEntry) -> Option<SourceFile> {
        if !entry.file_type().is_file() || !self.filter.is_source_file(entry.path()) {
            return None;
        }

        let (size, modified) = match entry.metadata() {
            Ok(metadata) => (
                metadata.len(),
                metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            ),
            Err(err) => {
                debug!("No metadata for {}: {}", entry.path().display(), err);
                (0, SystemTime::UNIX_EPOCH)
            }
        };

        Some(SourceFile::new(entry.path().to_path_buf(), size, modified))
    }

    pub fn get_statistics(&self, sources: &[SourceFile]) -> ScanStatistics {
        let (largest_file_size, largest_file_path) = sources
            .iter()
            .max_by_key(|s| s.size)
            .map(|s| (s.size, s.path.clone()))
            .unwrap_or((0, PathBuf::new()));

        ScanStatistics {
            total_files: sources.len(),
            total_size: sources.iter().map(|s| s.size).sum(),
            largest_file_size,
            largest_file_path,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub largest_file_size: u64,
    pub largest_file_path: PathBuf,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results: {} PDF files, {} total",
            self.total_files,
            format_bytes(self.total_size)
        );

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                ", largest {} ({})",
                self.largest_file_path.display(),
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}
