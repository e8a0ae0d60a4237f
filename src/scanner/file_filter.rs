use crate::config::ScanConfig;
use regex::Regex;
use std::ffi::OsStr;
use std::path::Path;

/// Decides which directory entries count as source documents.
///
/// Matching mirrors a shell `*.pdf` glob: the extension comparison is exact
/// and names starting with a dot are skipped unless `include_hidden` is set.
pub struct FileFilter {
    extensions: Vec<String>,
    exclude_patterns: Vec<Regex>,
    include_hidden: bool,
}

impl FileFilter {
    pub fn new(config: &ScanConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        let extensions = config
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            extensions,
            exclude_patterns,
            include_hidden: config.include_hidden,
        }
    }

    /// Names need not be valid UTF-8; the extension is compared as an
    /// `OsStr` and exclude patterns see a lossy rendering of the name.
    pub fn is_source_file(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name() else {
            return false;
        };
        let file_name = file_name.to_string_lossy();

        if !self.include_hidden && file_name.starts_with('.') {
            return false;
        }

        let has_extension = path
            .extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| ext == OsStr::new(e)));

        has_extension && !self.matches_any_pattern(&file_name)
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}
