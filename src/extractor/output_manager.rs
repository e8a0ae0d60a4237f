use crate::error::{PdfTextError, Result};
use crate::extractor::archive::ArchiveWriter;
use crate::extractor::ExtractionResult;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Named output profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// `<folder>/txt/*.txt` with `<folder>/txt.zip`
    #[default]
    Console,
    /// `<folder>/Results/*.txt` with `<folder>/Results/Results.zip`
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveLocation {
    FolderRoot,
    OutputDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub output_dir_name: String,
    pub archive_name: String,
    pub archive_location: ArchiveLocation,
}

impl OutputLayout {
    pub fn console() -> Self {
        Self {
            output_dir_name: "txt".to_string(),
            archive_name: "txt.zip".to_string(),
            archive_location: ArchiveLocation::FolderRoot,
        }
    }

    pub fn desktop() -> Self {
        Self {
            output_dir_name: "Results".to_string(),
            archive_name: "Results.zip".to_string(),
            archive_location: ArchiveLocation::OutputDir,
        }
    }

    pub fn from_kind(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Console => Self::console(),
            LayoutKind::Desktop => Self::desktop(),
        }
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::console()
    }
}

/// A text file written for one source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    pub source_path: PathBuf,
    pub path: PathBuf,
    pub bytes_written: u64,
}

pub struct OutputManager {
    folder: PathBuf,
    layout: OutputLayout,
    output_directory: PathBuf,
}

impl OutputManager {
    pub fn new<P: Into<PathBuf>>(folder: P, layout: OutputLayout) -> Self {
        let folder = folder.into();
        let output_directory = folder.join(&layout.output_dir_name);

        Self {
            folder,
            layout,
            output_directory,
        }
    }

    /// Creates the output directory; an existing one is reused as is.
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.output_directory)?;
        Ok(())
    }

    pub fn get_output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn archive_path(&self) -> PathBuf {
        self.archive_root().join(&self.layout.archive_name)
    }

    fn archive_root(&self) -> &Path {
        match self.layout.archive_location {
            ArchiveLocation::FolderRoot => &self.folder,
            ArchiveLocation::OutputDir => &self.output_directory,
        }
    }

    /// `<folder>/a.pdf` becomes `<output dir>/a.txt`.
    pub fn artifact_path(&self, source: &Path) -> Result<PathBuf> {
        let stem = source.file_stem().ok_or_else(|| PdfTextError::InvalidPath {
            path: format!("No file name in {}", source.display()),
        })?;

        let mut file_name = stem.to_os_string();
        file_name.push(".txt");
        Ok(self.output_directory.join(file_name))
    }

    /// Writes one text file per result. Sources whose names would collide
    /// (`a.pdf` and `a.PDF`, compared case-insensitively) fall back to the
    /// full file name (`a.PDF.txt`), then to a numbered name.
    pub fn write_artifacts(&self, results: &ExtractionResult) -> Result<Vec<OutputArtifact>> {
        let mut taken = HashSet::new();
        let mut artifacts = Vec::with_capacity(results.len());

        for (source, text) in results {
            let path = self.unique_artifact_path(source, &mut taken)?;
            artifacts.push(self.write_text(source, path, text)?);
        }

        Ok(artifacts)
    }

    fn unique_artifact_path(&self, source: &Path, taken: &mut HashSet<String>) -> Result<PathBuf> {
        let mut candidate = self.artifact_path(source)?;

        if taken.contains(&collision_key(&candidate)) {
            if let Some(file_name) = source.file_name() {
                let mut name = file_name.to_os_string();
                name.push(".txt");
                candidate = self.output_directory.join(name);
            }
        }

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut counter = 2;
        while taken.contains(&collision_key(&candidate)) {
            candidate = self
                .output_directory
                .join(format!("{}-{}.txt", stem, counter));
            counter += 1;
        }

        taken.insert(collision_key(&candidate));
        Ok(candidate)
    }

    fn write_text(&self, source: &Path, path: PathBuf, text: &str) -> Result<OutputArtifact> {
        let mut writer = BufWriter::new(fs::File::create(&path)?);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;

        Ok(OutputArtifact {
            source_path: source.to_path_buf(),
            path,
            bytes_written: text.len() as u64,
        })
    }

    pub fn write_archive(&self, artifacts: &[OutputArtifact]) -> Result<PathBuf> {
        let archive_path = self.archive_path();
        let files: Vec<&Path> = artifacts.iter().map(|a| a.path.as_path()).collect();

        ArchiveWriter::new(self.archive_root()).write(&archive_path, &files)?;

        Ok(archive_path)
    }
}

fn collision_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
