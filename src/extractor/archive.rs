use crate::error::{PdfTextError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Writes a zip whose entry names are relative to `base_dir`.
pub struct ArchiveWriter {
    base_dir: PathBuf,
    compression: CompressionMethod,
}

impl ArchiveWriter {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.into(),
            compression: CompressionMethod::Deflated,
        }
    }

    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    /// `/`-separated name of `path` relative to the base directory.
    pub fn entry_name(&self, path: &Path) -> Result<String> {
        let relative = path
            .strip_prefix(&self.base_dir)
            .map_err(|_| PdfTextError::InvalidPath {
                path: format!(
                    "{} is outside archive root {}",
                    path.display(),
                    self.base_dir.display()
                ),
            })?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => {
                    return Err(PdfTextError::InvalidPath {
                        path: format!("Unsupported archive entry path: {}", relative.display()),
                    })
                }
            }
        }

        if parts.is_empty() {
            return Err(PdfTextError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        Ok(parts.join("/"))
    }

    /// Creates (or truncates) `archive_path` and adds every file in order.
    pub fn write<P: AsRef<Path>>(&self, archive_path: &Path, files: &[P]) -> Result<usize> {
        if let Some(parent) = archive_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut zip = ZipWriter::new(BufWriter::new(File::create(archive_path)?));
        let options = SimpleFileOptions::default().compression_method(self.compression);

        for file in files {
            let file = file.as_ref();
            zip.start_file(self.entry_name(file)?, options)?;
            let mut source = File::open(file)?;
            std::io::copy(&mut source, &mut zip)?;
        }

        let mut writer = zip.finish()?;
        writer.flush()?;

        Ok(files.len())
    }
}

/// Entry names of an existing archive, in stored order.
pub fn list_entries(archive_path: &Path) -> Result<Vec<String>> {
    let archive = ZipArchive::new(File::open(archive_path)?)?;
    Ok(archive.file_names().map(str::to_owned).collect())
}
