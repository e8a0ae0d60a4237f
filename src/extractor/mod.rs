pub mod archive;
pub mod batch;
pub mod output_manager;
pub mod text_extractor;

pub use archive::{list_entries, ArchiveWriter};
pub use batch::{
    extract_text_from_folder, ExtractionProgress, ExtractionResult, FolderExtractor, FolderReport,
};
pub use output_manager::{ArchiveLocation, LayoutKind, OutputArtifact, OutputLayout, OutputManager};
pub use text_extractor::{extract_text, try_extract_text, ExtractionFailure};
