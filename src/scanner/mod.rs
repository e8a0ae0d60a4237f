pub mod file_filter;
pub mod pdf_scanner;

pub use file_filter::FileFilter;
pub use pdf_scanner::{PdfScanner, ScanStatistics, SourceFile};
