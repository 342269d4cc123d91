//! Normalization engine: turns extracted vendor products into canonical
//! order-sheet rows.

pub mod batch;
pub mod brand;
pub mod category;
pub mod dates;
pub mod error;
pub mod intake;
pub mod row;

pub use batch::{Batch, BatchBuilder};
pub use brand::{resolve_brand, BrandResolution, BrandSource};
pub use category::{classify, Classification};
pub use dates::{normalize_date, normalize_release_month, shift_cutoff_backward};
pub use error::{Diagnostic, DiagnosticKind, NormalizeError};
pub use intake::{
    cutoff_from_filename, detect_file_brand, ingest_file, parse_extraction, ExtractionResult,
    SourceFile,
};
pub use row::{AssembledRow, RowAssembler};
