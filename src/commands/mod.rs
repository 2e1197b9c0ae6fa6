//! Request/response surface called by the host shell. Each command takes its
//! dependencies explicitly and returns a serde envelope; per-image failures
//! live inside the envelope, never abort siblings.

pub mod rename;
pub mod scan;
pub mod suggestions;

pub use rename::{apply_renames, RenameRequest, RenameResult, RenameStatus};
pub use scan::{bulk_scan, BacklogPage, PAGE_SIZE};
pub use suggestions::{get_uploaded_images, record_upload, ImageSuggestions, SuggestionBatch};
