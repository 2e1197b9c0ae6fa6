//! AI-assisted image renaming: label-detection providers, kebab-case
//! filename suggestions, collision-safe batch renames, and paginated
//! scanning over the unprocessed backlog. The host admin shell supplies
//! uploads, transport, and UI; this crate supplies everything in between.

pub mod catalog;
pub mod commands;
pub mod error;
pub mod naming;
pub mod providers;
pub mod queue;
pub mod settings;
pub mod suggest;

pub use catalog::{Catalog, ImageRecord};
pub use commands::{
    apply_renames, bulk_scan, get_uploaded_images, record_upload, BacklogPage, ImageSuggestions,
    RenameRequest, RenameResult, RenameStatus, SuggestionBatch, PAGE_SIZE,
};
pub use providers::{provider_for, LabelProvider};
pub use queue::PendingUploads;
pub use settings::{load_settings, save_settings, Provider, Settings};
