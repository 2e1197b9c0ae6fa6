//! Paginated scan over the unprocessed backlog.

use serde::Serialize;
use tracing::debug;

use super::suggestions::{image_url, ImageSuggestions};
use crate::catalog::Catalog;
use crate::providers::{fetch_labels, LabelProvider};
use crate::settings::Settings;
use crate::suggest::suggestions_from_labels;

/// Fixed page size; keeps total label-fetch latency per scan acceptable.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Serialize)]
pub struct BacklogPage {
    pub images: Vec<ImageSuggestions>,
    /// Unprocessed count at the moment of the call, recomputed every time.
    pub total_remaining: usize,
    /// Offset for the next page, `None` at end of backlog.
    pub next_offset: Option<usize>,
}

/// Return the `[offset, offset + PAGE_SIZE)` slice of the unprocessed
/// backlog with suggestions generated per image. Records whose file has gone
/// missing on disk stay in `total_remaining` but are skipped from the page.
///
/// Pagination is stateless: callers advance `offset` by the page size while
/// `total_remaining` shrinks as items get processed, so the sequence can
/// shift between calls. Tolerated for a single-admin tool.
pub async fn bulk_scan(
    catalog: &Catalog,
    settings: &Settings,
    provider: &dyn LabelProvider,
    offset: usize,
) -> Result<BacklogPage, String> {
    let total_remaining = catalog.count_unprocessed();

    let mut images = Vec::new();
    for record in catalog.list_unprocessed(offset, PAGE_SIZE) {
        let path = catalog.absolute_path(&record);
        if !path.is_file() {
            continue;
        }

        let labels = fetch_labels(provider, &path).await;
        let ext = record.extension();
        images.push(ImageSuggestions {
            id: record.id.clone(),
            url: image_url(settings, catalog, &record),
            suggestions: suggestions_from_labels(&labels, &ext),
            ext,
        });
    }

    let next_offset = match offset + PAGE_SIZE {
        n if n >= total_remaining => None,
        n => Some(n),
    };

    debug!(offset, total_remaining, page_len = images.len(), "backlog scan");
    Ok(BacklogPage {
        images,
        total_remaining,
        next_offset,
    })
}
