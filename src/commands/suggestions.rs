//! Suggestions for freshly uploaded images.

use serde::Serialize;

use crate::catalog::{Catalog, ImageRecord};
use crate::providers::{fetch_labels, LabelProvider};
use crate::queue::PendingUploads;
use crate::settings::Settings;
use crate::suggest::suggestions_from_labels;

/// One image with its candidate filenames, ready for the admin to pick from.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSuggestions {
    pub id: String,
    pub url: String,
    pub ext: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionBatch {
    pub images: Vec<ImageSuggestions>,
}

/// Upload hook: queue a newly uploaded image for the next suggestion fetch.
/// Ids not in the catalog (non-image assets) are ignored.
pub fn record_upload(queue: &PendingUploads, catalog: &Catalog, image_id: &str) {
    if catalog.get(image_id).is_none() {
        return;
    }
    queue.record(image_id);
}

/// Drain the pending-upload queue and return suggestions for each queued
/// image. Label fetches run sequentially; a drained queue yields an empty
/// batch, again and again, until something new is uploaded.
pub async fn get_uploaded_images(
    queue: &PendingUploads,
    catalog: &Catalog,
    settings: &Settings,
    provider: &dyn LabelProvider,
) -> Result<SuggestionBatch, String> {
    let mut images = Vec::new();

    for id in queue.drain() {
        let record = match catalog.get(&id) {
            Some(r) => r,
            None => continue,
        };
        let path = catalog.absolute_path(record);
        if !path.is_file() {
            continue;
        }

        let labels = fetch_labels(provider, &path).await;
        let ext = record.extension();
        images.push(ImageSuggestions {
            id: record.id.clone(),
            url: image_url(settings, catalog, record),
            suggestions: suggestions_from_labels(&labels, &ext),
            ext,
        });
    }

    Ok(SuggestionBatch { images })
}

pub(crate) fn image_url(settings: &Settings, catalog: &Catalog, record: &ImageRecord) -> String {
    match &settings.public_base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), record.relative_path),
        None => catalog.absolute_path(record).display().to_string(),
    }
}
