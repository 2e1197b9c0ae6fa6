//! End-to-end coverage of the suggestion/rename/scan pipeline against a real
//! temporary library, with a stub label provider instead of the network.

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

use ai_image_renamer::commands::{
    apply_renames, bulk_scan, get_uploaded_images, record_upload, RenameRequest, RenameStatus,
    PAGE_SIZE,
};
use ai_image_renamer::error::ProviderError;
use ai_image_renamer::providers::LabelProvider;
use ai_image_renamer::queue::PendingUploads;
use ai_image_renamer::settings::Settings;
use ai_image_renamer::Catalog;

struct StubProvider {
    labels: Vec<String>,
}

impl StubProvider {
    fn with_labels(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[async_trait]
impl LabelProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn labels(&self, _image: &Path) -> Result<Vec<String>, ProviderError> {
        Ok(self.labels.clone())
    }
}

/// Provider that always fails, standing in for missing credentials or a
/// network outage.
struct BrokenProvider;

#[async_trait]
impl LabelProvider for BrokenProvider {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn labels(&self, _image: &Path) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::MissingApiKey("stub"))
    }
}

fn seed_library(root: &Path, count: usize) -> Catalog {
    for i in 0..count {
        fs::write(root.join(format!("upload-{i:02}.jpg")), format!("bytes-{i}"))
            .expect("seed image");
    }
    let mut catalog = Catalog::open(root).expect("open catalog");
    catalog.sync_library().expect("sync");
    catalog
}

fn unprocessed_ids(catalog: &Catalog, n: usize) -> Vec<String> {
    catalog
        .list_unprocessed(0, n)
        .into_iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn batch_executor_is_partial_failure_safe() {
    let temp = tempdir().expect("tempdir");
    let mut catalog = seed_library(temp.path(), 3);
    let ids = unprocessed_ids(&catalog, 3);

    // Item 2's file disappears before the batch runs.
    let missing = catalog.get(&ids[1]).expect("record").clone();
    fs::remove_file(catalog.absolute_path(&missing)).expect("remove");

    let requests: Vec<RenameRequest> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| RenameRequest {
            id: id.clone(),
            new_name: format!("renamed-{i}.jpg"),
        })
        .collect();
    let results = apply_renames(&mut catalog, &requests).expect("batch");

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].status, RenameStatus::Success);
    assert_eq!(results[1].status, RenameStatus::Error);
    assert_eq!(results[2].status, RenameStatus::Success);
    assert!(results[1]
        .message
        .as_deref()
        .expect("message")
        .to_lowercase()
        .contains("not found"));

    assert!(catalog.get(&ids[0]).expect("r0").processed);
    assert!(!catalog.get(&ids[1]).expect("r1").processed);
    assert!(catalog.get(&ids[2]).expect("r2").processed);

    // Renamed files exist under their reported names.
    for result in [&results[0], &results[2]] {
        let name = result.new_name.as_deref().expect("final name");
        assert!(temp.path().join(name).is_file(), "missing {name}");
    }
}

#[test]
fn extension_is_preserved_across_rename() {
    let temp = tempdir().expect("tempdir");
    let mut catalog = seed_library(temp.path(), 1);
    let id = unprocessed_ids(&catalog, 1).remove(0);

    // Requested .png must not override the image's actual .jpg.
    let results = apply_renames(
        &mut catalog,
        &[RenameRequest {
            id: id.clone(),
            new_name: "My Photo!! 2024.png".to_string(),
        }],
    )
    .expect("batch");

    assert_eq!(results[0].status, RenameStatus::Success);
    assert_eq!(results[0].new_name.as_deref(), Some("MyPhoto2024.jpg"));
    assert!(temp.path().join("MyPhoto2024.jpg").is_file());

    let record = catalog.get(&id).expect("record");
    assert_eq!(record.relative_path, "MyPhoto2024.jpg");
    assert_eq!(record.title, "MyPhoto2024");
}

#[test]
fn occupied_target_is_suffixed_not_overwritten() {
    let temp = tempdir().expect("tempdir");
    fs::write(temp.path().join("sunset.jpg"), b"already here").expect("existing");
    let mut catalog = seed_library(temp.path(), 1);

    let id = catalog
        .list_unprocessed(0, PAGE_SIZE)
        .into_iter()
        .find(|r| r.relative_path != "sunset.jpg")
        .expect("seeded record")
        .id;

    let results = apply_renames(
        &mut catalog,
        &[RenameRequest {
            id,
            new_name: "sunset.jpg".to_string(),
        }],
    )
    .expect("batch");

    assert_eq!(results[0].status, RenameStatus::Success);
    let final_name = results[0].new_name.as_deref().expect("final name");
    assert_ne!(final_name, "sunset.jpg");
    assert!(final_name.starts_with("sunset-") && final_name.ends_with(".jpg"));
    assert!(temp.path().join(final_name).is_file());
    // The occupant is untouched.
    assert_eq!(
        fs::read(temp.path().join("sunset.jpg")).expect("read"),
        b"already here"
    );
}

#[test]
fn save_failure_is_reported_per_item_not_as_batch_error() {
    let temp = tempdir().expect("tempdir");
    let mut catalog = seed_library(temp.path(), 2);
    let ids = unprocessed_ids(&catalog, 2);

    // Block catalog persistence: a directory squatting on the catalog file
    // makes every save fail while the image files stay writable.
    let catalog_file = temp.path().join(".ai-renamer").join("catalog.json");
    fs::remove_file(&catalog_file).expect("remove catalog file");
    fs::create_dir(&catalog_file).expect("squat on catalog path");

    let requests: Vec<RenameRequest> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| RenameRequest {
            id: id.clone(),
            new_name: format!("renamed-{i}.jpg"),
        })
        .collect();
    let results = apply_renames(&mut catalog, &requests).expect("envelope must survive");

    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.status, RenameStatus::Error);
        assert!(result.new_name.is_none());
    }
    // The files themselves did move; only the bookkeeping failed.
    assert!(temp.path().join("renamed-0.jpg").is_file());
    assert!(temp.path().join("renamed-1.jpg").is_file());
}

#[test]
fn empty_request_list_is_rejected() {
    let temp = tempdir().expect("tempdir");
    let mut catalog = seed_library(temp.path(), 1);
    let err = apply_renames(&mut catalog, &[]).expect_err("must reject");
    assert!(err.contains("No images"));
}

#[tokio::test]
async fn backlog_pages_through_25_images() {
    let temp = tempdir().expect("tempdir");
    let mut catalog = seed_library(temp.path(), 25);
    let settings = Settings::default();
    let provider = StubProvider::with_labels(&["Dog", "Beach", "Sunset"]);

    let page = bulk_scan(&catalog, &settings, &provider, 0)
        .await
        .expect("scan");
    assert_eq!(page.images.len(), 10);
    assert_eq!(page.total_remaining, 25);
    assert_eq!(page.next_offset, Some(10));
    assert_eq!(
        page.images[0].suggestions,
        vec!["dog-beach-sunset.jpg", "beach-sunset.jpg", "sunset.jpg"]
    );

    let last = bulk_scan(&catalog, &settings, &provider, 20)
        .await
        .expect("scan");
    assert_eq!(last.images.len(), 5);
    assert_eq!(last.next_offset, None);

    // Process everything; the backlog must drain permanently.
    let requests: Vec<RenameRequest> = unprocessed_ids(&catalog, 25)
        .into_iter()
        .enumerate()
        .map(|(i, id)| RenameRequest {
            id,
            new_name: format!("done-{i:02}.jpg"),
        })
        .collect();
    let results = apply_renames(&mut catalog, &requests).expect("batch");
    assert!(results.iter().all(|r| r.status == RenameStatus::Success));

    let after = bulk_scan(&catalog, &settings, &provider, 0)
        .await
        .expect("scan");
    assert!(after.images.is_empty());
    assert_eq!(after.total_remaining, 0);
    assert_eq!(after.next_offset, None);
}

#[tokio::test]
async fn drained_upload_queue_stays_empty() {
    let temp = tempdir().expect("tempdir");
    let catalog = seed_library(temp.path(), 2);
    let settings = Settings::default();
    let provider = StubProvider::with_labels(&["Cat"]);
    let queue = PendingUploads::new();

    for id in unprocessed_ids(&catalog, 2) {
        record_upload(&queue, &catalog, &id);
    }
    record_upload(&queue, &catalog, "not-a-known-id");

    let batch = get_uploaded_images(&queue, &catalog, &settings, &provider)
        .await
        .expect("fetch");
    assert_eq!(batch.images.len(), 2);
    assert_eq!(batch.images[0].ext, "jpg");
    assert_eq!(batch.images[0].suggestions, vec!["cat.jpg"]);

    // Queue was consumed; both follow-up fetches see nothing.
    for _ in 0..2 {
        let empty = get_uploaded_images(&queue, &catalog, &settings, &provider)
            .await
            .expect("fetch");
        assert!(empty.images.is_empty());
    }
}

#[tokio::test]
async fn expired_uploads_never_surface() {
    let temp = tempdir().expect("tempdir");
    let catalog = seed_library(temp.path(), 1);
    let settings = Settings::default();
    let provider = StubProvider::with_labels(&["Cat"]);
    let queue = PendingUploads::with_ttl(Duration::ZERO);

    let id = unprocessed_ids(&catalog, 1).remove(0);
    record_upload(&queue, &catalog, &id);

    let batch = get_uploaded_images(&queue, &catalog, &settings, &provider)
        .await
        .expect("fetch");
    assert!(batch.images.is_empty());
}

#[tokio::test]
async fn provider_failure_degrades_to_no_suggestions() {
    let temp = tempdir().expect("tempdir");
    let catalog = seed_library(temp.path(), 1);
    let settings = Settings::default();

    let page = bulk_scan(&catalog, &settings, &BrokenProvider, 0)
        .await
        .expect("scan must not fail");
    assert_eq!(page.images.len(), 1);
    assert!(page.images[0].suggestions.is_empty());
    assert_eq!(page.total_remaining, 1);
}

#[tokio::test]
async fn public_base_url_shapes_image_urls() {
    let temp = tempdir().expect("tempdir");
    let catalog = seed_library(temp.path(), 1);
    let settings = Settings {
        public_base_url: Some("https://cdn.example.com/media/".to_string()),
        ..Default::default()
    };
    let provider = StubProvider::with_labels(&["Cat"]);

    let page = bulk_scan(&catalog, &settings, &provider, 0)
        .await
        .expect("scan");
    assert_eq!(
        page.images[0].url,
        "https://cdn.example.com/media/upload-00.jpg"
    );
}
