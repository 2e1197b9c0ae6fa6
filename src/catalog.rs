//! Image catalog: the persistent record of every managed image, keyed by a
//! content hash so ids stay stable across renames.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::StoreError;
use crate::settings::STATE_DIR;

const CATALOG_FILE: &str = "catalog.json";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

pub fn is_image_path(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    ext.as_ref()
        .map(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false)
}

/// One managed image. `id` is derived from the file content at import time
/// (hex SHA-256, path-salted for duplicate-content files); renames update
/// `relative_path` and `title` but never the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    /// Path relative to the library root, forward slashes.
    pub relative_path: String,
    /// Display title, kept in sync with the filename stem on rename.
    pub title: String,
    /// Set once a rename has been applied; never reset.
    #[serde(default)]
    pub processed: bool,
}

impl ImageRecord {
    /// Lower-cased file extension. Preserved across renames.
    pub fn extension(&self) -> String {
        Path::new(&self.relative_path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogData {
    images: Vec<ImageRecord>,
}

/// Catalog of managed images for one library root, persisted as JSON in the
/// `.ai-renamer` sidecar directory. Records keep insertion (discovery) order,
/// which is the stable order backlog pages are served in.
pub struct Catalog {
    root: PathBuf,
    data: CatalogData,
}

impl Catalog {
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let root = root.canonicalize()?;
        let path = catalog_path(&root);
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            CatalogData::default()
        };
        Ok(Self { root, data })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the library root and import image files not yet cataloged.
    /// A known id whose file is gone from its recorded path (renamed
    /// outside this tool) has its path updated instead of being re-added;
    /// a second file with the same bytes gets its own record under a
    /// path-salted id. Returns how many records were added. Saves on
    /// completion.
    pub fn sync_library(&mut self) -> Result<usize, StoreError> {
        let mut added = 0usize;

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != STATE_DIR)
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_image_path(path) {
                continue;
            }
            let relative = match self.relative_of(path) {
                Some(rel) => rel,
                None => continue,
            };
            if self.data.images.iter().any(|r| r.relative_path == relative) {
                continue;
            }

            let mut id = hash_file(path)?;
            if let Some(idx) = self.data.images.iter().position(|r| r.id == id) {
                if !self.absolute_path(&self.data.images[idx]).exists() {
                    // Known image renamed outside this tool: repoint it.
                    self.data.images[idx].relative_path = relative;
                    continue;
                }
                // A second file with identical bytes. Salt the id with the
                // path so every on-disk asset keeps its own record.
                id = salted_id(&id, &relative);
            }

            let title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("")
                .to_string();
            self.data.images.push(ImageRecord {
                id,
                relative_path: relative,
                title,
                processed: false,
            });
            added += 1;
        }

        self.save()?;
        Ok(added)
    }

    pub fn get(&self, id: &str) -> Option<&ImageRecord> {
        self.data.images.iter().find(|r| r.id == id)
    }

    pub fn absolute_path(&self, record: &ImageRecord) -> PathBuf {
        let rel = record
            .relative_path
            .replace('/', std::path::MAIN_SEPARATOR_STR);
        self.root.join(rel)
    }

    /// Full count of unprocessed images, recomputed on every call.
    pub fn count_unprocessed(&self) -> usize {
        self.data.images.iter().filter(|r| !r.processed).count()
    }

    /// The `[offset, offset + limit)` slice of the unprocessed sequence,
    /// in stable discovery order.
    pub fn list_unprocessed(&self, offset: usize, limit: usize) -> Vec<ImageRecord> {
        self.data
            .images
            .iter()
            .filter(|r| !r.processed)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Mark an image processed (monotonic). In-memory; callers persist with
    /// [`Catalog::save`].
    pub fn mark_processed(&mut self, id: &str) -> Result<(), StoreError> {
        let record = self
            .data
            .images
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.processed = true;
        Ok(())
    }

    /// Record a rename: new relative path plus the derived title. In-memory;
    /// callers persist with [`Catalog::save`].
    pub fn update_path(
        &mut self,
        id: &str,
        new_relative_path: String,
        title: String,
    ) -> Result<(), StoreError> {
        let record = self
            .data
            .images
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.relative_path = new_relative_path;
        record.title = title;
        Ok(())
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let path = catalog_path(&self.root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn relative_of(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root)
            .ok()
            .and_then(|rel| rel.to_str())
            .map(|rel| rel.replace('\\', "/"))
    }
}

fn catalog_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join(CATALOG_FILE)
}

/// Distinct id for a duplicate-content file: the content hash re-hashed
/// with the relative path it was discovered at.
fn salted_id(content_hash: &str, relative_path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content_hash.as_bytes());
    hasher.update(relative_path.as_bytes());
    hex::encode(hasher.finalize())
}

/// Streaming SHA-256 of file content, hex encoded.
fn hash_file(path: &Path) -> Result<String, StoreError> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
