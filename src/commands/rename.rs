//! Batch rename executor. Items are processed independently; one failure
//! never aborts the rest of the batch.

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::naming::{resolve_collision, sanitize_stem, split_name};

#[derive(Debug, Clone, Deserialize)]
pub struct RenameRequest {
    pub id: String,
    /// A suggestion taken verbatim, or admin-typed text plus extension.
    pub new_name: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenameStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameResult {
    pub id: String,
    pub status: RenameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RenameResult {
    fn success(id: &str, new_name: String) -> Self {
        Self {
            id: id.to_string(),
            status: RenameStatus::Success,
            new_name: Some(new_name),
            message: None,
        }
    }

    fn error(id: &str, message: &str) -> Self {
        Self {
            id: id.to_string(),
            status: RenameStatus::Error,
            new_name: None,
            message: Some(message.to_string()),
        }
    }
}

/// Apply a batch of renames. Results are one-to-one with requests, in
/// request order; the catalog is persisted as each item completes, so a
/// failing save is reported on that item instead of discarding the batch.
/// Only an empty request list is rejected outright.
pub fn apply_renames(
    catalog: &mut Catalog,
    requests: &[RenameRequest],
) -> Result<Vec<RenameResult>, String> {
    if requests.is_empty() {
        return Err("No images provided".to_string());
    }

    let mut results = Vec::with_capacity(requests.len());
    for request in requests {
        results.push(apply_one(catalog, request));
    }

    Ok(results)
}

fn apply_one(catalog: &mut Catalog, request: &RenameRequest) -> RenameResult {
    let record = match catalog.get(&request.id) {
        Some(r) => r.clone(),
        None => return RenameResult::error(&request.id, "File not found"),
    };
    let old_path = catalog.absolute_path(&record);
    if !old_path.is_file() {
        return RenameResult::error(&request.id, "File not found");
    }

    // The extension never changes across a rename; whatever the request
    // carries, the record's current one wins.
    let ext = record.extension();
    let stem = sanitize_stem(split_name(&request.new_name).0);
    let desired = if ext.is_empty() {
        stem
    } else {
        format!("{stem}.{ext}")
    };

    // Renaming a file to its current name is a no-op success, not a
    // collision with itself.
    if desired == record.file_name() {
        if let Err(e) = catalog.mark_processed(&request.id) {
            return RenameResult::error(&request.id, &e.to_string());
        }
        if let Err(e) = catalog.save() {
            warn!(id = %request.id, error = %e, "catalog save failed");
            return RenameResult::error(&request.id, &e.to_string());
        }
        return RenameResult::success(&request.id, desired);
    }

    let dir = match old_path.parent() {
        Some(d) => d,
        None => return RenameResult::error(&request.id, "Rename failed"),
    };
    let final_name = match resolve_collision(dir, &desired) {
        Ok(name) => name,
        Err(e) => {
            warn!(id = %request.id, error = %e, "could not resolve a free name");
            return RenameResult::error(&request.id, "Rename failed");
        }
    };

    let new_path = dir.join(&final_name);
    if let Err(e) = fs::rename(&old_path, &new_path) {
        warn!(id = %request.id, error = %e, "rename failed");
        return RenameResult::error(&request.id, "Rename failed");
    }

    let new_relative = match record.relative_path.rsplit_once('/') {
        Some((parent, _)) => format!("{parent}/{final_name}"),
        None => final_name.clone(),
    };
    let title = split_name(&final_name).0.to_string();
    if let Err(e) = catalog.update_path(&request.id, new_relative, title) {
        return RenameResult::error(&request.id, &e.to_string());
    }
    if let Err(e) = catalog.mark_processed(&request.id) {
        return RenameResult::error(&request.id, &e.to_string());
    }
    // The file has already moved; a failing save is a bookkeeping failure
    // reported on this item, not a reason to drop the batch envelope.
    if let Err(e) = catalog.save() {
        warn!(id = %request.id, error = %e, "catalog save failed after rename");
        return RenameResult::error(&request.id, &e.to_string());
    }

    debug!(id = %request.id, from = %record.relative_path, to = %final_name, "renamed");
    RenameResult::success(&request.id, final_name)
}
