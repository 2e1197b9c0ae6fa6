//! Pending-upload store: image ids waiting for suggestion display.
//!
//! Entries are queued by the host's upload hook and consumed (cleared) by the
//! next suggestion fetch. Entries never consumed expire after five minutes.

use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const PENDING_TTL: Duration = Duration::from_secs(5 * 60);

/// Hard cap on queued entries; beyond this the oldest entry is evicted.
const MAX_PENDING: usize = 256;

#[derive(Debug)]
struct PendingEntry {
    image_id: String,
    queued_at: Instant,
}

/// Short-lived set of uploaded image ids, owned by the host and passed into
/// the suggestion fetch explicitly.
#[derive(Debug)]
pub struct PendingUploads {
    ttl: Duration,
    entries: Mutex<Vec<PendingEntry>>,
}

impl Default for PendingUploads {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingUploads {
    pub fn new() -> Self {
        Self::with_ttl(PENDING_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Queue an uploaded image for the next suggestion fetch. Already-queued
    /// ids are not duplicated.
    pub fn record(&self, image_id: &str) {
        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|e| e.image_id == image_id) {
            return;
        }
        entries.retain(|e| e.queued_at.elapsed() < self.ttl);
        if entries.len() >= MAX_PENDING {
            entries.remove(0);
        }
        entries.push(PendingEntry {
            image_id: image_id.to_string(),
            queued_at: Instant::now(),
        });
    }

    /// Read-and-clear: returns queued ids in upload order, dropping entries
    /// older than the TTL. Draining an empty queue yields an empty list.
    pub fn drain(&self) -> Vec<String> {
        let mut entries = self.entries.lock().unwrap();
        let drained = std::mem::take(&mut *entries);
        drained
            .into_iter()
            .filter(|e| e.queued_at.elapsed() < self.ttl)
            .map(|e| e.image_id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
