//! Server-side filename validation and collision resolution.
//!
//! The admin UI already filters typed names to `[a-zA-Z0-9-]`; everything
//! here re-applies that defensively, since requests cannot be trusted to
//! have gone through the UI.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::NamingError;

/// Longest accepted filename stem, in bytes. Conservative against common
/// filesystem limits once the extension and a collision suffix are added.
pub const MAX_STEM_LEN: usize = 200;

/// Fallback stem when sanitization strips everything or hits a reserved name.
const FALLBACK_STEM: &str = "image";

/// Windows reserved device names, refused regardless of platform so a
/// library stays portable.
const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Reduce a requested stem to `[A-Za-z0-9-]`. Spaces and punctuation are
/// stripped (not hyphenated), matching the admin-side input filter; path
/// separators cannot survive. Reserved names and empty results fall back to
/// `"image"`; overlong stems are truncated.
pub fn sanitize_stem(input: &str) -> String {
    let mut stem: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    stem.truncate(MAX_STEM_LEN);

    if stem.is_empty() || RESERVED_NAMES.contains(&stem.to_ascii_lowercase().as_str()) {
        return FALLBACK_STEM.to_string();
    }
    stem
}

/// Split `name` into stem and extension at the last dot. A name without a
/// dot has no extension.
pub fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

const MAX_SUFFIX_ATTEMPTS: usize = 5;

/// Decide the final on-disk name for `desired` inside `dir`.
///
/// A free target is returned unchanged. An occupied one gets a
/// `<stem>-<token>.<ext>` replacement with a fresh timestamp-derived token,
/// retried a bounded number of times before giving up. The check-then-rename
/// window under concurrent batches is not closed here; this tool assumes a
/// single admin actor.
pub fn resolve_collision(dir: &Path, desired: &str) -> Result<String, NamingError> {
    resolve_collision_with(dir, desired, unique_token)
}

fn resolve_collision_with(
    dir: &Path,
    desired: &str,
    mut next_token: impl FnMut() -> String,
) -> Result<String, NamingError> {
    if !dir.join(desired).exists() {
        return Ok(desired.to_string());
    }

    let (stem, ext) = split_name(desired);
    for _ in 0..MAX_SUFFIX_ATTEMPTS {
        let candidate = match ext {
            Some(ext) => format!("{}-{}.{}", stem, next_token(), ext),
            None => format!("{}-{}", stem, next_token()),
        };
        if !dir.join(&candidate).exists() {
            return Ok(candidate);
        }
    }
    Err(NamingError::Collision(desired.to_string()))
}

/// Short unpredictable token: millisecond timestamp plus sub-millisecond
/// nanos, hex encoded.
fn unique_token() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{:x}{:04x}", now.as_millis(), now.subsec_nanos() & 0xffff)
}
