//! Request path containment for static file serving.
//!
//! # Responsibilities
//! - Turn a URL path into a relative filesystem path
//! - Confirm a resolved path stays inside the served root
//!
//! # Design Decisions
//! - `..` is resolved lexically and can never climb above the root
//! - Containment compares path components, so `/srv/ui-evil` is not
//!   considered inside `/srv/ui`
//! - Callers canonicalize before checking containment, which also catches
//!   symlinks that point outside the root

use std::path::{Path, PathBuf};

/// Lexically clean a decoded URL path into a path relative to the root.
///
/// Empty, `.` and `..` segments are resolved without touching the
/// filesystem. The result is empty when the request targets the root.
pub fn clean_request_path(request_path: &str) -> PathBuf {
    let mut segments: Vec<&str> = Vec::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.iter().collect()
}

/// Whether `candidate` lies within `root`. Both must already be canonical.
pub fn is_contained(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}
