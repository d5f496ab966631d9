//! Static web bundle serving.
//!
//! # Responsibilities
//! - Map a URL path to a file under the static root
//! - Refuse anything that resolves outside the root
//! - Fall back to the root `index.html` for client-side routes
//!
//! # Design Decisions
//! - Resolution canonicalizes before the containment check, so symlinks
//!   leading out of the root are treated as missing
//! - `/api/` is reserved: unknown API paths get a 404, never the UI
//! - File bytes, content type and range handling come from `ServeFile`

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::http::server::AppState;
use crate::security::paths::{clean_request_path, is_contained};

const INDEX_FILE: &str = "index.html";
const API_PREFIX: &str = "/api/";

/// A static root that existed when the service started.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    root: PathBuf,
    canonical_root: PathBuf,
}

impl StaticAssets {
    /// Look up the static root. Returns `Ok(None)` when it does not exist,
    /// which disables static serving.
    pub fn discover(root: &Path) -> io::Result<Option<Self>> {
        let root = std::path::absolute(root)?;
        let canonical_root = match std::fs::canonicalize(&root) {
            Ok(path) => path,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(
                    root = %root.display(),
                    "Static directory not found, static file serving disabled"
                );
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if !canonical_root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("static root {} is not a directory", root.display()),
            ));
        }

        Ok(Some(Self {
            root,
            canonical_root,
        }))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a raw URL path to a servable file, or `None` when the path
    /// is missing, undecodable or outside the root.
    pub async fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let decoded = urlencoding::decode(request_path).ok()?;
        let relative = clean_request_path(&decoded);
        let candidate = if relative.as_os_str().is_empty() {
            self.root.join(INDEX_FILE)
        } else {
            self.root.join(relative)
        };

        let resolved = self.contained(&candidate).await?;
        if tokio::fs::metadata(&resolved).await.ok()?.is_dir() {
            let index = self.contained(&resolved.join(INDEX_FILE)).await?;
            return is_file(&index).await.then_some(index);
        }

        Some(resolved)
    }

    /// The root `index.html`, if present.
    pub async fn spa_fallback(&self) -> Option<PathBuf> {
        let index = self.contained(&self.root.join(INDEX_FILE)).await?;
        is_file(&index).await.then_some(index)
    }

    async fn contained(&self, path: &Path) -> Option<PathBuf> {
        let canonical = tokio::fs::canonicalize(path).await.ok()?;
        is_contained(&self.canonical_root, &canonical).then_some(canonical)
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Fallback handler for every path without an explicit route.
pub async fn serve_static(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path().to_owned();
    if path.starts_with(API_PREFIX) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let Some(assets) = state.assets.as_ref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let file = match assets.resolve(&path).await {
        Some(file) => file,
        None => match assets.spa_fallback().await {
            Some(index) => index,
            None => return StatusCode::NOT_FOUND.into_response(),
        },
    };

    match ServeFile::new(&file).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bundle() -> (TempDir, StaticAssets) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>root</html>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "<html>docs</html>").unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();

        let assets = StaticAssets::discover(dir.path()).unwrap().unwrap();
        (dir, assets)
    }

    #[test]
    fn test_discover_missing_root_disables_serving() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(StaticAssets::discover(&missing).unwrap().is_none());
    }

    #[test]
    fn test_discover_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(StaticAssets::discover(&file).is_err());
    }

    #[tokio::test]
    async fn test_resolve_files_and_directories() {
        let (dir, assets) = bundle();
        let root = std::fs::canonicalize(dir.path()).unwrap();

        assert_eq!(assets.resolve("/").await, Some(root.join("index.html")));
        assert_eq!(
            assets.resolve("/assets/app.js").await,
            Some(root.join("assets/app.js"))
        );
        assert_eq!(assets.resolve("/docs").await, Some(root.join("docs/index.html")));
        assert_eq!(assets.resolve("/empty/").await, None);
        assert_eq!(assets.resolve("/missing.css").await, None);
    }

    #[tokio::test]
    async fn test_resolve_percent_encoded() {
        let (dir, assets) = bundle();
        std::fs::write(dir.path().join("with space.txt"), "x").unwrap();
        let root = std::fs::canonicalize(dir.path()).unwrap();

        assert_eq!(
            assets.resolve("/with%20space.txt").await,
            Some(root.join("with space.txt"))
        );
    }

    #[tokio::test]
    async fn test_traversal_stays_inside_root() {
        let (dir, assets) = bundle();
        let root = std::fs::canonicalize(dir.path()).unwrap();

        for path in ["/../../etc/passwd", "/%2e%2e/%2e%2e/etc/passwd", "/assets/../../../etc/passwd"] {
            if let Some(resolved) = assets.resolve(path).await {
                assert!(resolved.starts_with(&root), "{path} escaped to {resolved:?}");
            }
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_is_missing() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();

        let (dir, assets) = bundle();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("leak.txt"))
            .unwrap();

        assert_eq!(assets.resolve("/leak.txt").await, None);
    }

    #[tokio::test]
    async fn test_sibling_with_shared_prefix_is_outside() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("ui");
        let sibling = parent.path().join("ui-evil");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(&sibling).unwrap();
        std::fs::write(sibling.join("index.html"), "evil").unwrap();

        let assets = StaticAssets::discover(&root).unwrap().unwrap();
        assert_eq!(assets.resolve("/../ui-evil/index.html").await, None);
        assert_eq!(assets.spa_fallback().await, None);
    }
}
