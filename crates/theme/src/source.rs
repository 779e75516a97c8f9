//! Fragment sources - where theme components actually come from.
//!
//! The resolution pipeline never touches storage directly; it goes through
//! the [`ComponentSource`] trait. Production uses [`FsComponentSource`],
//! which maps fragment paths onto `.html` files under a themes root laid
//! out as `{store}/{theme}/components/{slot}.html`. Tests and the CLI's
//! check command use [`StaticComponentSource`], an in-memory map that also
//! records every load call so ordering and call counts can be asserted.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::fragment::{Fragment, ParseError};
use crate::path::FragmentPath;

/// Error loading a fragment from a source.
///
/// `NotFound` is the routine case - most stores do not customize most
/// slots - and the loader recovers from every variant by falling back, so
/// none of these ever reach a page.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no fragment at {path}")]
    NotFound { path: String },

    #[error("fragment path {path} escapes the themes root")]
    InvalidPath { path: String },

    #[error("failed to read fragment at {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fragment at {path} failed to parse")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("loading fragment at {path} exceeded {}ms", timeout.as_millis())]
    Timeout { path: String, timeout: Duration },
}

/// A store of theme fragments addressable by [`FragmentPath`].
#[async_trait]
pub trait ComponentSource: Send + Sync {
    /// Load and parse the fragment at `path`.
    async fn load(&self, path: &FragmentPath) -> Result<Fragment, LoadError>;

    /// Enumerate every fragment path this source knows about.
    async fn scan(&self) -> Result<Vec<FragmentPath>, LoadError>;
}

// =============================================================================
// FsComponentSource
// =============================================================================

/// Filesystem-backed fragment source.
///
/// A fragment path `acme/theme3/components/Navbar` maps to
/// `{root}/acme/theme3/components/Navbar.html`.
#[derive(Debug, Clone)]
pub struct FsComponentSource {
    root: PathBuf,
}

impl FsComponentSource {
    /// Create a source reading fragments under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The themes root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, path: &FragmentPath) -> PathBuf {
        self.root.join(format!("{}.html", path.as_str()))
    }
}

#[async_trait]
impl ComponentSource for FsComponentSource {
    async fn load(&self, path: &FragmentPath) -> Result<Fragment, LoadError> {
        // Slot names are caller-supplied strings; never let one walk out of
        // the themes root.
        if path.has_parent_traversal() {
            return Err(LoadError::InvalidPath {
                path: path.as_str().to_string(),
            });
        }

        let file = self.file_for(path);
        let source = match tokio::fs::read_to_string(&file).await {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound {
                    path: path.as_str().to_string(),
                });
            }
            Err(e) => {
                return Err(LoadError::Io {
                    path: path.as_str().to_string(),
                    source: e,
                });
            }
        };

        Fragment::parse(source).map_err(|e| LoadError::Parse {
            path: path.as_str().to_string(),
            source: e,
        })
    }

    async fn scan(&self) -> Result<Vec<FragmentPath>, LoadError> {
        if !self.root.exists() {
            tracing::warn!("Themes directory does not exist: {:?}", self.root);
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        collect_fragments(&self.root, &self.root, &mut paths)?;
        paths.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(paths)
    }
}

/// Walk `dir` collecting every `.html` file as a root-relative fragment path.
fn collect_fragments(
    root: &Path,
    dir: &Path,
    out: &mut Vec<FragmentPath>,
) -> Result<(), LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|e| LoadError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_fragments(root, &path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            let relative = path
                .with_extension("")
                .strip_prefix(root)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            if !relative.is_empty() {
                out.push(FragmentPath::new(relative));
            }
        }
    }

    Ok(())
}

// =============================================================================
// StaticComponentSource
// =============================================================================

/// In-memory fragment source with load-call instrumentation.
///
/// Used by unit and integration tests to assert attempt ordering and call
/// counts, and by `vitrine-cli themes check` to dry-run resolution against
/// a scanned manifest.
#[derive(Debug, Default)]
pub struct StaticComponentSource {
    fragments: HashMap<String, String>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl StaticComponentSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment at `path`.
    #[must_use]
    pub fn with_fragment(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.fragments.insert(path.into(), source.into());
        self
    }

    /// Make loads of `path` fail with an IO error (simulates a present but
    /// unreadable fragment).
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<String>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Delay every load; lets tests overlap in-flight resolutions.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every load call so far, in order.
    #[must_use]
    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of load calls for `path`.
    #[must_use]
    pub fn load_count(&self, path: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.iter().filter(|p| *p == path).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl ComponentSource for StaticComponentSource {
    async fn load(&self, path: &FragmentPath) -> Result<Fragment, LoadError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(path.as_str().to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(path.as_str()) {
            return Err(LoadError::Io {
                path: path.as_str().to_string(),
                source: std::io::Error::other("simulated load failure"),
            });
        }

        let Some(source) = self.fragments.get(path.as_str()) else {
            return Err(LoadError::NotFound {
                path: path.as_str().to_string(),
            });
        };

        Fragment::parse(source.clone()).map_err(|e| LoadError::Parse {
            path: path.as_str().to_string(),
            source: e,
        })
    }

    async fn scan(&self) -> Result<Vec<FragmentPath>, LoadError> {
        let mut paths: Vec<FragmentPath> = self
            .fragments
            .keys()
            .map(|k| FragmentPath::new(k.clone()))
            .collect();
        paths.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(paths)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn path(s: &str) -> FragmentPath {
        FragmentPath::new(s.to_string())
    }

    #[tokio::test]
    async fn test_static_source_load_and_count() {
        let source = StaticComponentSource::new()
            .with_fragment("acme/theme1/components/Navbar", "<nav>{{store_name}}</nav>");

        let fragment = source.load(&path("acme/theme1/components/Navbar")).await.unwrap();
        assert_eq!(fragment.placeholders(), ["store_name"]);
        assert_eq!(source.load_count("acme/theme1/components/Navbar"), 1);
    }

    #[tokio::test]
    async fn test_static_source_missing_is_not_found() {
        let source = StaticComponentSource::new();
        let err = source.load(&path("nowhere")).await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_fs_source_reads_fragment_files() {
        let dir = tempfile::tempdir().unwrap();
        let components = dir.path().join("acme/theme1/components");
        std::fs::create_dir_all(&components).unwrap();
        std::fs::write(components.join("Navbar.html"), "<nav>{{store_name}}</nav>").unwrap();

        let source = FsComponentSource::new(dir.path());
        let fragment = source.load(&path("acme/theme1/components/Navbar")).await.unwrap();
        assert_eq!(fragment.placeholders(), ["store_name"]);
    }

    #[tokio::test]
    async fn test_fs_source_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsComponentSource::new(dir.path());
        let err = source.load(&path("acme/theme1/components/Hero")).await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_fs_source_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsComponentSource::new(dir.path());
        let err = source.load(&path("acme/../../etc/passwd")).await.unwrap_err();
        assert!(matches!(err, LoadError::InvalidPath { .. }));
    }

    #[tokio::test]
    async fn test_fs_source_scan_lists_fragments() {
        let dir = tempfile::tempdir().unwrap();
        for p in [
            "acme/theme1/components/Navbar",
            "default/Grocery/theme1/components/Navbar",
        ] {
            let file = dir.path().join(format!("{p}.html"));
            std::fs::create_dir_all(file.parent().unwrap()).unwrap();
            std::fs::write(file, "<div></div>").unwrap();
        }

        let source = FsComponentSource::new(dir.path());
        let paths = source.scan().await.unwrap();
        let names: Vec<&str> = paths.iter().map(FragmentPath::as_str).collect();
        assert_eq!(
            names,
            [
                "acme/theme1/components/Navbar",
                "default/Grocery/theme1/components/Navbar"
            ]
        );
    }

    #[tokio::test]
    async fn test_fs_source_scan_missing_root_is_empty() {
        let source = FsComponentSource::new("/nonexistent/themes/root");
        assert!(source.scan().await.unwrap().is_empty());
    }
}
