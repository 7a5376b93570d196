//! Request path resolution.
//!
//! Maps a request path onto a file under the served root. This is the single
//! resolution authority: the HTML and static paths both serve whatever it picks.
//!
//! Policy, in order:
//! 1. `root + path`
//! 2. a directory becomes `dir/index.html`
//! 3. anything missing becomes `root/index.html` (SPA fallback)
//! 4. non-HTML targets go to the static server
//! 5. an HTML target that still does not exist is not found

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Directory index and SPA fallback document.
pub(crate) const INDEX_FILE: &str = "index.html";

/// Kind of filesystem entry found at a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EntryKind {
    File,
    Dir,
}

/// Answers existence questions for the resolver.
pub(crate) trait FileProbe: Send + Sync {
    /// Returns the kind of entry at `path`, or `None` if nothing is there.
    fn entry_kind(&self, path: &Path) -> Option<EntryKind>;
}

/// Probe backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FsProbe;

impl FileProbe for FsProbe {
    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        let metadata = std::fs::metadata(path).ok()?;
        Some(if metadata.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        })
    }
}

/// Outcome of resolving one request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Resolved {
    /// HTML document to serve with the reload snippet.
    Html(PathBuf),
    /// Any other file, handed to the static server.
    Static(PathBuf),
    /// HTML target missing even after the SPA fallback.
    NotFound,
    /// Path escapes the served root or contains forbidden characters.
    Forbidden,
}

/// Resolves request paths against a fixed served root.
pub(crate) struct Resolver<P = FsProbe> {
    root: PathBuf,
    probe: P,
}

impl Resolver<FsProbe> {
    /// Create a resolver over the real filesystem.
    pub(crate) fn new(root: PathBuf) -> Self {
        Self::with_probe(root, FsProbe)
    }
}

impl<P: FileProbe> Resolver<P> {
    /// Create a resolver with a custom probe.
    pub(crate) fn with_probe(root: PathBuf, probe: P) -> Self {
        Self { root, probe }
    }

    /// Resolve a request path (query already stripped).
    pub(crate) fn resolve(&self, request_path: &str) -> Resolved {
        let Some(relative) = normalize_request_path(request_path) else {
            return Resolved::Forbidden;
        };

        let mut candidate = if relative.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        };

        if self.probe.entry_kind(&candidate) == Some(EntryKind::Dir) {
            candidate.push(INDEX_FILE);
        }

        if self.probe.entry_kind(&candidate).is_none() {
            candidate = self.root.join(INDEX_FILE);
        }

        if !is_html(&candidate) {
            return Resolved::Static(candidate);
        }

        if self.probe.entry_kind(&candidate).is_none() {
            return Resolved::NotFound;
        }

        Resolved::Html(candidate)
    }
}

/// Check for an `.html`/`.htm` extension, ignoring ASCII case.
pub(crate) fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Percent-decode and lexically normalise a request path.
///
/// Returns the path relative to the root, or `None` when a `..` climbs above
/// the root or a segment carries a NUL byte or backslash.
fn normalize_request_path(request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();
    if decoded.contains(['\0', '\\']) {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    Some(segments.iter().collect())
}
