//! Lexically canonical path handling
//!
//! Paths are compared and combined as strings, never by touching the
//! filesystem: symlinks are not resolved and the paths need not exist.

use std::path::{Path, PathBuf};

/// A path in canonical lexical form.
///
/// Canonicalization converts backslashes to forward slashes, drops empty
/// and `.` segments and resolves `..` against the preceding segment. A
/// `..` that would climb above `/` is dropped; leading `..` segments of a
/// relative path are kept. The empty relative path is `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Canonical form, always forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// The filesystem root, `/`.
    pub fn root() -> Self {
        Self {
            inner: "/".to_string(),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Consume the path, returning its canonical string.
    pub fn into_string(self) -> String {
        self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Whether the path starts at `/`.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/')
    }

    /// Whether this is the filesystem root itself.
    pub fn is_root(&self) -> bool {
        self.inner == "/"
    }

    /// Join this path with a segment.
    ///
    /// An absolute segment replaces the base entirely, matching POSIX
    /// join semantics.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        if segment.starts_with('/') {
            return Self::new(segment);
        }
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Express this path relative to `root`.
    ///
    /// Comparison is per segment, so `/etc` is not an ancestor of
    /// `/etcetera`. A path equal to `root` becomes `.`. Returns `None`
    /// when `root` is neither this path nor one of its ancestors, except
    /// for the root `/`, which accepts every absolute path, and `.`,
    /// which accepts every relative path not starting with `..`.
    pub fn strip_root(&self, root: &NormalizedPath) -> Option<NormalizedPath> {
        if root.inner == "." {
            let escapes = self.inner == ".." || self.inner.starts_with("../");
            return (!self.is_absolute() && !escapes).then(|| self.clone());
        }
        if root.is_root() {
            let rest = self.inner.trim_start_matches('/');
            return Some(Self {
                inner: if rest.is_empty() { ".".into() } else { rest.into() },
            });
        }
        if self.inner == root.inner {
            return Some(Self { inner: ".".into() });
        }
        let rest = self.inner.strip_prefix(root.as_str())?.strip_prefix('/')?;
        Some(Self { inner: rest.into() })
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            _ if self.is_root() => None,
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() || self.inner == "." {
            return None;
        }
        self.inner.rsplit('/').next()
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

/// Collapse a forward-slash path into canonical form.
fn clean(raw: &str) -> String {
    let absolute = raw.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
