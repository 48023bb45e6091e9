//! Safe resolution of manifest-declared relative paths.
//!
//! Resolution is lexical: the base directory is canonicalized when it exists,
//! the declared reference is joined and normalized, and the result must stay
//! inside the base subtree. Targets that already exist are also checked
//! with symlinks followed. Existence itself is not checked here.

use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Rejection of a declared reference.
pub enum PathError {
    #[error("Absolute paths not allowed: {0}")]
    Absolute(String),
    #[error("Path traversal detected: {0}")]
    Traversal(String),
}

impl PathError {
    /// Stable error code used when the plugin source itself is rejected.
    pub fn code(&self) -> &'static str {
        match self {
            PathError::Absolute(_) => "absolute_path_not_allowed",
            PathError::Traversal(_) => "path_traversal_detected",
        }
    }

    /// Placeholder shown instead of an expected path for a rejected source.
    pub fn placeholder(&self) -> &'static str {
        match self {
            PathError::Absolute(_) => "(absolute paths not allowed)",
            PathError::Traversal(_) => "(path traversal detected)",
        }
    }
}

/// Resolve `declared` against `base`, rejecting absolute references and
/// anything that escapes the base directory.
pub fn resolve(declared: &str, base: &Path) -> Result<PathBuf, PathError> {
    if declared.starts_with('/') || Path::new(declared).has_root() {
        debug!(path = declared, "rejected absolute path");
        return Err(PathError::Absolute(declared.to_string()));
    }
    let clean = declared.strip_prefix("./").unwrap_or(declared);
    let anchor = anchor_dir(base);
    let resolved = normalize(&anchor.join(clean));
    if !resolved.starts_with(&anchor) {
        debug!(path = declared, base = %anchor.display(), "rejected path traversal");
        return Err(PathError::Traversal(declared.to_string()));
    }
    // existing targets are re-checked with symlinks followed
    if let Ok(real) = fs::canonicalize(&resolved) {
        if !real.starts_with(&anchor) {
            debug!(
                path = declared,
                target = %real.display(),
                "rejected symlink escaping base"
            );
            return Err(PathError::Traversal(declared.to_string()));
        }
    }
    Ok(resolved)
}

/// Canonical form of `base` if it exists, otherwise its normalized absolute
/// form. An empty base means the current directory.
pub fn anchor_dir(base: &Path) -> PathBuf {
    let base = if base.as_os_str().is_empty() {
        Path::new(".")
    } else {
        base
    };
    fs::canonicalize(base).unwrap_or_else(|_| {
        let abs = std::path::absolute(base)
            .or_else(|_| std::env::current_dir().map(|cwd| cwd.join(base)))
            .unwrap_or_else(|_| base.to_path_buf());
        normalize(&abs)
    })
}

/// Lexically drop `.` segments and fold `..` into their parent.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
