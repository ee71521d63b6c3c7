//! Root confinement for user-supplied paths.
//!
//! Every path that reaches the filesystem goes through [`Sandbox::resolve`]
//! first. Resolution is purely lexical: `.` and `..` are folded without
//! touching the filesystem, so the confinement decision is made before any
//! I/O happens. Symlink targets are checked separately by callers that
//! follow links (see [`Sandbox::contains_canonical`]).

use std::path::{Component, Path, PathBuf};

/// A fixed filesystem root that all relative paths must resolve within.
///
/// The root is canonicalized once at construction and never changes for
/// the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `root`.
    ///
    /// Fails if the directory does not exist or cannot be canonicalized.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        let root = root
            .as_ref()
            .canonicalize()
            .map_err(|_| SandboxError::RootUnavailable(root.as_ref().to_path_buf()))?;
        if !root.is_dir() {
            return Err(SandboxError::RootUnavailable(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a user-supplied relative path against the root.
    ///
    /// Leading separators are stripped, so `/etc/passwd` is treated as
    /// `etc/passwd` under the root. The result either equals the root or is
    /// a strict descendant of it; anything else fails with `OutOfRoot`
    /// before any filesystem call is made.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, SandboxError> {
        let trimmed = relative.trim_start_matches(['/', '\\']);
        let joined = self.root.join(trimmed);
        let normalized = normalize_lexically(&joined);

        if self.contains_canonical(&normalized) {
            Ok(normalized)
        } else {
            Err(SandboxError::OutOfRoot(relative.to_string()))
        }
    }

    /// Whether an absolute, already-normalized path lies within the root.
    ///
    /// The strict-descendant rule compares against `root + separator`, never
    /// the bare root string, so a root of `/home/al` does not accept
    /// `/home/alice`.
    pub fn contains_canonical(&self, absolute: &Path) -> bool {
        if absolute == self.root {
            return true;
        }
        absolute.starts_with(&self.root) && absolute != self.root
    }

    /// The root-relative form of an absolute path, with `/` separators.
    ///
    /// Returns an empty string for the root itself.
    pub fn relative(&self, absolute: &Path) -> String {
        let rel = absolute.strip_prefix(&self.root).unwrap_or(Path::new(""));
        let parts: Vec<_> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(os) => os.to_str(),
                _ => None,
            })
            .collect();
        parts.join("/")
    }
}

/// Fold `.` and `..` components without consulting the filesystem.
///
/// A `..` at the top of the stack pops the previous component; excess `..`
/// components above the filesystem root are dropped, which makes escape
/// attempts resolve to paths the prefix check then rejects or to the
/// filesystem root itself.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("sandbox root is not an accessible directory: {0}")]
    RootUnavailable(PathBuf),
    #[error("path escapes the sandbox root: {0}")]
    OutOfRoot(String),
}
