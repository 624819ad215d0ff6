//! Hierarchical task paths.

use std::fmt;

/// Separator used when rendering a path for lookup and display.
pub const PATH_SEPARATOR: char = '/';

/// Ordered list of scope name segments from root to a task.
///
/// Segments are kept separate internally; the joined form is produced only
/// at the lookup and extraction boundary, so segment content never collides
/// with the separator handling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TaskPath {
    segments: Vec<String>,
}

impl TaskPath {
    /// The empty path, parent of all top-level scopes.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-joined path; empty segments are dropped.
    pub fn from_joined(path: &str) -> Self {
        let segments = path
            .split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// New path with `segment` appended.
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The `/`-joined form.
    pub fn joined(&self) -> String {
        self.segments.join(&PATH_SEPARATOR.to_string())
    }
}

impl fmt::Display for TaskPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}
