//! Record of the files a stream has opened.
//!
//! A translator that includes files mid-stream needs the full list of its
//! inputs for dependency output; the stream records every resolved path
//! here as it opens it.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

/// Ordered, de-duplicated set of opened paths.
#[derive(Debug, Clone, Default)]
pub struct OpenedFiles {
    order: Vec<PathBuf>,
    seen: FxHashSet<PathBuf>,
}

impl OpenedFiles {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an opened path. Returns `false` if it was already recorded.
    pub fn record(&mut self, path: &Path) -> bool {
        if self.seen.contains(path) {
            return false;
        }
        self.seen.insert(path.to_path_buf());
        self.order.push(path.to_path_buf());
        true
    }

    /// All recorded paths in first-open order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.order
    }

    /// Check if `path` was recorded.
    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    /// Forget every recorded path.
    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_dedups_and_keeps_order() {
        let mut opened = OpenedFiles::new();
        assert!(opened.record(Path::new("/b")));
        assert!(opened.record(Path::new("/a")));
        assert!(!opened.record(Path::new("/b")));

        assert_eq!(opened.paths(), [PathBuf::from("/b"), PathBuf::from("/a")]);
        assert!(opened.contains(Path::new("/a")));

        opened.clear();
        assert!(opened.paths().is_empty());
        assert!(!opened.contains(Path::new("/a")));
    }
}
