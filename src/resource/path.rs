//! Path utilities.

use std::path::{Path, PathBuf};

/// Characters Windows refuses in a file name component.
const WINDOWS_RESERVED: &[char] = &['<', '>', '"', '|', '?', '*'];

/// Check that `name` is syntactically a legal path on this host.
///
/// Rejects empty names and names with an interior NUL. On Windows the
/// reserved characters `<>"|?*` are rejected too.
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.contains('\0') {
        return false;
    }
    !(cfg!(windows) && name.contains(WINDOWS_RESERVED))
}

/// Make `path` absolute against the working directory without touching
/// the file system.
#[inline]
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Canonicalize an existing path (resolves symlinks, `.`, `..`).
///
/// Falls back to the absolute form when canonicalization fails, so a file
/// that was just found never loses its location.
#[inline]
pub fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| absolute(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("main.lp"));
        assert!(is_valid_name("dir/sub/file.txt"));
        assert!(is_valid_name("/abs/path"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("bad\0name"));
    }

    #[test]
    fn test_absolute_relative() {
        let p = absolute(Path::new("some/rel"));
        assert!(p.is_absolute());
        assert!(p.ends_with("some/rel"));
    }

    #[test]
    fn test_canonical_resolves_dots() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("f.txt"), "x").unwrap();

        let dotted = dir.path().join("sub").join("..").join("f.txt");
        let resolved = canonical(&dotted);
        assert_eq!(resolved, dir.path().join("f.txt").canonicalize().unwrap());
    }
}
