//! Search-path resolution.

use std::path::{Path, PathBuf};

use super::path::{absolute, canonical, is_valid_name};

/// An ordered list of directories used to resolve relative file names.
///
/// The first directory that contains the name wins. Absolute names ignore
/// the directories (joining an absolute path replaces the base).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Create an empty search path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a search path from directories, keeping their order.
    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a directory at the end.
    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    /// The directories, in lookup order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Check if no directories are configured.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Find the first `dir/name` that exists.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        self.dirs.iter().map(|dir| absolute(&dir.join(name))).find(|p| p.exists())
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for SearchPath {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::from_dirs(iter)
    }
}

/// Resolve `name` to a canonical path.
///
/// With `search_path` the directories are tried in order; without it the
/// name is taken relative to the working directory. Returns `None` if the
/// name is malformed or nothing exists at any candidate location.
pub fn resolve(name: &str, search_path: Option<&SearchPath>) -> Option<PathBuf> {
    if !is_valid_name(name) {
        return None;
    }

    let found = match search_path {
        Some(search) => search.find(name)?,
        None => {
            let path = absolute(Path::new(name));
            if !path.exists() {
                return None;
            }
            path
        }
    };

    Some(canonical(&found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_directory_wins() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        fs::write(first.join("dup.txt"), "1").unwrap();
        fs::write(second.join("dup.txt"), "2").unwrap();

        let search = SearchPath::from_dirs([&first, &second]);
        let resolved = resolve("dup.txt", Some(&search)).unwrap();
        assert_eq!(resolved, first.join("dup.txt").canonicalize().unwrap());

        let search = SearchPath::from_dirs([&second, &first]);
        let resolved = resolve("dup.txt", Some(&search)).unwrap();
        assert_eq!(resolved, second.join("dup.txt").canonicalize().unwrap());
    }

    #[test]
    fn test_skips_directories_without_file() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty");
        let full = dir.path().join("full");
        fs::create_dir(&empty).unwrap();
        fs::create_dir(&full).unwrap();
        fs::write(full.join("only.txt"), "x").unwrap();

        let search: SearchPath = [empty, full.clone()].into_iter().collect();
        assert_eq!(
            resolve("only.txt", Some(&search)).unwrap(),
            full.join("only.txt").canonicalize().unwrap()
        );
    }

    #[test]
    fn test_missing_everywhere() {
        let dir = TempDir::new().unwrap();
        let search = SearchPath::from_dirs([dir.path()]);
        assert!(resolve("nope.txt", Some(&search)).is_none());
    }

    #[test]
    fn test_empty_search_path_finds_nothing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        let name = file.to_str().unwrap();

        assert!(resolve(name, Some(&SearchPath::new())).is_none());
        assert!(resolve(name, None).is_some());
    }

    #[test]
    fn test_absolute_name_ignores_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("abs.txt");
        fs::write(&file, "x").unwrap();

        let search = SearchPath::from_dirs(["/definitely/not/here"]);
        let resolved = resolve(file.to_str().unwrap(), Some(&search)).unwrap();
        assert_eq!(resolved, file.canonicalize().unwrap());
    }

    #[test]
    fn test_invalid_name() {
        assert!(resolve("", None).is_none());
        assert!(resolve("a\0b", None).is_none());
    }
}
