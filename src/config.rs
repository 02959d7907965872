//! Input configuration.
//!
//! A [`Config`] carries the three things the stream needs from the
//! surrounding tool: the input files, the search path, and the encoding
//! context. Use [`ConfigBuilder`] to assemble one, then
//! [`Config::open_inputs`] to get a stream.

use std::path::PathBuf;

use tracing::debug;

use crate::error::PartialOpen;
use crate::resource::{EncodingContext, SearchPath, resolve};
use crate::stream::CompoundStream;

/// Inputs for a [`CompoundStream`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Input file names, in reading order.
    pub inputs: Vec<String>,
    /// Directories to resolve names against. `None` means the working
    /// directory only.
    pub search_path: Option<SearchPath>,
    /// Encoding context handed to every opened file.
    pub encoding: EncodingContext,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Add `name` to the inputs if it resolves right now.
    ///
    /// Returns `true` if the name was added.
    pub fn add_input(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if resolve(&name, self.search_path.as_ref()).is_none() {
            debug!(input = %name, "input does not resolve, not added");
            return false;
        }
        self.inputs.push(name);
        true
    }

    /// Open every configured input as one stream.
    ///
    /// Fails the same way as [`CompoundStream::open_with`]: every input is
    /// attempted and the error carries the partially opened stream.
    pub fn open_inputs(&self) -> Result<CompoundStream, PartialOpen> {
        CompoundStream::open_with(&self.inputs, self.search_path.clone(), self.encoding.clone())
    }
}

/// Configuration builder for fluent API.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    inputs: Vec<String>,
    search_path: Option<SearchPath>,
    encoding: Option<EncodingContext>,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one input file.
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    /// Add several input files, keeping their order.
    pub fn inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add a directory to the end of the search path.
    pub fn search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_path.get_or_insert_with(SearchPath::new).push(dir);
        self
    }

    /// Replace the search path.
    pub fn search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = Some(search_path);
        self
    }

    /// Set the encoding context.
    ///
    /// Default: `utf-8`
    pub fn encoding(mut self, encoding: EncodingContext) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        Config {
            inputs: self.inputs,
            search_path: self.search_path,
            encoding: self.encoding.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StreamState;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.inputs.is_empty());
        assert!(config.search_path.is_none());
        assert_eq!(config.encoding.label(), "utf-8");
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .input("a.lp")
            .inputs(["b.lp", "c.lp"])
            .search_dir("/usr/share/lp")
            .search_dir("lib")
            .encoding(EncodingContext::new("latin-1"))
            .build();

        assert_eq!(config.inputs, ["a.lp", "b.lp", "c.lp"]);
        let search = config.search_path.unwrap();
        assert_eq!(search.dirs(), [PathBuf::from("/usr/share/lp"), PathBuf::from("lib")]);
        assert_eq!(config.encoding.label(), "latin-1");
    }

    #[test]
    fn test_add_input_checks_resolution() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("here.lp"), "x").unwrap();

        let mut config = Config::builder().search_dir(dir.path()).build();
        assert!(config.add_input("here.lp"));
        assert!(!config.add_input("missing.lp"));
        assert_eq!(config.inputs, ["here.lp"]);
    }

    #[test]
    fn test_open_inputs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.in"), "AB").unwrap();
        fs::write(dir.path().join("two.in"), "CD").unwrap();

        let config = Config::builder()
            .inputs(["one.in", "two.in"])
            .search_dir(dir.path())
            .encoding(EncodingContext::new("ascii"))
            .build();

        let mut stream = config.open_inputs().unwrap();
        assert_eq!(stream.encoding().label(), "ascii");
        assert_eq!(stream.state(), StreamState::Good);

        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).unwrap(), Some(4));
        assert_eq!(&buf, b"ABCD");
    }

    #[test]
    fn test_open_inputs_reports_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let config = Config::builder()
            .inputs(["a.txt", "missing1", "missing2"])
            .search_dir(dir.path())
            .build();

        let err = config.open_inputs().unwrap_err();
        assert_eq!(err.missing_names(), ["missing1", "missing2"]);
        assert_eq!(err.stream().depth(), 1);
        assert_eq!(err.stream().state(), StreamState::Error);
    }
}
