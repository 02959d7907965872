//! Open file handles and the encoding context they carry.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Opaque encoding/locale token.
///
/// The stream never interprets it: it is copied into every open handle so
/// that consumers reading through a handle can see which encoding the
/// caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodingContext {
    label: String,
}

impl EncodingContext {
    /// Create an encoding context from a label such as `"utf-8"`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The label this context was created with.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for EncodingContext {
    fn default() -> Self {
        Self::new("utf-8")
    }
}

impl fmt::Display for EncodingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// A readable byte stream for one resolved file.
#[derive(Debug)]
pub struct SourceHandle {
    reader: Box<dyn ReadSource>,
    encoding: EncodingContext,
    eof: bool,
}

/// Anything a handle can read from.
///
/// Files are the normal case; tests plug in readers that fail on demand.
pub(crate) trait ReadSource: Read + fmt::Debug {}

impl<T: Read + fmt::Debug> ReadSource for T {}

impl SourceHandle {
    /// Open `path` for reading.
    ///
    /// Directories are refused with `InvalidInput`: they open fine on some
    /// platforms but can never be read.
    pub fn open(path: &Path, encoding: EncodingContext) -> io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        if meta.is_dir() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "is a directory"));
        }
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), encoding))
    }

    pub(crate) fn from_reader(
        reader: impl ReadSource + 'static,
        encoding: EncodingContext,
    ) -> Self {
        Self {
            reader: Box::new(reader),
            encoding,
            eof: false,
        }
    }

    /// Replace the encoding context.
    pub fn imbue(&mut self, encoding: EncodingContext) {
        self.encoding = encoding;
    }

    /// The encoding context this handle carries.
    pub fn encoding(&self) -> &EncodingContext {
        &self.encoding
    }

    /// Check if the handle has reported end-of-file.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Clear the end-of-file flag so the handle is read again.
    pub fn clear(&mut self) {
        self.eof = false;
    }

    /// Read into `buf`, retrying on interruption.
    ///
    /// Returns `Ok(0)` only at end-of-file (for a non-empty `buf`), and
    /// records it.
    pub fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            match self.reader.read(buf) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(0);
                }
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_and_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f.txt");
        fs::write(&path, "hello").unwrap();

        let mut handle = SourceHandle::open(&path, EncodingContext::default()).unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(handle.read_some(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"hello");
        assert!(!handle.is_eof());
        assert_eq!(handle.read_some(&mut buf).unwrap(), 0);
        assert!(handle.is_eof());

        handle.clear();
        assert!(!handle.is_eof());
    }

    #[test]
    fn test_open_directory() {
        let dir = TempDir::new().unwrap();
        assert!(SourceHandle::open(dir.path(), EncodingContext::default()).is_err());
    }

    #[test]
    fn test_open_nonexistent() {
        let path = Path::new("/nonexistent/file.txt");
        assert!(SourceHandle::open(path, EncodingContext::default()).is_err());
    }

    #[test]
    fn test_imbue() {
        let mut handle = SourceHandle::from_reader(io::empty(), EncodingContext::default());
        assert_eq!(handle.encoding().label(), "utf-8");
        handle.imbue(EncodingContext::new("latin-1"));
        assert_eq!(handle.encoding().to_string(), "latin-1");
    }
}
