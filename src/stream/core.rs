//! The compound stream device.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::context::{FileContext, History};
use super::location::Location;
use super::state::StreamState;
use crate::error::{PartialOpen, Result, StreamError};
use crate::resource::{EncodingContext, OpenedFiles, SearchPath};

/// Which end of the stack a new file goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Read next, ahead of the current file.
    Front,
    /// Read after everything already on the stack.
    Back,
}

/// Reads a stack of files as one continuous byte stream.
///
/// Files are resolved against an optional [`SearchPath`] (or the working
/// directory), opened eagerly, and read front to back. [`insert`] places a
/// file ahead of the one being read, which is how include-style directives
/// are served; [`append`] queues one behind everything else. Bytes can be
/// pushed back with [`putback`] for lookahead.
///
/// [`insert`]: Self::insert
/// [`append`]: Self::append
/// [`putback`]: Self::putback
///
/// # Example
///
/// ```ignore
/// use compound_source::CompoundStream;
///
/// let mut stream = CompoundStream::open(["one.in", "two.in"])?;
/// let mut buf = [0u8; 3];
/// while let Some(n) = stream.read(&mut buf)? {
///     print!("{}", String::from_utf8_lossy(&buf[..n]));
/// }
/// ```
#[derive(Debug)]
pub struct CompoundStream {
    stack: VecDeque<FileContext>,
    state: StreamState,
    encoding: EncodingContext,
    search_path: Option<SearchPath>,
    opened: OpenedFiles,
    next_id: u64,
    /// Context that delivered the most recent byte.
    ///
    /// Follows the reader into the next file when a read crosses a
    /// boundary, but not when `insert` pushes a new file in front.
    last_read: Option<u64>,
    /// Positions of recently delivered bytes, for putback.
    history: History,
}

impl Default for CompoundStream {
    fn default() -> Self {
        Self::new()
    }
}

impl CompoundStream {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a closed stream with no files.
    pub fn new() -> Self {
        Self {
            stack: VecDeque::new(),
            state: StreamState::Closed,
            encoding: EncodingContext::default(),
            search_path: None,
            opened: OpenedFiles::new(),
            next_id: 0,
            last_read: None,
            history: History::default(),
        }
    }

    /// Create a closed stream that resolves names against `search_path`.
    pub fn with_search_path(search_path: SearchPath) -> Self {
        Self {
            search_path: Some(search_path),
            ..Self::new()
        }
    }

    /// Open every name in `inputs`, relative to the working directory.
    ///
    /// See [`open_with`](Self::open_with) for the failure policy.
    pub fn open<I, S>(inputs: I) -> std::result::Result<Self, PartialOpen>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::open_with(inputs, None, EncodingContext::default())
    }

    /// Open every name in `inputs`, in order, with the given search path and
    /// encoding context.
    ///
    /// Every name is attempted. If any fail, the returned [`PartialOpen`]
    /// lists all of them and still carries the stream, in the `Error`
    /// state, with every file that did open. An empty `inputs` gives a
    /// `Closed` stream.
    pub fn open_with<I, S>(
        inputs: I,
        search_path: Option<SearchPath>,
        encoding: EncodingContext,
    ) -> std::result::Result<Self, PartialOpen>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stream = Self {
            encoding,
            search_path,
            ..Self::new()
        };

        let mut missing = Vec::new();
        for name in inputs {
            let name = name.as_ref();
            if let Err(e) = stream.append(name) {
                missing.extend(e.missing_names().iter().cloned());
            }
        }

        if !missing.is_empty() {
            let opened = stream.stack.len();
            warn!(missing = ?missing, opened, "some inputs could not be opened");
            stream.state = StreamState::Error;
            return Err(PartialOpen::new(StreamError::NotFound { names: missing }, stream));
        }

        Ok(stream)
    }

    // =========================================================================
    // Growing the input
    // =========================================================================

    /// Queue `name` behind every file already on the stack.
    ///
    /// Uses the stream's search path if one is set. Fails with
    /// [`StreamError::NotFound`] without touching the stack.
    pub fn append(&mut self, name: &str) -> Result<()> {
        self.place(name, None, Placement::Back)
    }

    /// Like [`append`](Self::append), resolving against `search_path`.
    pub fn append_in(&mut self, name: &str, search_path: &SearchPath) -> Result<()> {
        self.place(name, Some(search_path), Placement::Back)
    }

    /// Make `name` the very next source of bytes, ahead of the current file.
    ///
    /// Uses the stream's search path if one is set. Fails with
    /// [`StreamError::NotFound`] without touching the stack.
    pub fn insert(&mut self, name: &str) -> Result<()> {
        self.place(name, None, Placement::Front)
    }

    /// Like [`insert`](Self::insert), resolving against `search_path`.
    pub fn insert_in(&mut self, name: &str, search_path: &SearchPath) -> Result<()> {
        self.place(name, Some(search_path), Placement::Front)
    }

    fn place(&mut self, name: &str, search_path: Option<&SearchPath>, at: Placement) -> Result<()> {
        if self.state == StreamState::Error {
            return Err(StreamError::invalid_state(
                "the stream must be reset before adding inputs after an error",
            ));
        }

        let search = search_path.or(self.search_path.as_ref());
        let context = FileContext::open(self.next_id, name, search, &self.encoding)?;
        self.next_id += 1;
        self.opened.record(context.resolved());

        debug!(input = name, placement = ?at, depth = self.stack.len() + 1, "placed input");
        match at {
            Placement::Front => self.stack.push_front(context),
            Placement::Back => self.stack.push_back(context),
        }
        self.state = StreamState::Good;
        Ok(())
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Fill `buf` with up to `buf.len()` bytes.
    ///
    /// Pushed-back bytes come first, then the front file. When a file runs
    /// out the next one continues the same call, so one read may span many
    /// files. Returns `Ok(None)` when the stream is already finished, or
    /// ends before delivering anything.
    ///
    /// A handle failure puts the stream in the `Error` state and the
    /// partial read is discarded.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        match self.state {
            StreamState::Error => {
                return Err(StreamError::invalid_state(
                    "the stream must be reset before reading after an error",
                ));
            }
            StreamState::End | StreamState::Closed => return Ok(None),
            StreamState::Good => {}
        }
        if buf.is_empty() {
            return Ok(Some(0));
        }

        let mut filled = 0;
        while filled < buf.len() && self.state == StreamState::Good {
            let Some(front) = self.stack.front_mut() else {
                self.state = StreamState::Closed;
                break;
            };

            let n = front.take_pushback(&mut buf[filled..], &mut self.history);
            if n > 0 {
                filled += n;
                self.last_read = Some(front.id());
                if filled == buf.len() {
                    break;
                }
            }

            match front.read_handle(&mut buf[filled..], &mut self.history) {
                Ok(0) => {
                    self.next_file();
                }
                Ok(n) => {
                    filled += n;
                    self.last_read = Some(front.id());
                }
                Err(source) => {
                    let path = front.resolved().to_path_buf();
                    warn!(path = %path.display(), error = %source, "read failed");
                    self.state = StreamState::Error;
                    return Err(StreamError::Io { path, source });
                }
            }
        }

        if filled == 0 && self.state.is_finished() {
            return Ok(None);
        }
        Ok(Some(filled))
    }

    /// Read a single byte.
    pub fn get(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        Ok(self.read(&mut byte)?.map(|_| byte[0]))
    }

    /// Look at the next byte without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>> {
        let byte = self.get()?;
        if let Some(b) = byte {
            self.putback(&[b])?;
        }
        Ok(byte)
    }

    /// Drop the exhausted front file. The last file is kept and the
    /// stream moves to `End` instead.
    fn next_file(&mut self) {
        if self.stack.len() > 1 {
            if let Some(done) = self.stack.pop_front() {
                debug!(input = done.name(), "finished input");
                if self.last_read == Some(done.id()) {
                    self.last_read = self.stack.front().map(FileContext::id);
                }
            }
            self.state = StreamState::Good;
        } else {
            debug!("end of stream");
            self.state = StreamState::End;
        }
    }

    // =========================================================================
    // Putback
    // =========================================================================

    /// Push `bytes` back so the next read returns exactly `bytes`.
    ///
    /// The bytes go to the front file. Each one keeps the position it was
    /// read from, even when a spanning read brought it from an earlier
    /// file, so [`current_location`](Self::current_location) stays exact
    /// for the last [`HISTORY_LIMIT`](super::HISTORY_LIMIT) bytes delivered.
    ///
    /// Rejected when the stream is in `Error` or `Closed`, and when a file
    /// was inserted in front of the file the last byte came from: the bytes
    /// belong to that older file and cannot be replayed from the new one.
    pub fn putback(&mut self, bytes: &[u8]) -> Result<()> {
        match self.state {
            StreamState::Error => {
                return Err(StreamError::invalid_state(
                    "the stream must be reset before putting back after an error",
                ));
            }
            StreamState::Closed => {
                return Err(StreamError::invalid_state("cannot put back into a closed stream"));
            }
            StreamState::Good | StreamState::End => {}
        }

        let Some(front) = self.stack.front_mut() else {
            return Err(StreamError::invalid_state("cannot put back into a stream with no files"));
        };
        if let Some(id) = self.last_read
            && id != front.id()
        {
            return Err(StreamError::invalid_state(
                "cannot put back across a file boundary: a file was inserted after the last read",
            ));
        }
        if bytes.is_empty() {
            return Ok(());
        }

        front.putback(bytes, &mut self.history);
        trace!(
            count = bytes.len(),
            buffered = front.pushback().len(),
            capacity = front.pushback().capacity(),
            history = self.history.len(),
            input = front.name(),
            "putback"
        );
        self.state = StreamState::Good;
        Ok(())
    }

    /// Push back a single byte.
    pub fn putback_byte(&mut self, byte: u8) -> Result<()> {
        self.putback(&[byte])
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release every file and move to `Closed`. Safe to call repeatedly.
    pub fn close(&mut self) {
        if !self.stack.is_empty() {
            debug!(depth = self.stack.len(), "closing stream");
        }
        self.stack.clear();
        self.history.clear();
        self.last_read = None;
        self.state = StreamState::Closed;
    }

    /// Clear an `End` or `Error` state.
    ///
    /// With a file still on the stack its handle is cleared and the stream
    /// is `Good` again; with none it becomes `Closed`. `Good` and `Closed`
    /// are left as they are.
    pub fn reset(&mut self) {
        match self.state {
            StreamState::End | StreamState::Error => {
                if let Some(front) = self.stack.front_mut() {
                    front.handle_mut().clear();
                    self.state = StreamState::Good;
                } else {
                    self.state = StreamState::Closed;
                }
                debug!(state = %self.state, "reset");
            }
            StreamState::Good | StreamState::Closed => {}
        }
    }

    /// Set the encoding context for every open file and every future one.
    pub fn imbue(&mut self, encoding: EncodingContext) {
        for context in &mut self.stack {
            context.handle_mut().imbue(encoding.clone());
        }
        self.encoding = encoding;
    }

    /// Replace the default search path used by [`append`](Self::append)
    /// and [`insert`](Self::insert).
    pub fn set_search_path(&mut self, search_path: Option<SearchPath>) {
        self.search_path = search_path;
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// The current state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Check if any file is on the stack.
    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Number of files on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Position of the next byte, or [`Location::empty`] with no files.
    pub fn current_location(&self) -> Location {
        self.stack.front().map(FileContext::location).unwrap_or_default()
    }

    /// Requested name of the front file.
    pub fn filename(&self) -> Option<&str> {
        self.stack.front().map(FileContext::name)
    }

    /// Resolved paths of the files on the stack, front first.
    pub fn pending_files(&self) -> impl Iterator<Item = &Path> {
        self.stack.iter().map(FileContext::resolved)
    }

    /// Every path this stream has opened, in first-open order.
    pub fn opened_files(&self) -> &[PathBuf] {
        self.opened.paths()
    }

    /// Forget the record of opened paths.
    pub fn clear_opened_files(&mut self) {
        self.opened.clear();
    }

    /// The encoding context applied to opened files.
    pub fn encoding(&self) -> &EncodingContext {
        &self.encoding
    }

    /// The default search path, if any.
    pub fn search_path(&self) -> Option<&SearchPath> {
        self.search_path.as_ref()
    }
}

impl io::Read for CompoundStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(CompoundStream::read(self, buf)?.unwrap_or(0))
    }
}
