//! Per-file reading context: handle, pushback stack and cursor.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::location::Location;
use crate::error::{Result, StreamError};
use crate::resource::{EncodingContext, SearchPath, SourceHandle, resolve};

/// Pushback capacity grows in whole blocks of this many bytes.
pub const PUSHBACK_BLOCK: usize = 1024;

/// Number of delivered byte positions the stream remembers for putback.
///
/// Bytes pushed back beyond this depth are placed at the position of the
/// next byte instead of the one they were read from.
pub const HISTORY_LIMIT: usize = 4096;

// =============================================================================
// Marks
// =============================================================================

/// The file a byte came from.
#[derive(Debug)]
pub(crate) struct Origin {
    name: String,
    resolved: PathBuf,
}

/// Where one delivered byte was read from.
#[derive(Debug, Clone)]
pub(crate) struct Mark {
    origin: Arc<Origin>,
    line: usize,
    column: usize,
    offset: usize,
}

impl Mark {
    pub(crate) fn location(&self) -> Location {
        Location {
            name: self.origin.name.clone(),
            resolved: self.origin.resolved.clone(),
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }
}

/// Positions of the most recently delivered bytes, oldest first.
///
/// Shared by every file on the stack so a putback after a read that
/// crossed a file boundary still knows which file each byte came from.
#[derive(Debug, Default)]
pub(crate) struct History {
    marks: VecDeque<Mark>,
}

impl History {
    pub(crate) fn record(&mut self, mark: Mark) {
        if self.marks.len() == HISTORY_LIMIT {
            self.marks.pop_front();
        }
        self.marks.push_back(mark);
    }

    pub(crate) fn take_last(&mut self) -> Option<Mark> {
        self.marks.pop_back()
    }

    pub(crate) fn len(&self) -> usize {
        self.marks.len()
    }

    pub(crate) fn clear(&mut self) {
        self.marks.clear();
    }
}

// =============================================================================
// Pushback
// =============================================================================

/// Bytes pushed back into a file, stored top-of-stack last, each with the
/// position it was read from.
///
/// The storage never shrinks: a lexer that keeps putting back and
/// re-reading a few bytes would otherwise reallocate on every cycle.
#[derive(Debug, Default)]
pub(crate) struct Pushback {
    bytes: Vec<u8>,
    marks: Vec<Mark>,
}

impl Pushback {
    /// Make room for `additional` more bytes, in whole blocks.
    pub(crate) fn reserve(&mut self, additional: usize) {
        let needed = self.bytes.len() + additional;
        if needed > self.bytes.capacity() {
            let target = needed.div_ceil(PUSHBACK_BLOCK) * PUSHBACK_BLOCK;
            self.bytes.reserve_exact(target - self.bytes.len());
            self.marks.reserve_exact(target - self.marks.len());
        }
    }

    /// Push one byte on top of the stack.
    pub(crate) fn push(&mut self, byte: u8, mark: Mark) {
        self.bytes.push(byte);
        self.marks.push(mark);
    }

    /// Move up to `out.len()` bytes off the stack, handing their positions
    /// back to `history`. Returns the count.
    pub(crate) fn pop_into(&mut self, out: &mut [u8], history: &mut History) -> usize {
        let n = out.len().min(self.bytes.len());
        for slot in &mut out[..n] {
            if let (Some(byte), Some(mark)) = (self.bytes.pop(), self.marks.pop()) {
                *slot = byte;
                history.record(mark);
            }
        }
        n
    }

    /// Position of the byte on top of the stack.
    pub(crate) fn top(&self) -> Option<&Mark> {
        self.marks.last()
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.bytes.capacity()
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Position of the next byte the handle will deliver.
#[derive(Debug, Clone)]
pub(crate) struct Cursor {
    line: usize,
    column: usize,
    offset: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl Cursor {
    pub(crate) fn step(&mut self, byte: u8) {
        self.offset += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    pub(crate) fn advance(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.step(b);
        }
    }

    pub(crate) fn mark(&self, origin: &Arc<Origin>) -> Mark {
        Mark {
            origin: Arc::clone(origin),
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }
}

// =============================================================================
// FileContext
// =============================================================================

/// One open file on the stream's stack.
///
/// Dropping the context closes its handle and frees its pushback storage.
#[derive(Debug)]
pub(crate) struct FileContext {
    id: u64,
    origin: Arc<Origin>,
    handle: SourceHandle,
    pushback: Pushback,
    cursor: Cursor,
}

impl FileContext {
    /// Resolve `name` and open it.
    ///
    /// Every failure, including a file that exists but cannot be opened,
    /// is reported as not-found for `name`.
    pub(crate) fn open(
        id: u64,
        name: &str,
        search_path: Option<&SearchPath>,
        encoding: &EncodingContext,
    ) -> Result<Self> {
        let Some(resolved) = resolve(name, search_path) else {
            debug!(input = name, "could not resolve input");
            return Err(StreamError::not_found(name));
        };

        let handle = SourceHandle::open(&resolved, encoding.clone()).map_err(|e| {
            debug!(input = name, path = %resolved.display(), error = %e, "could not open input");
            StreamError::not_found(name)
        })?;

        debug!(input = name, path = %resolved.display(), "opened input");
        Ok(Self::from_parts(id, name, resolved, handle))
    }

    pub(crate) fn from_parts(id: u64, name: &str, resolved: PathBuf, handle: SourceHandle) -> Self {
        Self {
            id,
            origin: Arc::new(Origin {
                name: name.to_owned(),
                resolved,
            }),
            handle,
            pushback: Pushback::default(),
            cursor: Cursor::default(),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.origin.name
    }

    pub(crate) fn resolved(&self) -> &Path {
        &self.origin.resolved
    }

    pub(crate) fn handle_mut(&mut self) -> &mut SourceHandle {
        &mut self.handle
    }

    pub(crate) fn pushback(&self) -> &Pushback {
        &self.pushback
    }

    /// Deliver pushed-back bytes into `out`, most recent first.
    pub(crate) fn take_pushback(&mut self, out: &mut [u8], history: &mut History) -> usize {
        self.pushback.pop_into(out, history)
    }

    /// Read from the live handle. `Ok(0)` means end-of-file.
    ///
    /// Only the last [`HISTORY_LIMIT`] bytes of the chunk are recorded.
    pub(crate) fn read_handle(
        &mut self,
        out: &mut [u8],
        history: &mut History,
    ) -> io::Result<usize> {
        let n = self.handle.read_some(out)?;
        let unrecorded = n.saturating_sub(HISTORY_LIMIT);
        self.cursor.advance(&out[..unrecorded]);
        for &b in &out[unrecorded..n] {
            history.record(self.cursor.mark(&self.origin));
            self.cursor.step(b);
        }
        Ok(n)
    }

    /// Push `bytes` back so they are read again in order.
    ///
    /// Each byte takes its position from the end of `history`; bytes that
    /// were never delivered (or fell out of the history) take the position
    /// of the next byte.
    pub(crate) fn putback(&mut self, bytes: &[u8], history: &mut History) {
        self.pushback.reserve(bytes.len());
        for &b in bytes.iter().rev() {
            let mark = history.take_last().unwrap_or_else(|| self.next_mark());
            self.pushback.push(b, mark);
        }
    }

    /// Position of the next byte this context will deliver.
    fn next_mark(&self) -> Mark {
        match self.pushback.top() {
            Some(mark) => mark.clone(),
            None => self.cursor.mark(&self.origin),
        }
    }

    pub(crate) fn location(&self) -> Location {
        self.next_mark().location()
    }
}
