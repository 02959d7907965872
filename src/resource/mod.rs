//! File-system resources behind the stream.
//!
//! ```text
//! name ──► is_valid_name ──► SearchPath::find / working dir
//!                                   │
//!                                   ▼
//!                              canonical ──► SourceHandle::open
//!                                                  │
//!                                   OpenedFiles ◄──┘
//! ```

mod access;
mod handle;
mod path;
mod search;

pub use access::OpenedFiles;
pub use handle::{EncodingContext, SourceHandle};
pub use path::{absolute, canonical, is_valid_name};
pub use search::{SearchPath, resolve};
