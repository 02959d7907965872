//! The compound file stream.
//!
//! ```text
//!   insert ──►┌───────────┐
//!             │ include.lp│  ◄── front: reads and putbacks land here
//!             ├───────────┤
//!             │  main.lp  │
//!             ├───────────┤
//!             │  defs.lp  │
//!             └───────────┘◄── append
//! ```
//!
//! Each entry owns its open handle, a pushback stack and a line/column
//! cursor. When the front file runs out it is dropped and reading carries
//! on with the next one inside the same call. Pushed-back bytes keep the
//! position they were read from, looked up in a short history of the last
//! [`HISTORY_LIMIT`] delivered bytes.

mod context;
mod core;
mod location;
mod state;

pub use context::{HISTORY_LIMIT, PUSHBACK_BLOCK};
pub use core::CompoundStream;
pub use location::Location;
pub use state::StreamState;
