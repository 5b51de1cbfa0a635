//! Metadata store: JSON sidecar documents on a shared filesystem.
//!
//! - Reads classify failures as `NotFound` or `Corrupted` instead of
//!   collapsing them into one "absent" outcome
//! - Writes go through a temporary sibling file that is renamed into place,
//!   so an interrupted save leaves at most a stray temp file behind
//! - Output is 4-space indented with fields in declaration order

pub mod io;

pub use io::{StoreError, ensure_directory, load, save, to_pretty_json};
