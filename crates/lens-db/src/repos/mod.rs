//! Repository modules implementing the history log operations.
//!
//! Each module adds methods to `HistoryDb` via `impl HistoryDb` blocks.

pub mod history;
