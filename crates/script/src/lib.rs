//! Chat script loading and iteration.
//!
//! A script is a flat JSON array of strings associated with one account,
//! fetched from a local file or an HTTP endpoint. Loading is total: anything
//! that cannot be read or decoded degrades to an empty script with a logged
//! warning, never an error.

pub mod cursor;
pub mod loader;
pub mod source;

pub use {
    cursor::ScriptCursor,
    loader::{ScriptLoader, ScriptStore},
    source::ScriptSource,
};
