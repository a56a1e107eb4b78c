//! Core of the message logger: safe field lookup over untyped webhook payloads,
//! record extraction with a pluggable coordinate source, and the append-only
//! CSV log those records are written to.
pub mod coordinate;
pub mod error;
pub mod extract;
pub mod path;
pub mod record;
pub mod store;

pub use coordinate::*;
pub use error::*;
pub use extract::*;
pub use path::*;
pub use record::*;
pub use store::*;

/// Returns the semantic version advertised by this crate.
///
/// ```
/// assert_eq!(msglog_core::version(), env!("CARGO_PKG_VERSION"));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
