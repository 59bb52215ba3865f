//! # gitpatch-yaml
//!
//! Key-path edits on YAML documents.
//!
//! [`set_bytes`] writes a value at a dotted path and [`delete_bytes`] removes
//! one. Both take and return raw bytes so they compose with content
//! transforms that operate on file bodies.

pub mod error;
pub mod patch;
pub mod path;

pub use error::PatchError;
pub use patch::{delete_bytes, set_bytes};
pub use path::KeyPath;
