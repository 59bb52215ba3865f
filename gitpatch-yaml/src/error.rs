//! Error types for gitpatch-yaml.

use thiserror::Error;

/// All errors that can arise while patching a YAML body.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The input body is not valid YAML.
    #[error("failed to parse YAML: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// The new value, or the patched document, could not be serialized.
    #[error("failed to serialize YAML: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("key path is empty")]
    EmptyPath,

    /// A path segment addressing a sequence is not a valid index.
    #[error("invalid sequence index '{segment}' in path '{path}'")]
    InvalidIndex { path: String, segment: String },

    /// A sequence index points past the end (appending at `len` is allowed).
    #[error("index {index} out of range for sequence of length {len} in path '{path}'")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}
