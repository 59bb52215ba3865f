//! Content transforms: old file body in, new file body out.
//!
//! Any `Fn(&[u8]) -> Result<Vec<u8>, TransformError>` is a transform. The
//! structs here cover the common cases.

use serde_yaml::Value;

use crate::error::TransformError;

/// Takes an existing body and returns the updated body.
///
/// For a missing file being created the input is empty.
pub trait ContentUpdater {
    fn update(&self, current: &[u8]) -> Result<Vec<u8>, TransformError>;
}

impl<F> ContentUpdater for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, TransformError>,
{
    fn update(&self, current: &[u8]) -> Result<Vec<u8>, TransformError> {
        self(current)
    }
}

/// Pins the closure signature so `from_fn(|body| ...)` needs no annotations.
pub fn from_fn<F>(f: F) -> F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, TransformError>,
{
    f
}

/// Replaces the whole body, ignoring the current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceContents(Vec<u8>);

impl ReplaceContents {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self(body.into())
    }
}

impl ContentUpdater for ReplaceContents {
    fn update(&self, _current: &[u8]) -> Result<Vec<u8>, TransformError> {
        Ok(self.0.clone())
    }
}

/// Sets a dotted key path in a YAML body.
///
/// `UpdateYaml::new("test.image", "service-a:1.1.0")`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateYaml {
    key: String,
    value: Value,
}

impl UpdateYaml {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl ContentUpdater for UpdateYaml {
    fn update(&self, current: &[u8]) -> Result<Vec<u8>, TransformError> {
        Ok(gitpatch_yaml::set_bytes(current, &self.key, &self.value)?)
    }
}

/// Removes a dotted key path from a YAML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveYamlKey {
    key: String,
}

impl RemoveYamlKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl ContentUpdater for RemoveYamlKey {
    fn update(&self, current: &[u8]) -> Result<Vec<u8>, TransformError> {
        Ok(gitpatch_yaml::delete_bytes(current, &self.key)?)
    }
}
