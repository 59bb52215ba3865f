//! Dotted key paths: `spec.template.0.image`.
//!
//! Segments are separated by `.`; `\.` yields a literal dot inside a segment
//! (`annotations.example\.com/owner`). Whether a segment is a mapping key or
//! a sequence index is decided by the node it is applied to.

use crate::error::PatchError;

/// Segment that appends to a sequence when used with `set`.
pub const APPEND: &str = "-1";

/// A parsed key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    pub fn parse(raw: &str) -> Result<Self, PatchError> {
        if raw.is_empty() {
            return Err(PatchError::EmptyPath);
        }
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'.') => {
                    current.push('.');
                    chars.next();
                }
                '.' => segments.push(std::mem::take(&mut current)),
                other => current.push(other),
            }
        }
        segments.push(current);
        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Interpret `segment` as a sequence index.
    pub(crate) fn index(&self, segment: &str) -> Result<usize, PatchError> {
        segment.parse().map_err(|_| PatchError::InvalidIndex {
            path: self.raw.clone(),
            segment: segment.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_dots() {
        let p = KeyPath::parse("a.b.0.c").unwrap();
        assert_eq!(p.segments(), ["a", "b", "0", "c"]);
    }

    #[test]
    fn escaped_dot_stays_in_segment() {
        let p = KeyPath::parse(r"metadata.annotations.example\.com/owner").unwrap();
        assert_eq!(
            p.segments(),
            ["metadata", "annotations", "example.com/owner"]
        );
    }

    #[test]
    fn lone_backslash_is_literal() {
        let p = KeyPath::parse(r"a\b").unwrap();
        assert_eq!(p.segments(), [r"a\b"]);
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(KeyPath::parse(""), Err(PatchError::EmptyPath)));
    }

    #[test]
    fn non_numeric_index_is_rejected() {
        let p = KeyPath::parse("items.first").unwrap();
        assert!(matches!(
            p.index("first"),
            Err(PatchError::InvalidIndex { .. })
        ));
    }
}
