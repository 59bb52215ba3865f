//! Set and delete values in a YAML body addressed by a [`KeyPath`].
//!
//! Both operations parse the whole body, edit the value tree and serialize it
//! again, so comments and custom formatting in the input are not preserved.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::PatchError;
use crate::path::{KeyPath, APPEND};

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Update the key at `path` in the YAML `body` to `value`.
///
/// Missing intermediate mappings are created. A scalar sitting where a
/// container is needed is replaced.
///
/// ```
/// let out = gitpatch_yaml::set_bytes(b"test:\n  image: old\n", "test.image", "new").unwrap();
/// assert_eq!(out, b"test:\n  image: new\n");
/// ```
pub fn set_bytes<T>(body: &[u8], path: &str, value: &T) -> Result<Vec<u8>, PatchError>
where
    T: Serialize + ?Sized,
{
    let path = KeyPath::parse(path)?;
    let value = serde_yaml::to_value(value).map_err(PatchError::Serialize)?;
    let mut doc = parse(body)?;
    set_value(&mut doc, &path, path.segments(), value)?;
    render(&doc)
}

/// Remove the key at `path` from the YAML `body`.
///
/// Removing a key that does not exist leaves the document unchanged. A `-1`
/// sequence segment removes the last element.
pub fn delete_bytes(body: &[u8], path: &str) -> Result<Vec<u8>, PatchError> {
    let path = KeyPath::parse(path)?;
    let mut doc = parse(body)?;
    delete_value(&mut doc, path.segments());
    render(&doc)
}

// ---------------------------------------------------------------------------
// Document I/O
// ---------------------------------------------------------------------------

fn parse(body: &[u8]) -> Result<Value, PatchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_yaml::from_slice(body).map_err(PatchError::Parse)
}

fn render(doc: &Value) -> Result<Vec<u8>, PatchError> {
    serde_yaml::to_string(doc)
        .map(String::into_bytes)
        .map_err(PatchError::Serialize)
}

// ---------------------------------------------------------------------------
// Tree edits
// ---------------------------------------------------------------------------

fn set_value(
    node: &mut Value,
    path: &KeyPath,
    segments: &[String],
    value: Value,
) -> Result<(), PatchError> {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return Ok(());
    };

    match node {
        Value::Tagged(tagged) => set_value(&mut tagged.value, path, segments, value),
        Value::Mapping(map) => {
            let key = existing_key(map, head).unwrap_or_else(|| Value::String(head.clone()));
            let child = map.entry(key).or_insert(Value::Null);
            set_value(child, path, rest, value)
        }
        Value::Sequence(seq) => {
            let len = seq.len();
            let index = if head == APPEND { len } else { path.index(head)? };
            if index > len {
                return Err(PatchError::IndexOutOfRange {
                    path: path.as_str().to_owned(),
                    index,
                    len,
                });
            }
            if index == len {
                seq.push(Value::Null);
            }
            set_value(&mut seq[index], path, rest, value)
        }
        other => {
            *other = if head == APPEND {
                Value::Sequence(Vec::new())
            } else {
                Value::Mapping(Mapping::new())
            };
            set_value(other, path, segments, value)
        }
    }
}

fn delete_value(node: &mut Value, segments: &[String]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    match node {
        Value::Tagged(tagged) => delete_value(&mut tagged.value, segments),
        Value::Mapping(map) => {
            let Some(key) = existing_key(map, head) else {
                return;
            };
            if rest.is_empty() {
                map.shift_remove(&key);
            } else if let Some(child) = map.get_mut(&key) {
                delete_value(child, rest);
            }
        }
        Value::Sequence(seq) => {
            // `-1` addresses the last element.
            let index = if head == APPEND {
                seq.len().checked_sub(1)
            } else {
                head.parse::<usize>().ok()
            };
            let Some(index) = index.filter(|&i| i < seq.len()) else {
                return;
            };
            if rest.is_empty() {
                seq.remove(index);
            } else {
                delete_value(&mut seq[index], rest);
            }
        }
        _ => {}
    }
}

/// Find the key in `map` a path segment refers to. Non-string scalar keys
/// (`1: a`, `true: b`) match their textual form.
fn existing_key(map: &Mapping, segment: &str) -> Option<Value> {
    map.keys()
        .find(|key| match key {
            Value::String(s) => s == segment,
            Value::Number(n) => n.to_string() == segment,
            Value::Bool(b) => b.to_string() == segment,
            _ => false,
        })
        .cloned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
