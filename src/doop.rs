//! Cycle-safe deep cloning of dynamic doclet data.
//!
//! Plugins can hang arbitrary structured data off a doclet, including
//! shared mutable values that may form reference cycles. Cloning for borrow
//! and augmentation resolution walks that graph with a "seen" set keyed by
//! reference identity; a reference already being cloned is replaced with a
//! sentinel string instead of re-traversed, so the clone always terminates.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

/// Sentinel that replaces a circular reference in a clone.
pub const CIRCULAR_REF: &str = "<CircularRef>";

/// A dynamic JSON-like value attached to a doclet by extension code.
///
/// `Shared` is the only variant that can alias; everything else is owned.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<DocValue>),
    Map(BTreeMap<String, DocValue>),
    Shared(Rc<RefCell<DocValue>>),
}

impl DocValue {
    pub fn shared(value: DocValue) -> DocValue {
        DocValue::Shared(Rc::new(RefCell::new(value)))
    }
}

/// Deep-clone a value, replacing circular references with [`CIRCULAR_REF`].
///
/// The result contains no `Shared` variants: shared values are flattened
/// into owned copies, so the clone is independent of the source graph.
pub fn doop(value: &DocValue) -> DocValue {
    let mut seen = HashSet::new();
    clone_value(value, &mut seen)
}

fn clone_value(value: &DocValue, seen: &mut HashSet<*const RefCell<DocValue>>) -> DocValue {
    match value {
        DocValue::Null => DocValue::Null,
        DocValue::Bool(b) => DocValue::Bool(*b),
        DocValue::Number(n) => DocValue::Number(*n),
        DocValue::String(s) => DocValue::String(s.clone()),
        DocValue::List(items) => {
            DocValue::List(items.iter().map(|v| clone_value(v, seen)).collect())
        }
        DocValue::Map(entries) => DocValue::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), clone_value(v, seen)))
                .collect(),
        ),
        DocValue::Shared(rc) => {
            let key = Rc::as_ptr(rc);
            if seen.contains(&key) {
                return DocValue::String(CIRCULAR_REF.to_string());
            }
            seen.insert(key);
            let cloned = clone_value(&rc.borrow(), seen);
            seen.remove(&key);
            cloned
        }
    }
}

// Serialization goes through a flattened copy so that a cyclic graph cannot
// recurse forever inside serde.
impl Serialize for DocValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_flat(&doop(self), serializer)
    }
}

fn serialize_flat<S: Serializer>(value: &DocValue, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        DocValue::Null => serializer.serialize_unit(),
        DocValue::Bool(b) => serializer.serialize_bool(*b),
        DocValue::Number(n) => serializer.serialize_f64(*n),
        DocValue::String(s) => serializer.serialize_str(s),
        DocValue::List(items) => {
            let mut seq = serializer.serialize_seq(Some(items.len()))?;
            for item in items {
                seq.serialize_element(&Flat(item))?;
            }
            seq.end()
        }
        DocValue::Map(entries) => {
            let mut map = serializer.serialize_map(Some(entries.len()))?;
            for (k, v) in entries {
                map.serialize_entry(k, &Flat(v))?;
            }
            map.end()
        }
        // doop() output never contains Shared, but be safe anyway
        DocValue::Shared(_) => serializer.serialize_str(CIRCULAR_REF),
    }
}

struct Flat<'a>(&'a DocValue);

impl Serialize for Flat<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_flat(self.0, serializer)
    }
}

/// Deep-clone an entire extras map.
pub fn doop_map(map: &BTreeMap<String, DocValue>) -> BTreeMap<String, DocValue> {
    map.iter().map(|(k, v)| (k.clone(), doop(v))).collect()
}
