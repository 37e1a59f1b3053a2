//! Per-record relation cache
//!
//! Each record owns one cache mapping relation names (leaf segments) to
//! loaded results. A missing entry means the relation was never loaded,
//! which is distinct from a loaded-but-empty result.

use std::collections::HashMap;

use crate::record::Record;

/// A loaded relation result
#[derive(Debug, Clone)]
pub enum RelationValue {
    /// To-one result; `None` means no related row matched
    One(Option<Box<Record>>),
    /// To-many result, in fetch order
    Many(Vec<Record>),
}

impl RelationValue {
    /// Mutable references to the records inside this value
    pub fn records_mut(&mut self) -> Vec<&mut Record> {
        match self {
            RelationValue::One(Some(record)) => vec![record.as_mut()],
            RelationValue::One(None) => vec![],
            RelationValue::Many(records) => records.iter_mut().collect(),
        }
    }

    /// Shared references to the records inside this value
    pub fn records(&self) -> Vec<&Record> {
        match self {
            RelationValue::One(Some(record)) => vec![record.as_ref()],
            RelationValue::One(None) => vec![],
            RelationValue::Many(records) => records.iter().collect(),
        }
    }
}

/// Cache of loaded relations owned by a single record
#[derive(Debug, Clone, Default)]
pub struct RelationCache {
    entries: HashMap<String, RelationValue>,
}

impl RelationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a loaded result, replacing any previous one
    pub fn insert(&mut self, relation: &str, value: RelationValue) {
        self.entries.insert(relation.to_string(), value);
    }

    pub fn get(&self, relation: &str) -> Option<&RelationValue> {
        self.entries.get(relation)
    }

    pub fn get_mut(&mut self, relation: &str) -> Option<&mut RelationValue> {
        self.entries.get_mut(relation)
    }

    /// True when the relation has been loaded, even to an empty result
    pub fn is_loaded(&self, relation: &str) -> bool {
        self.entries.contains_key(relation)
    }

    /// Forget one loaded relation; returns true when an entry existed
    pub fn remove(&mut self, relation: &str) -> bool {
        self.entries.remove(relation).is_some()
    }

    /// Forget every loaded relation
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
