//! Relation configuration store
//!
//! Declared relation paths are merged into a forest of per-path
//! configurations. The store keeps the forest prefix-closed: declaring
//! `"user.posts.comments"` also creates configs for `"user"` and
//! `"user.posts"`, and each parent records its direct children in
//! `nested`. Repeated declarations merge idempotently; a modifier
//! supplied for an already-configured path replaces the previous one.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use super::path::RelationPath;
use crate::error::PathError;
use crate::query::QueryBuilder;

/// Closure applied to the batch query for one relation before execution
pub type QueryModifier = Arc<dyn Fn(QueryBuilder) -> QueryBuilder + Send + Sync>;

/// Configuration for one node of the declared relation forest
#[derive(Clone)]
pub struct RelationConfig {
    /// Full dotted path of this node
    pub name: String,
    /// Last segments of the direct children declared under this path
    pub nested: BTreeSet<String>,
    /// Optional query refinement for this relation's batch fetch
    pub modifier: Option<QueryModifier>,
}

impl RelationConfig {
    fn new(name: String) -> Self {
        Self {
            name,
            nested: BTreeSet::new(),
            modifier: None,
        }
    }
}

impl fmt::Debug for RelationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationConfig")
            .field("name", &self.name)
            .field("nested", &self.nested)
            .field("modifier", &self.modifier.as_ref().map(|_| "<closure>"))
            .finish()
    }
}

/// Store of declared relation configs for one query-building session
#[derive(Debug, Clone, Default)]
pub struct RelationConfigStore {
    configs: HashMap<String, RelationConfig>,
}

impl RelationConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge-insert a declared path.
    ///
    /// Validates the path first; an invalid path leaves the store
    /// untouched. Every prefix of the path gets a config (synthesized
    /// with empty `nested` and no modifier where absent), each parent's
    /// `nested` gains the child's last segment, and a supplied modifier
    /// lands on the deepest node, replacing any previous one there.
    pub fn upsert(
        &mut self,
        path: &str,
        modifier: Option<QueryModifier>,
    ) -> Result<(), PathError> {
        let parsed = RelationPath::parse(path)?;
        let prefixes = parsed.prefixes();
        let segments = parsed.segments();

        for (index, prefix) in prefixes.iter().enumerate() {
            self.configs
                .entry(prefix.clone())
                .or_insert_with(|| RelationConfig::new(prefix.clone()));

            if index > 0 {
                if let Some(parent_config) = self.configs.get_mut(&prefixes[index - 1]) {
                    parent_config.nested.insert(segments[index].clone());
                }
            }
        }

        if let Some(modifier) = modifier {
            if let Some(config) = self.configs.get_mut(path) {
                config.modifier = Some(modifier);
            }
        }

        Ok(())
    }

    /// Config for an exact path, if declared or synthesized
    pub fn get(&self, path: &str) -> Option<&RelationConfig> {
        self.configs.get(path)
    }

    /// All configs, in no particular order
    pub fn all(&self) -> impl Iterator<Item = &RelationConfig> {
        self.configs.values()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Drop every declared config
    pub fn clear(&mut self) {
        self.configs.clear();
    }
}
