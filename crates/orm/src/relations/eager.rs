//! Eager loading declaration and orchestration
//!
//! [`EagerLoader`] is the entry point: declare dotted relation paths
//! with `with`/`with_modifier`, then call `load` with the root records.
//! The loader plans depth order, walks already-loaded caches to find
//! each relation's frontier, and drives one batch fetch per relation.
//! [`EagerQuery`] bundles a base query with a loader for the common
//! fetch-then-load flow.

use std::sync::Arc;
use tracing::debug;

use super::config::{QueryModifier, RelationConfigStore};
use super::path::RelationPath;
use super::planner::LoadPlan;
use super::registry::RelationRegistry;
use crate::backend::DatabaseExecutor;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::query::QueryBuilder;
use crate::record::Record;
use crate::relations::loader::RelationLoader;

/// Tunables for eager loading
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Deepest relation path `load` will accept; deeper paths error
    /// instead of being silently truncated
    pub max_depth: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self { max_depth: 10 }
    }
}

/// One item of a batched `with_all` declaration
pub enum WithSpec {
    /// Bare relation path
    Path(String),
    /// Relation path with a query modifier
    Modified(String, QueryModifier),
}

impl WithSpec {
    fn path(&self) -> &str {
        match self {
            WithSpec::Path(path) => path,
            WithSpec::Modified(path, _) => path,
        }
    }
}

impl From<&str> for WithSpec {
    fn from(path: &str) -> Self {
        WithSpec::Path(path.to_string())
    }
}

impl From<String> for WithSpec {
    fn from(path: String) -> Self {
        WithSpec::Path(path)
    }
}

impl<F> From<(&str, F)> for WithSpec
where
    F: Fn(QueryBuilder) -> QueryBuilder + Send + Sync + 'static,
{
    fn from((path, modifier): (&str, F)) -> Self {
        WithSpec::Modified(path.to_string(), Arc::new(modifier))
    }
}

/// Declares relation paths and orchestrates their loading
#[derive(Debug, Clone)]
pub struct EagerLoader {
    store: RelationConfigStore,
    registry: RelationRegistry,
    config: LoadConfig,
}

impl EagerLoader {
    pub fn new(registry: RelationRegistry) -> Self {
        Self {
            store: RelationConfigStore::new(),
            registry,
            config: LoadConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LoadConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare a relation path to eager-load
    pub fn with(mut self, path: &str) -> ModelResult<Self> {
        self.store.upsert(path, None)?;
        Ok(self)
    }

    /// Declare a relation path with a query modifier for its batch fetch
    pub fn with_modifier<F>(mut self, path: &str, modifier: F) -> ModelResult<Self>
    where
        F: Fn(QueryBuilder) -> QueryBuilder + Send + Sync + 'static,
    {
        self.store.upsert(path, Some(Arc::new(modifier)))?;
        Ok(self)
    }

    /// Declare a batch of paths atomically.
    ///
    /// Every path is validated before any is recorded, so one invalid
    /// item rejects the whole batch and leaves prior declarations
    /// unchanged.
    pub fn with_all<I, S>(mut self, specs: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<WithSpec>,
    {
        let specs: Vec<WithSpec> = specs.into_iter().map(Into::into).collect();
        for spec in &specs {
            RelationPath::parse(spec.path())?;
        }
        for spec in specs {
            match spec {
                WithSpec::Path(path) => self.store.upsert(&path, None)?,
                WithSpec::Modified(path, modifier) => self.store.upsert(&path, Some(modifier))?,
            }
        }
        Ok(self)
    }

    /// Declared configs, including synthesized ancestors
    pub fn declarations(&self) -> &RelationConfigStore {
        &self.store
    }

    /// Drop every declaration, keeping registry and config
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Load every declared relation into the root records.
    ///
    /// Relations load in depth order so each entry's frontier sits in
    /// caches the previous entries populated. An entry whose frontier
    /// is empty is skipped without touching storage. A failed fetch
    /// aborts the remaining entries; results already written at
    /// shallower depths stay in place.
    pub async fn load(
        &self,
        roots: &mut [Record],
        executor: &dyn DatabaseExecutor,
    ) -> ModelResult<()> {
        if roots.is_empty() {
            return Ok(());
        }

        let plan = LoadPlan::build(&self.store);
        for entry in plan.entries() {
            if entry.depth() > self.config.max_depth {
                return Err(ModelError::Configuration(format!(
                    "relation path '{}' exceeds maximum depth {}",
                    entry.path, self.config.max_depth
                )));
            }

            let parent_segments = &entry.segments[..entry.depth() - 1];
            let mut frontier = frontier_at(roots, parent_segments);
            if frontier.is_empty() {
                debug!(path = %entry.path, "empty frontier, skipping");
                continue;
            }

            let model = frontier[0].model().to_string();
            let descriptor = self.registry.require(&model, entry.leaf())?;

            if !executor.supports_batch_keys() {
                return Err(ModelError::Configuration(format!(
                    "executor cannot batch-load relation '{}'",
                    entry.path
                )));
            }

            let modifier = self
                .store
                .get(&entry.path)
                .and_then(|config| config.modifier.clone());
            RelationLoader::load(&mut frontier, &descriptor, modifier.as_ref(), executor).await?;
        }

        Ok(())
    }
}

/// Collect the records sitting at the end of a chain of loaded
/// relations, starting from the roots
fn frontier_at<'a>(roots: &'a mut [Record], segments: &[String]) -> Vec<&'a mut Record> {
    let mut current: Vec<&mut Record> = roots.iter_mut().collect();
    for segment in segments {
        let mut next = Vec::new();
        for record in current {
            if let Some(value) = record.relation_mut(segment) {
                next.extend(value.records_mut());
            }
        }
        current = next;
    }
    current
}

/// A base query paired with an eager loader
#[derive(Debug, Clone)]
pub struct EagerQuery {
    model: String,
    query: QueryBuilder,
    loader: EagerLoader,
}

impl EagerQuery {
    /// Query an explicit table for a named model type
    pub fn new(model: &str, query: QueryBuilder, registry: RelationRegistry) -> Self {
        Self {
            model: model.to_string(),
            query,
            loader: EagerLoader::new(registry),
        }
    }

    /// Query a model type's own table
    pub fn for_model<M: Model>(registry: RelationRegistry) -> Self {
        Self::new(
            M::model_name(),
            QueryBuilder::new().select("*").from(M::table_name()),
            registry,
        )
    }

    /// Refine the base query
    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        self.query = f(self.query);
        self
    }

    /// Declare a relation path to eager-load
    pub fn with(mut self, path: &str) -> ModelResult<Self> {
        self.loader = self.loader.with(path)?;
        Ok(self)
    }

    /// Declare a relation path with a query modifier
    pub fn with_modifier<F>(mut self, path: &str, modifier: F) -> ModelResult<Self>
    where
        F: Fn(QueryBuilder) -> QueryBuilder + Send + Sync + 'static,
    {
        self.loader = self.loader.with_modifier(path, modifier)?;
        Ok(self)
    }

    /// Declare a batch of paths atomically
    pub fn with_all<I, S>(mut self, specs: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<WithSpec>,
    {
        self.loader = self.loader.with_all(specs)?;
        Ok(self)
    }

    /// Run the base query, materialize the roots, and load every
    /// declared relation
    pub async fn fetch(&self, executor: &dyn DatabaseExecutor) -> ModelResult<Vec<Record>> {
        let rows = executor.fetch_rows(&self.query).await?;
        let mut records: Vec<Record> = rows
            .into_iter()
            .map(|row| Record::materialize(&self.model, row))
            .collect();
        self.loader.load(&mut records, executor).await?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathError;

    #[test]
    fn test_with_rejects_invalid_path() {
        let loader = EagerLoader::new(RelationRegistry::new());
        let err = loader.with("user..posts").unwrap_err();
        assert!(matches!(
            err,
            ModelError::Path(PathError::ConsecutiveDots(_))
        ));
    }

    #[test]
    fn test_with_accumulates_across_calls() {
        let loader = EagerLoader::new(RelationRegistry::new())
            .with("user.posts")
            .unwrap()
            .with("items")
            .unwrap();
        let store = loader.declarations();
        assert!(store.get("user").is_some());
        assert!(store.get("user.posts").is_some());
        assert!(store.get("items").is_some());
    }

    #[test]
    fn test_with_all_is_atomic() {
        let loader = EagerLoader::new(RelationRegistry::new())
            .with("items")
            .unwrap();
        let err = loader
            .clone()
            .with_all(["user.posts", ".broken"])
            .unwrap_err();
        assert!(matches!(err, ModelError::Path(PathError::LeadingDot(_))));

        // Nothing from the failed batch landed; prior declarations stay.
        let store = loader.declarations();
        assert_eq!(store.len(), 1);
        assert!(store.get("user.posts").is_none());
    }

    #[test]
    fn test_with_all_accepts_modifiers() {
        let loader = EagerLoader::new(RelationRegistry::new())
            .with_all([WithSpec::from(("items", |q: QueryBuilder| q.limit(3)))])
            .unwrap();
        assert!(loader.declarations().get("items").unwrap().modifier.is_some());
    }

    #[test]
    fn test_clear_declarations() {
        let mut loader = EagerLoader::new(RelationRegistry::new())
            .with("a.b")
            .unwrap();
        loader.clear();
        assert!(loader.declarations().is_empty());
    }
}
