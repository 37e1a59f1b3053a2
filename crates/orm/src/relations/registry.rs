//! Relation registry - runtime descriptor storage and lookup

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

use super::metadata::RelationDescriptor;
use crate::error::{ModelError, ModelResult};

/// Thread-safe registry mapping model names to their relation descriptors
#[derive(Debug, Clone, Default)]
pub struct RelationRegistry {
    /// Map of model name -> relation name -> descriptor
    relations: Arc<DashMap<String, HashMap<String, RelationDescriptor>>>,
}

impl RelationRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relation descriptor for a model
    pub fn register(&self, model_name: &str, descriptor: RelationDescriptor) -> ModelResult<()> {
        descriptor.validate()?;

        let mut model_relations = self
            .relations
            .entry(model_name.to_string())
            .or_insert_with(HashMap::new);
        model_relations.insert(descriptor.name.clone(), descriptor);

        Ok(())
    }

    /// Look up a descriptor by model and relation name
    pub fn descriptor(&self, model_name: &str, relation: &str) -> Option<RelationDescriptor> {
        self.relations.get(model_name)?.get(relation).cloned()
    }

    /// Look up a descriptor, erroring with the offending names when absent
    pub fn require(&self, model_name: &str, relation: &str) -> ModelResult<RelationDescriptor> {
        self.descriptor(model_name, relation)
            .ok_or_else(|| ModelError::UnknownRelation {
                model: model_name.to_string(),
                relation: relation.to_string(),
            })
    }

    /// Check whether a model declares a relation
    pub fn has_relation(&self, model_name: &str, relation: &str) -> bool {
        self.relations
            .get(model_name)
            .map(|rels| rels.contains_key(relation))
            .unwrap_or(false)
    }

    /// Names of all relations registered for a model
    pub fn relation_names(&self, model_name: &str) -> Vec<String> {
        self.relations
            .get(model_name)
            .map(|rels| rels.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::metadata::RelationKind;

    fn registry_with_user_posts() -> RelationRegistry {
        let registry = RelationRegistry::new();
        registry
            .register(
                "User",
                RelationDescriptor::has_many("posts", "Post", "posts", "user_id"),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = registry_with_user_posts();
        let rel = registry.descriptor("User", "posts").unwrap();
        assert_eq!(rel.kind, RelationKind::HasMany);
        assert_eq!(rel.related_table, "posts");
    }

    #[test]
    fn test_missing_relation_is_none() {
        let registry = registry_with_user_posts();
        assert!(registry.descriptor("User", "comments").is_none());
        assert!(registry.descriptor("Post", "posts").is_none());
    }

    #[test]
    fn test_require_errors_with_names() {
        let registry = registry_with_user_posts();
        let err = registry.require("User", "commments").unwrap_err();
        match err {
            ModelError::UnknownRelation { model, relation } => {
                assert_eq!(model, "User");
                assert_eq!(relation, "commments");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_relation_names() {
        let registry = registry_with_user_posts();
        registry
            .register(
                "User",
                RelationDescriptor::has_one("profile", "Profile", "profiles", "user_id"),
            )
            .unwrap();
        let mut names = registry.relation_names("User");
        names.sort();
        assert_eq!(names, vec!["posts", "profile"]);
    }

    #[test]
    fn test_register_rejects_invalid_descriptor() {
        let registry = RelationRegistry::new();
        let mut rel = RelationDescriptor::has_many("posts", "Post", "posts", "user_id");
        rel.related_table.clear();
        assert!(registry.register("User", rel).is_err());
    }
}
