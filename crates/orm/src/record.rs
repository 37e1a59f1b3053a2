//! Record - a materialized row with its own relation cache
//!
//! Records are the dynamic currency of the loading pipeline: a model
//! name, a field map decoded from storage, and an owned cache of loaded
//! relations. Two records materialized from the same row never share
//! cache state.

use serde_json::Value;

use crate::backend::Row;
use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::relations::cache::{RelationCache, RelationValue};
use crate::relations::registry::RelationRegistry;

/// A single materialized row of some model type
#[derive(Debug, Clone)]
pub struct Record {
    model: String,
    fields: Row,
    relations: RelationCache,
}

impl Record {
    /// Build a record from a fetched row; the relation cache starts empty
    pub fn materialize(model: &str, fields: Row) -> Self {
        Self {
            model: model.to_string(),
            fields,
            relations: RelationCache::new(),
        }
    }

    /// Model type name this record belongs to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Raw field map
    pub fn fields(&self) -> &Row {
        &self.fields
    }

    /// One field by column name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Loaded relation result; `None` means the relation was not loaded
    pub fn relation(&self, name: &str) -> Option<&RelationValue> {
        self.relations.get(name)
    }

    /// True when the named relation has been loaded, even to empty
    pub fn is_relation_loaded(&self, name: &str) -> bool {
        self.relations.is_loaded(name)
    }

    /// Store a loaded relation result, replacing any previous one
    pub fn set_relation(&mut self, name: &str, value: RelationValue) {
        self.relations.insert(name, value);
    }

    /// Mutable access to a loaded relation result
    pub fn relation_mut(&mut self, name: &str) -> Option<&mut RelationValue> {
        self.relations.get_mut(name)
    }

    /// Clear one loaded relation, or all of them when `name` is `None`.
    ///
    /// Clearing a relation the record's model does not declare is an
    /// [`ModelError::UnknownRelation`] so typos fail loudly instead of
    /// silently doing nothing.
    pub fn clear_relation_cache(
        &mut self,
        name: Option<&str>,
        registry: &RelationRegistry,
    ) -> ModelResult<()> {
        match name {
            None => {
                self.relations.clear();
                Ok(())
            }
            Some(relation) => {
                if !registry.has_relation(&self.model, relation) {
                    return Err(ModelError::UnknownRelation {
                        model: self.model.clone(),
                        relation: relation.to_string(),
                    });
                }
                self.relations.remove(relation);
                Ok(())
            }
        }
    }

    /// Decode the field map into a typed model value
    pub fn to_model<M: Model>(&self) -> ModelResult<M> {
        let value = Value::Object(self.fields.clone());
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::metadata::RelationDescriptor;
    use serde_json::{json, Map};

    fn user_record() -> Record {
        let mut fields = Map::new();
        fields.insert("id".to_string(), json!(1));
        fields.insert("name".to_string(), json!("ada"));
        Record::materialize("User", fields)
    }

    fn user_registry() -> RelationRegistry {
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
    fn test_materialize_starts_with_empty_cache() {
        let record = user_record();
        assert_eq!(record.model(), "User");
        assert_eq!(record.field("name"), Some(&json!("ada")));
        assert!(!record.is_relation_loaded("posts"));
    }

    #[test]
    fn test_set_and_read_relation() {
        let mut record = user_record();
        record.set_relation("posts", RelationValue::Many(vec![]));
        assert!(record.is_relation_loaded("posts"));
        assert!(matches!(
            record.relation("posts"),
            Some(RelationValue::Many(posts)) if posts.is_empty()
        ));
    }

    #[test]
    fn test_clear_known_relation() {
        let registry = user_registry();
        let mut record = user_record();
        record.set_relation("posts", RelationValue::Many(vec![]));
        record
            .clear_relation_cache(Some("posts"), &registry)
            .unwrap();
        assert!(!record.is_relation_loaded("posts"));
    }

    #[test]
    fn test_clear_unknown_relation_errors() {
        let registry = user_registry();
        let mut record = user_record();
        let err = record
            .clear_relation_cache(Some("psots"), &registry)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownRelation { relation, .. } if relation == "psots"));
    }

    #[test]
    fn test_to_model_decodes_fields() {
        #[derive(Debug, serde::Deserialize)]
        struct User {
            id: i64,
            name: String,
        }
        impl crate::model::Model for User {
            fn model_name() -> &'static str {
                "User"
            }
            fn table_name() -> &'static str {
                "users"
            }
        }

        let user: User = user_record().to_model().unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "ada");
    }

    #[test]
    fn test_clear_all_relations() {
        let registry = user_registry();
        let mut record = user_record();
        record.set_relation("posts", RelationValue::Many(vec![]));
        record.clear_relation_cache(None, &registry).unwrap();
        assert!(!record.is_relation_loaded("posts"));
    }
}
