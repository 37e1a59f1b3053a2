//! Relation descriptors - the metadata batch loading consumes
//!
//! A descriptor names the related model, the table it lives in, and the
//! pair of key columns a batch fetch joins on. Which side each column
//! sits on depends on the relation kind.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Cardinality and direction of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Many-to-one: the foreign key lives on the declaring model
    BelongsTo,
    /// One-to-one: the foreign key lives on the related model
    HasOne,
    /// One-to-many: the foreign key lives on the related model
    HasMany,
}

impl RelationKind {
    /// Returns true if this relation resolves to a collection
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany)
    }
}

/// Metadata describing one named relation of a model.
///
/// Key column placement:
/// - `HasOne` / `HasMany`: `foreign_key` is a column on the related
///   table, `reference_key` a column on the parent (defaults to `id`).
/// - `BelongsTo`: `foreign_key` is a column on the parent,
///   `reference_key` a column on the related table (defaults to `id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    pub kind: RelationKind,
    /// Relation name as declared on the model
    pub name: String,
    /// Related model's type name
    pub related_model: String,
    /// Related model's table name
    pub related_table: String,
    pub foreign_key: String,
    pub reference_key: String,
}

impl RelationDescriptor {
    /// Create a one-to-many descriptor
    pub fn has_many(
        name: &str,
        related_model: &str,
        related_table: &str,
        foreign_key: &str,
    ) -> Self {
        Self {
            kind: RelationKind::HasMany,
            name: name.to_string(),
            related_model: related_model.to_string(),
            related_table: related_table.to_string(),
            foreign_key: foreign_key.to_string(),
            reference_key: "id".to_string(),
        }
    }

    /// Create a one-to-one descriptor
    pub fn has_one(
        name: &str,
        related_model: &str,
        related_table: &str,
        foreign_key: &str,
    ) -> Self {
        Self {
            kind: RelationKind::HasOne,
            name: name.to_string(),
            related_model: related_model.to_string(),
            related_table: related_table.to_string(),
            foreign_key: foreign_key.to_string(),
            reference_key: "id".to_string(),
        }
    }

    /// Create a many-to-one descriptor
    pub fn belongs_to(
        name: &str,
        related_model: &str,
        related_table: &str,
        foreign_key: &str,
    ) -> Self {
        Self {
            kind: RelationKind::BelongsTo,
            name: name.to_string(),
            related_model: related_model.to_string(),
            related_table: related_table.to_string(),
            foreign_key: foreign_key.to_string(),
            reference_key: "id".to_string(),
        }
    }

    /// Override the reference key column
    pub fn with_reference_key(mut self, reference_key: &str) -> Self {
        self.reference_key = reference_key.to_string();
        self
    }

    /// Column read from parent records to collect join-key values
    pub fn parent_key_column(&self) -> &str {
        match self.kind {
            RelationKind::BelongsTo => &self.foreign_key,
            RelationKind::HasOne | RelationKind::HasMany => &self.reference_key,
        }
    }

    /// Column the batch query filters on in the related table
    pub fn related_key_column(&self) -> &str {
        match self.kind {
            RelationKind::BelongsTo => &self.reference_key,
            RelationKind::HasOne | RelationKind::HasMany => &self.foreign_key,
        }
    }

    /// Check the descriptor is usable for loading
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.is_empty() {
            return Err(ModelError::Configuration(
                "relation descriptor has an empty name".to_string(),
            ));
        }
        if self.related_model.is_empty() || self.related_table.is_empty() {
            return Err(ModelError::Configuration(format!(
                "relation '{}' is missing its related model or table",
                self.name
            )));
        }
        if self.foreign_key.is_empty() || self.reference_key.is_empty() {
            return Err(ModelError::Configuration(format!(
                "relation '{}' is missing a key column",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_kinds() {
        assert!(RelationKind::HasMany.is_collection());
        assert!(!RelationKind::HasOne.is_collection());
        assert!(!RelationKind::BelongsTo.is_collection());
    }

    #[test]
    fn test_has_many_key_columns() {
        let rel = RelationDescriptor::has_many("posts", "Post", "posts", "user_id");
        assert_eq!(rel.parent_key_column(), "id");
        assert_eq!(rel.related_key_column(), "user_id");
    }

    #[test]
    fn test_belongs_to_key_columns() {
        let rel = RelationDescriptor::belongs_to("user", "User", "users", "user_id");
        assert_eq!(rel.parent_key_column(), "user_id");
        assert_eq!(rel.related_key_column(), "id");
    }

    #[test]
    fn test_reference_key_override() {
        let rel = RelationDescriptor::has_many("posts", "Post", "posts", "author_ref")
            .with_reference_key("ref");
        assert_eq!(rel.parent_key_column(), "ref");
    }

    #[test]
    fn test_validate_rejects_empty_columns() {
        let mut rel = RelationDescriptor::has_one("profile", "Profile", "profiles", "user_id");
        assert!(rel.validate().is_ok());
        rel.foreign_key.clear();
        assert!(rel.validate().is_err());
    }
}
