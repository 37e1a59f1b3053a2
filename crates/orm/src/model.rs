//! Model trait - the typed surface over dynamic records
//!
//! Implementing [`Model`] tells the engine a type's table, primary key
//! column, and relation descriptors. Registration wires the descriptors
//! into a [`RelationRegistry`] so eager loading can resolve relation
//! names at run time.

use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::error::ModelResult;
use crate::relations::metadata::RelationDescriptor;
use crate::relations::registry::RelationRegistry;

/// Trait for types that map to database rows
pub trait Model: Send + Sync + Debug + DeserializeOwned {
    /// Model type name used as the registry key
    fn model_name() -> &'static str;

    /// Table name for this model
    fn table_name() -> &'static str;

    /// Primary key column name
    fn primary_key() -> &'static str {
        "id"
    }

    /// Relations this model declares
    fn relations() -> Vec<RelationDescriptor> {
        Vec::new()
    }
}

/// Register every relation a model declares
pub fn register_model<M: Model>(registry: &RelationRegistry) -> ModelResult<()> {
    for descriptor in M::relations() {
        registry.register(M::model_name(), descriptor)?;
    }
    Ok(())
}
