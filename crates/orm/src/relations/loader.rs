//! Batch relation loading
//!
//! One call loads one relation for a whole frontier of parent records
//! with a single batch query, then distributes the fetched rows into
//! each parent's relation cache. Every parent receives an entry, so a
//! loaded relation with no matches is distinguishable from one that
//! was never loaded. To-one results are materialized per parent; two
//! parents matching the same row never share a record instance.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::cache::RelationValue;
use super::config::QueryModifier;
use super::metadata::RelationDescriptor;
use crate::backend::{DatabaseExecutor, Row};
use crate::error::{ModelError, ModelResult};
use crate::query::QueryBuilder;
use crate::record::Record;

/// Canonical grouping token for a join-key value; nulls do not join
fn key_token(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Loads one relation for a set of parent records in a single query
pub struct RelationLoader;

impl RelationLoader {
    /// Fetch and distribute one relation across the given parents.
    ///
    /// Collects the parents' join-key values, issues one
    /// `WHERE key IN (...)` query against the related table (refined by
    /// `modifier` when present), and writes a [`RelationValue`] into
    /// every parent's cache. Parents whose key is null or unmatched get
    /// an empty result without any per-parent query.
    pub async fn load(
        parents: &mut [&mut Record],
        descriptor: &RelationDescriptor,
        modifier: Option<&QueryModifier>,
        executor: &dyn DatabaseExecutor,
    ) -> ModelResult<()> {
        let parent_column = descriptor.parent_key_column();
        let related_column = descriptor.related_key_column();

        // Distinct join-key values in first-seen order.
        let mut seen: Vec<String> = Vec::new();
        let mut key_values: Vec<Value> = Vec::new();
        for parent in parents.iter() {
            if let Some(token) = parent.field(parent_column).and_then(key_token) {
                if !seen.contains(&token) {
                    seen.push(token);
                    key_values.push(
                        parent
                            .field(parent_column)
                            .cloned()
                            .unwrap_or(Value::Null),
                    );
                }
            }
        }

        let rows = if key_values.is_empty() {
            debug!(
                relation = %descriptor.name,
                parents = parents.len(),
                "no join keys, skipping fetch"
            );
            Vec::new()
        } else {
            let mut query = QueryBuilder::new()
                .select("*")
                .from(&descriptor.related_table)
                .where_in(related_column, key_values);
            if let Some(modifier) = modifier {
                query = modifier(query);
            }

            debug!(
                relation = %descriptor.name,
                parents = parents.len(),
                "batch loading relation"
            );
            executor
                .fetch_rows(&query)
                .await
                .map_err(|err| ModelError::Fetch {
                    relation: descriptor.name.clone(),
                    message: err.to_string(),
                })?
        };

        debug!(relation = %descriptor.name, rows = rows.len(), "distributing rows");
        Self::distribute(parents, descriptor, related_column, rows);
        Ok(())
    }

    /// Group fetched rows by join key and assign a fresh result to each
    /// parent, preserving fetch order within each group.
    fn distribute(
        parents: &mut [&mut Record],
        descriptor: &RelationDescriptor,
        related_column: &str,
        rows: Vec<Row>,
    ) {
        let mut grouped: HashMap<String, Vec<Row>> = HashMap::new();
        for row in rows {
            if let Some(token) = row.get(related_column).and_then(key_token) {
                grouped.entry(token).or_default().push(row);
            }
        }

        let parent_column = descriptor.parent_key_column();
        for parent in parents.iter_mut() {
            let token = parent.field(parent_column).and_then(key_token);
            let matches = token.as_deref().and_then(|t| grouped.get(t));

            let value = if descriptor.kind.is_collection() {
                let records = matches
                    .map(|rows| {
                        rows.iter()
                            .map(|row| Record::materialize(&descriptor.related_model, row.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                RelationValue::Many(records)
            } else {
                let record = matches.and_then(|rows| rows.first()).map(|row| {
                    Box::new(Record::materialize(&descriptor.related_model, row.clone()))
                });
                RelationValue::One(record)
            };

            parent.set_relation(&descriptor.name, value);
        }
    }
}
