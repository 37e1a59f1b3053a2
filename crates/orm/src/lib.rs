//! # loam-orm: record mapping with batched eager loading
//!
//! A record-mapping layer whose core is an eager-loading relation
//! resolution engine: declare dotted relation paths on a query
//! (`"user.posts.comments.author"`), optionally refine each relation's
//! fetch with a query modifier, and load whole object graphs with one
//! batch query per relation instead of one query per parent row.
//!
//! ```no_run
//! # use loam_orm::prelude::*;
//! # async fn demo(registry: RelationRegistry, executor: impl DatabaseExecutor) -> ModelResult<()> {
//! let orders = EagerQuery::new(
//!     "Order",
//!     QueryBuilder::new().select("*").from("orders"),
//!     registry,
//! )
//! .with("customer")?
//! .with_modifier("items", |q| q.where_gt("quantity", 1))?
//! .fetch(&executor)
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod model;
pub mod query;
pub mod record;
pub mod relations;

// Re-export core traits and types
pub use backend::{DatabaseExecutor, PostgresExecutor, Row};
pub use error::{ModelError, ModelResult, PathError};
pub use model::{register_model, Model};
pub use query::{OrderDirection, QueryBuilder, QueryOperator, WhereCondition};
pub use record::Record;
pub use relations::{
    validate_path, EagerLoader, EagerQuery, LoadConfig, QueryModifier, RelationCache,
    RelationConfig, RelationConfigStore, RelationDescriptor, RelationKind, RelationPath,
    RelationRegistry, RelationValue, WithSpec,
};

/// Convenience re-exports for downstream crates
pub mod prelude {
    pub use crate::backend::{DatabaseExecutor, Row};
    pub use crate::error::{ModelError, ModelResult, PathError};
    pub use crate::model::{register_model, Model};
    pub use crate::query::QueryBuilder;
    pub use crate::record::Record;
    pub use crate::relations::{
        EagerLoader, EagerQuery, LoadConfig, RelationDescriptor, RelationKind, RelationRegistry,
        RelationValue, WithSpec,
    };
}
