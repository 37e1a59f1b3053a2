//! Relations module - declaration, planning, and batched eager loading

pub mod cache;
pub mod config;
pub mod eager;
pub mod loader;
pub mod metadata;
pub mod path;
pub mod planner;
pub mod registry;

// Re-export main types
pub use cache::{RelationCache, RelationValue};
pub use config::{QueryModifier, RelationConfig, RelationConfigStore};
pub use eager::{EagerLoader, EagerQuery, LoadConfig, WithSpec};
pub use loader::RelationLoader;
pub use metadata::{RelationDescriptor, RelationKind};
pub use path::{validate_path, RelationPath};
pub use planner::{LoadPlan, PlanEntry};
pub use registry::RelationRegistry;
