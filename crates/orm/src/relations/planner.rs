//! Load order planning
//!
//! A load plan is the declared config forest flattened into a sequence
//! ordered by path depth, shallowest first. Depth order guarantees a
//! parent relation is always loaded before any of its children, so the
//! loader can find each entry's frontier in the caches the previous
//! entries populated. The plan is recomputed from the store on every
//! load and never cached.

use super::config::RelationConfigStore;

/// One relation to load, with its position in the forest
#[derive(Debug, Clone)]
pub struct PlanEntry {
    /// Full dotted path of the relation
    pub path: String,
    /// Path segments, shallowest first
    pub segments: Vec<String>,
}

impl PlanEntry {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            segments: path.split('.').map(|s| s.to_string()).collect(),
        }
    }

    /// Number of segments in the path
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Final segment, the relation name resolved against the frontier
    pub fn leaf(&self) -> &str {
        self.segments
            .last()
            .map(|s| s.as_str())
            .unwrap_or_default()
    }
}

/// Depth-ordered sequence of relations to load
#[derive(Debug, Clone, Default)]
pub struct LoadPlan {
    entries: Vec<PlanEntry>,
}

impl LoadPlan {
    /// Flatten the store into entries sorted ascending by depth.
    ///
    /// Order among entries of equal depth is unspecified; no entry ever
    /// precedes a strict prefix of itself.
    pub fn build(store: &RelationConfigStore) -> Self {
        let mut entries: Vec<PlanEntry> =
            store.all().map(|config| PlanEntry::new(&config.name)).collect();
        entries.sort_by_key(|entry| entry.depth());
        Self { entries }
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_orders_by_depth() {
        let mut store = RelationConfigStore::new();
        store.upsert("user.posts.comments", None).unwrap();
        store.upsert("items", None).unwrap();

        let plan = LoadPlan::build(&store);
        let depths: Vec<usize> = plan.entries().iter().map(|e| e.depth()).collect();
        assert_eq!(depths, vec![1, 1, 2, 3]);
    }

    #[test]
    fn test_prefix_never_follows_its_extension() {
        let mut store = RelationConfigStore::new();
        store.upsert("a.b.c", None).unwrap();
        store.upsert("a.b", None).unwrap();

        let plan = LoadPlan::build(&store);
        let paths: Vec<&str> = plan.entries().iter().map(|e| e.path.as_str()).collect();
        let pos = |p: &str| paths.iter().position(|x| *x == p).unwrap();
        assert!(pos("a") < pos("a.b"));
        assert!(pos("a.b") < pos("a.b.c"));
    }

    #[test]
    fn test_empty_store_gives_empty_plan() {
        let store = RelationConfigStore::new();
        let plan = LoadPlan::build(&store);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_entry_leaf() {
        let mut store = RelationConfigStore::new();
        store.upsert("user.posts", None).unwrap();
        let plan = LoadPlan::build(&store);
        let deepest = plan.entries().last().unwrap();
        assert_eq!(deepest.leaf(), "posts");
        assert_eq!(deepest.segments, vec!["user", "posts"]);
    }
}
