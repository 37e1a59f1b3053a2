//! Relation path validation and analysis
//!
//! Relation paths are dotted strings like `"user.posts.comments"`. The
//! validator applies its checks in a fixed order so a malformed path
//! always reports the same error, and the analyzer splits a valid path
//! into segments and the chain of prefixes the config store needs.

use crate::error::PathError;

/// Validate a dotted relation path.
///
/// Checks run in order: empty, leading dot, trailing dot, consecutive
/// dots. The first failing check wins, so `"."` and `".."` both report
/// [`PathError::LeadingDot`].
pub fn validate_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if path.starts_with('.') {
        return Err(PathError::LeadingDot(path.to_string()));
    }
    if path.ends_with('.') {
        return Err(PathError::TrailingDot(path.to_string()));
    }
    if path.contains("..") {
        return Err(PathError::ConsecutiveDots(path.to_string()));
    }
    Ok(())
}

/// A validated relation path split into its segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationPath {
    segments: Vec<String>,
}

impl RelationPath {
    /// Parse and validate a dotted path
    pub fn parse(path: &str) -> Result<Self, PathError> {
        validate_path(path)?;
        Ok(Self {
            segments: path.split('.').map(|s| s.to_string()).collect(),
        })
    }

    /// Ordered segments, shallowest first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment of the path
    pub fn leaf(&self) -> &str {
        self.segments
            .last()
            .map(|s| s.as_str())
            .unwrap_or_default()
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// All prefixes from shallowest to deepest, including the full path.
    ///
    /// `"a.b.c"` yields `["a", "a.b", "a.b.c"]`.
    pub fn prefixes(&self) -> Vec<String> {
        let mut prefixes = Vec::with_capacity(self.segments.len());
        let mut current = String::new();
        for segment in &self.segments {
            if !current.is_empty() {
                current.push('.');
            }
            current.push_str(segment);
            prefixes.push(current.clone());
        }
        prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert!(validate_path("posts").is_ok());
        assert!(validate_path("user.posts.comments.author").is_ok());
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(validate_path(""), Err(PathError::Empty));
    }

    #[test]
    fn test_leading_dot() {
        assert_eq!(
            validate_path(".posts"),
            Err(PathError::LeadingDot(".posts".to_string()))
        );
    }

    #[test]
    fn test_trailing_dot() {
        assert_eq!(
            validate_path("posts."),
            Err(PathError::TrailingDot("posts.".to_string()))
        );
    }

    #[test]
    fn test_consecutive_dots() {
        assert_eq!(
            validate_path("user..posts"),
            Err(PathError::ConsecutiveDots("user..posts".to_string()))
        );
    }

    #[test]
    fn test_check_ordering_for_dot_only_paths() {
        // Leading-dot check runs before the consecutive-dots check.
        assert_eq!(
            validate_path("."),
            Err(PathError::LeadingDot(".".to_string()))
        );
        assert_eq!(
            validate_path(".."),
            Err(PathError::LeadingDot("..".to_string()))
        );
    }

    #[test]
    fn test_parse_segments_and_leaf() {
        let path = RelationPath::parse("user.posts.comments").unwrap();
        assert_eq!(path.segments(), &["user", "posts", "comments"]);
        assert_eq!(path.leaf(), "comments");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn test_prefixes_shallowest_first() {
        let path = RelationPath::parse("a.b.c").unwrap();
        assert_eq!(path.prefixes(), vec!["a", "a.b", "a.b.c"]);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(RelationPath::parse("a..b").is_err());
    }
}
