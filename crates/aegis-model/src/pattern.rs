//! Resource glob patterns
//!
//! Provides [`ResourcePattern`], a shell-style glob over slash-delimited
//! resource paths. `*` matches any sequence of characters including `/`,
//! literal segments match exactly, matching is case-sensitive.

use globset::{Glob, GlobMatcher};
use once_cell::sync::OnceCell;
use std::fmt::{self, Display, Formatter};
use tracing::warn;

/// A glob pattern over resource paths
///
/// The raw pattern string is the identity of the value (equality, hashing,
/// serialization); the compiled matcher is built lazily on first use. A
/// pattern that fails to compile degrades to literal string comparison.
#[derive(Debug, Clone)]
pub struct ResourcePattern {
    raw: String,
    matcher: OnceCell<Option<GlobMatcher>>,
}

impl ResourcePattern {
    /// Create a pattern from its raw glob string
    #[inline]
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            matcher: OnceCell::new(),
        }
    }

    /// The wildcard pattern, matching every resource
    #[inline]
    #[must_use]
    pub fn wildcard() -> Self {
        Self::new("*")
    }

    /// Raw glob string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check whether `resource` is matched by this pattern
    #[must_use]
    pub fn matches(&self, resource: &str) -> bool {
        match self.compiled() {
            Some(matcher) => matcher.is_match(resource),
            None => self.raw == resource,
        }
    }

    fn compiled(&self) -> Option<&GlobMatcher> {
        self.matcher
            .get_or_init(|| match Glob::new(&self.raw) {
                Ok(glob) => Some(glob.compile_matcher()),
                Err(error) => {
                    warn!(pattern = %self.raw, %error, "unparseable glob, using literal comparison");
                    None
                }
            })
            .as_ref()
    }
}

impl PartialEq for ResourcePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ResourcePattern {}

impl std::hash::Hash for ResourcePattern {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Display for ResourcePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<&str> for ResourcePattern {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ResourcePattern {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl serde::Serialize for ResourcePattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> serde::Deserialize<'de> for ResourcePattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_across_separators() {
        let pattern = ResourcePattern::new("project/*");
        assert!(pattern.matches("project/maestro/code/main.py"));
        assert!(pattern.matches("project/x"));
        assert!(!pattern.matches("compliance/report.md"));
    }

    #[test]
    fn wildcard_matches_everything() {
        let pattern = ResourcePattern::wildcard();
        assert!(pattern.matches("anything/at/all"));
        assert!(pattern.matches(""));
    }

    #[test]
    fn literal_segments_match_exactly() {
        let pattern = ResourcePattern::new("audit/log1");
        assert!(pattern.matches("audit/log1"));
        assert!(!pattern.matches("audit/log2"));
        assert!(!pattern.matches("audit/log1/extra"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let pattern = ResourcePattern::new("Project/*");
        assert!(!pattern.matches("project/x"));
        assert!(pattern.matches("Project/x"));
    }

    #[test]
    fn interior_star_matches() {
        let pattern = ResourcePattern::new("project/*/code/*");
        assert!(pattern.matches("project/maestro/code/main.py"));
        assert!(pattern.matches("project/a/b/code/x/y.rs"));
        assert!(!pattern.matches("project/maestro/docs/readme.md"));
    }

    #[test]
    fn unparseable_glob_falls_back_to_literal() {
        let pattern = ResourcePattern::new("project/[unclosed");
        assert!(pattern.matches("project/[unclosed"));
        assert!(!pattern.matches("project/other"));
    }

    #[test]
    fn serde_roundtrip_is_raw_string() {
        let pattern = ResourcePattern::new("project/*/code/*");
        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(json, "\"project/*/code/*\"");
        let back: ResourcePattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pattern);
    }

    #[test]
    fn equality_ignores_compilation_state() {
        let a = ResourcePattern::new("x/*");
        let b = ResourcePattern::new("x/*");
        let _ = a.matches("x/y");
        assert_eq!(a, b);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wildcard_matches_any_resource(resource in "[a-zA-Z0-9._/-]{0,48}") {
                prop_assert!(ResourcePattern::wildcard().matches(&resource));
            }

            #[test]
            fn prefix_glob_matches_everything_underneath(
                tail in "[a-z0-9._-]{1,12}(/[a-z0-9._-]{1,12}){0,3}",
            ) {
                let pattern = ResourcePattern::new("project/*");
                let under = format!("project/{}", tail);
                let outside = format!("other/{}", tail);
                prop_assert!(pattern.matches(&under));
                prop_assert!(!pattern.matches(&outside));
            }
        }
    }
}
