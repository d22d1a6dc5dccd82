//! Route pattern parsing.
//!
//! # Responsibilities
//! - Split patterns and concrete paths into non-empty segments
//! - Classify pattern segments (literal, `:param`, `*wildcard`)
//! - Reject malformed patterns at registration time
//!
//! # Design Decisions
//! - Empty segments are discarded, so `/a//b/` and `/a/b` are the same route
//! - A wildcard must be the final segment; anything else is a configuration error
//! - Capture names are unique within a pattern

use std::collections::HashSet;
use std::fmt;

use crate::routing::RouteError;

/// One segment of a registered route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// `:name`, matches any single segment.
    Param(String),
    /// `*name`, matches the rest of the path.
    Wildcard(String),
}

impl Segment {
    fn parse(raw: &str, pattern: &str) -> Result<Self, RouteError> {
        let named = |name: &str| {
            if name.is_empty() {
                Err(RouteError::EmptyName {
                    pattern: pattern.to_string(),
                })
            } else {
                Ok(name.to_string())
            }
        };

        if let Some(name) = raw.strip_prefix(':') {
            named(name).map(Segment::Param)
        } else if let Some(name) = raw.strip_prefix('*') {
            named(name).map(Segment::Wildcard)
        } else {
            Ok(Segment::Literal(raw.to_string()))
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Param(name) => write!(f, ":{}", name),
            Segment::Wildcard(name) => write!(f, "*{}", name),
        }
    }
}

/// Split a path into its non-empty `/`-separated segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Parse a route pattern such as `/assets/:kind/*filepath`.
pub fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, RouteError> {
    let raw = split_path(pattern);
    let mut segments = Vec::with_capacity(raw.len());
    let mut names = HashSet::new();

    for (i, part) in raw.iter().enumerate() {
        let segment = Segment::parse(part, pattern)?;
        if matches!(segment, Segment::Wildcard(_)) && i + 1 != raw.len() {
            return Err(RouteError::WildcardNotLast {
                pattern: pattern.to_string(),
            });
        }
        if let Segment::Param(name) | Segment::Wildcard(name) = &segment {
            if !names.insert(name.clone()) {
                return Err(RouteError::DuplicateName {
                    pattern: pattern.to_string(),
                    name: name.clone(),
                });
            }
        }
        segments.push(segment);
    }

    Ok(segments)
}

/// Canonical textual form of a parsed pattern, always starting with `/`.
pub fn normalize(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&segment.to_string());
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_discards_empty_segments() {
        assert_eq!(split_path("/a//b/"), vec!["a", "b"]);
        assert!(split_path("/").is_empty());
        assert!(split_path("").is_empty());
    }

    #[test]
    fn test_parse_classifies_segments() {
        let segments = parse_pattern("/assets/:kind/*filepath").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("assets".into()),
                Segment::Param("kind".into()),
                Segment::Wildcard("filepath".into()),
            ]
        );
        assert_eq!(normalize(&segments), "/assets/:kind/*filepath");
    }

    #[test]
    fn test_wildcard_must_be_last() {
        let err = parse_pattern("/static/*dir/file").unwrap_err();
        assert!(matches!(err, RouteError::WildcardNotLast { .. }));

        let err = parse_pattern("/*a/*b").unwrap_err();
        assert!(matches!(err, RouteError::WildcardNotLast { .. }));
    }

    #[test]
    fn test_empty_names_rejected() {
        assert!(matches!(
            parse_pattern("/user/:").unwrap_err(),
            RouteError::EmptyName { .. }
        ));
        assert!(matches!(
            parse_pattern("/files/*").unwrap_err(),
            RouteError::EmptyName { .. }
        ));
    }

    #[test]
    fn test_repeated_capture_name_rejected() {
        assert_eq!(
            parse_pattern("/a/:x/b/:x").unwrap_err(),
            RouteError::DuplicateName {
                pattern: "/a/:x/b/:x".into(),
                name: "x".into(),
            }
        );
        assert!(matches!(
            parse_pattern("/files/:path/*path").unwrap_err(),
            RouteError::DuplicateName { .. }
        ));
        assert!(parse_pattern("/a/:x/b/:y").is_ok());
    }

    #[test]
    fn test_root_normalizes_to_slash() {
        let segments = parse_pattern("//").unwrap();
        assert!(segments.is_empty());
        assert_eq!(normalize(&segments), "/");
    }
}
