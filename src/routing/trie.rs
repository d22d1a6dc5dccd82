//! Path segment trie.
//!
//! Each node has three kinds of child slot, tried in this order when resolving:
//! literal children keyed by segment text, at most one `:param` child, and at
//! most one `*wildcard` leaf. The walk is greedy and never backtracks.

use std::collections::HashMap;

use crate::routing::pattern::Segment;
use crate::routing::{Params, RouteError};

/// A trie node. Terminal nodes remember the pattern that ends at them.
#[derive(Debug, Default)]
pub struct Node {
    pattern: Option<String>,
    literals: HashMap<String, Node>,
    param: Option<Box<ParamChild>>,
    wildcard: Option<WildcardLeaf>,
}

#[derive(Debug)]
struct ParamChild {
    name: String,
    node: Node,
}

/// Wildcards swallow the rest of the path, so they never have children.
#[derive(Debug)]
struct WildcardLeaf {
    name: String,
    pattern: String,
}

/// Result of walking the trie for a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieMatch<'a> {
    pub pattern: &'a str,
    pub params: Params,
}

impl Node {
    /// Insert a parsed pattern below this node.
    ///
    /// `pattern` is the normalized pattern text stored on the terminal node.
    pub fn insert(
        &mut self,
        method: &str,
        segments: &[Segment],
        pattern: &str,
    ) -> Result<(), RouteError> {
        let duplicate = || RouteError::Duplicate {
            method: method.to_string(),
            pattern: pattern.to_string(),
        };

        let mut node = self;
        for segment in segments {
            match segment {
                Segment::Literal(text) => {
                    node = node.literals.entry(text.clone()).or_default();
                }
                Segment::Param(name) => {
                    let child = node.param.get_or_insert_with(|| {
                        Box::new(ParamChild {
                            name: name.clone(),
                            node: Node::default(),
                        })
                    });
                    if child.name != *name {
                        return Err(RouteError::ParamConflict {
                            pattern: pattern.to_string(),
                            name: name.clone(),
                            existing: child.name.clone(),
                        });
                    }
                    node = &mut child.node;
                }
                Segment::Wildcard(name) => {
                    // parse_pattern guarantees this is the final segment.
                    return match &node.wildcard {
                        Some(leaf) if leaf.name != *name => Err(RouteError::WildcardConflict {
                            pattern: pattern.to_string(),
                            name: name.clone(),
                            existing: leaf.name.clone(),
                        }),
                        Some(_) => Err(duplicate()),
                        None => {
                            node.wildcard = Some(WildcardLeaf {
                                name: name.clone(),
                                pattern: pattern.to_string(),
                            });
                            Ok(())
                        }
                    };
                }
            }
        }

        if node.pattern.is_some() {
            return Err(duplicate());
        }
        node.pattern = Some(pattern.to_string());
        Ok(())
    }

    /// Walk the trie for the given path segments.
    ///
    /// Precedence at every level is literal, then param, then wildcard.
    pub fn resolve(&self, path: &[&str]) -> Option<TrieMatch<'_>> {
        let mut node = self;
        let mut params = Params::new();

        for (i, segment) in path.iter().enumerate() {
            if let Some(child) = node.literals.get(*segment) {
                node = child;
            } else if let Some(child) = &node.param {
                params.insert(child.name.clone(), (*segment).to_string());
                node = &child.node;
            } else if let Some(leaf) = &node.wildcard {
                params.insert(leaf.name.clone(), path[i..].join("/"));
                return Some(TrieMatch {
                    pattern: &leaf.pattern,
                    params,
                });
            } else {
                return None;
            }
        }

        node.pattern.as_deref().map(|pattern| TrieMatch { pattern, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::pattern::{normalize, parse_pattern, split_path};

    fn trie(patterns: &[&str]) -> Node {
        let mut root = Node::default();
        for pattern in patterns {
            let segments = parse_pattern(pattern).unwrap();
            root.insert("GET", &segments, &normalize(&segments)).unwrap();
        }
        root
    }

    fn lookup<'a>(root: &'a Node, path: &str) -> Option<TrieMatch<'a>> {
        root.resolve(&split_path(path))
    }

    #[test]
    fn test_literal_beats_param() {
        let root = trie(&["/user/alice", "/user/:name"]);

        let m = lookup(&root, "/user/alice").unwrap();
        assert_eq!(m.pattern, "/user/alice");
        assert!(m.params.is_empty());

        let m = lookup(&root, "/user/bob").unwrap();
        assert_eq!(m.pattern, "/user/:name");
        assert_eq!(m.params.get("name").map(String::as_str), Some("bob"));
    }

    #[test]
    fn test_param_beats_wildcard() {
        let root = trie(&["/files/:name", "/files/*rest"]);

        assert_eq!(lookup(&root, "/files/a").unwrap().pattern, "/files/:name");

        // Greedy: the param branch is taken and has no child for "b".
        assert!(lookup(&root, "/files/a/b").is_none());
    }

    #[test]
    fn test_wildcard_captures_remainder() {
        let root = trie(&["/static/*filepath"]);

        let m = lookup(&root, "/static/css/a.css").unwrap();
        assert_eq!(m.pattern, "/static/*filepath");
        assert_eq!(m.params.get("filepath").map(String::as_str), Some("css/a.css"));

        // Nothing left for the wildcard to capture.
        assert!(lookup(&root, "/static").is_none());
    }

    #[test]
    fn test_non_terminal_node_does_not_match() {
        let root = trie(&["/a/b/c"]);
        assert!(lookup(&root, "/a/b").is_none());
        assert!(lookup(&root, "/a/b/c/d").is_none());
        assert!(lookup(&root, "/a/b/c").is_some());
    }

    #[test]
    fn test_root_pattern() {
        let root = trie(&["/"]);
        assert_eq!(lookup(&root, "/").unwrap().pattern, "/");
        assert!(lookup(&root, "/x").is_none());
    }

    #[test]
    fn test_conflicting_param_names_rejected() {
        let mut root = trie(&["/user/:id"]);
        let segments = parse_pattern("/user/:name/profile").unwrap();
        let err = root
            .insert("GET", &segments, &normalize(&segments))
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::ParamConflict {
                pattern: "/user/:name/profile".into(),
                name: "name".into(),
                existing: "id".into(),
            }
        );
    }

    #[test]
    fn test_conflicting_wildcard_names_rejected() {
        let mut root = trie(&["/static/*filepath"]);
        let segments = parse_pattern("/static/*rest").unwrap();
        let err = root
            .insert("GET", &segments, &normalize(&segments))
            .unwrap_err();
        assert!(matches!(err, RouteError::WildcardConflict { .. }));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut root = trie(&["/a/:b", "/s/*rest"]);
        for pattern in ["/a/:b", "//a//:b/", "/s/*rest"] {
            let segments = parse_pattern(pattern).unwrap();
            let err = root
                .insert("GET", &segments, &normalize(&segments))
                .unwrap_err();
            assert!(matches!(err, RouteError::Duplicate { .. }), "{}", pattern);
        }
    }
}
