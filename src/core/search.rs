//! Glob style name search over the tree.
//!
//! `*` matches any run of characters, `?` matches one character, everything
//! else is literal. Matching is case-insensitive and unanchored, so `fr`
//! matches `France`.

use crate::core::tree::{NodeId, SearchMatch, Tree};
use regex::RegexBuilder;

#[derive(Clone, Debug)]
enum SearchMatcher {
    Glob(regex::Regex),
    /// Used only if the compiled pattern exceeds the regex size limit.
    Literal(String),
}

#[derive(Clone, Debug)]
pub struct SearchPattern {
    text: String,
    matcher: SearchMatcher,
}

impl SearchPattern {
    /// Compile `text`, or `None` when it is empty.
    pub fn compile(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let source = glob_to_regex(text);
        let matcher = match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(regex) => SearchMatcher::Glob(regex),
            Err(err) => {
                tracing::warn!(pattern = text, error = %err, "search pattern fell back to literal match");
                SearchMatcher::Literal(text.to_lowercase())
            }
        };
        Some(Self {
            text: text.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_match(&self, name: &str) -> bool {
        match &self.matcher {
            SearchMatcher::Glob(regex) => regex.is_match(name),
            SearchMatcher::Literal(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() * 2);
    let mut buffer = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(ch.encode_utf8(&mut buffer))),
        }
    }
    source
}

/// Annotate every node of `tree` against `pattern`.
///
/// With no pattern every node is reset to [`SearchMatch::Unset`]. Otherwise a
/// matching node becomes `DirectMatch`, all of its strict ancestors become
/// `AncestorOfMatch`, and every other node is `NoMatch`.
pub fn annotate_search(mut tree: Tree, pattern: Option<&SearchPattern>) -> Tree {
    let order = tree.depth_first();
    let Some(pattern) = pattern else {
        for id in order {
            tree.node_mut(id).search_match = SearchMatch::Unset;
        }
        return tree;
    };

    for id in order {
        if pattern.is_match(&tree.node(id).name) {
            tree.node_mut(id).search_match = SearchMatch::DirectMatch;
            let ancestors: Vec<NodeId> = tree.ancestors(id).collect();
            for ancestor in ancestors {
                tree.node_mut(ancestor).search_match = SearchMatch::AncestorOfMatch;
            }
        } else {
            // Parents are visited first, so a later matching descendant
            // still lifts this node to AncestorOfMatch.
            tree.node_mut(id).search_match = SearchMatch::NoMatch;
        }
    }
    tree
}
