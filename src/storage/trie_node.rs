//! Character-keyed prefix tree mapping lowercase words to definition offsets.
//!
//! A [`PrefixIndex`] owns a single root [`TrieNode`]. Every edge is one
//! `char` of the lowercased key, and a node carrying a value marks the end of
//! an inserted key. Children are kept in a `BTreeMap`, so prefix expansion
//! always enumerates matches in ascending character order.
//!
//! # Examples
//!
//! ```
//! use dictrie::storage::PrefixIndex;
//!
//! let mut index = PrefixIndex::new();
//! index.insert("Catalog", 2);
//! index.insert("catapult", 3);
//!
//! assert_eq!(
//!     index.search("CAT"),
//!     vec![("catalog".to_string(), 2), ("catapult".to_string(), 3)]
//! );
//! ```

use std::collections::BTreeMap;

/// One character position in the key space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    pub(crate) children: BTreeMap<char, TrieNode>,
    pub(crate) value: Option<u64>,
}

impl TrieNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Definition offset if this node completes an inserted key.
    pub fn value(&self) -> Option<u64> {
        self.value
    }

    pub fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    pub fn child(&self, c: char) -> Option<&TrieNode> {
        self.children.get(&c)
    }

    /// Children in ascending character order.
    pub fn children(&self) -> impl Iterator<Item = (char, &TrieNode)> {
        self.children.iter().map(|(c, node)| (*c, node))
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, this node included.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.values().map(TrieNode::subtree_size).sum::<usize>()
    }
}

/// In-memory prefix index over lowercased keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixIndex {
    root: TrieNode,
    key_count: usize,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an index around an already populated root, e.g. one decoded
    /// from a snapshot.
    pub(crate) fn from_root(root: TrieNode) -> Self {
        let key_count = count_terminals(&root);
        Self { root, key_count }
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    pub fn node_count(&self) -> usize {
        self.root.subtree_size()
    }

    /// Inserts `key` (lowercased) with `value`. An existing key keeps its
    /// position in the tree and takes the new value.
    pub fn insert(&mut self, key: &str, value: u64) {
        let key = key.to_lowercase();
        let mut node = &mut self.root;
        for c in key.chars() {
            node = node.children.entry(c).or_default();
        }
        if node.value.replace(value).is_none() {
            self.key_count += 1;
        }
    }

    /// Walks `key` (lowercased) from the root.
    ///
    /// Returns `None` as soon as a character has no matching child. Otherwise
    /// returns the node reached, terminal or not.
    pub fn lookup_exact(&self, key: &str) -> Option<&TrieNode> {
        let key = key.to_lowercase();
        let mut node = &self.root;
        for c in key.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Resolves a word or word prefix to candidate `(word, offset)` pairs.
    ///
    /// An exact key wins over expansion, even when longer keys share it as a
    /// prefix. Otherwise every key below the reached node is returned in
    /// ascending character order. Unknown prefixes yield an empty vector.
    pub fn search(&self, term: &str) -> Vec<(String, u64)> {
        let term = term.to_lowercase();
        match self.lookup_exact(&term) {
            None => Vec::new(),
            Some(node) => match node.value {
                Some(value) => vec![(term, value)],
                None => collect_terminals(node, term),
            },
        }
    }

    /// Every key starting with `prefix`, the prefix itself included when it
    /// is a key.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<(String, u64)> {
        let prefix = prefix.to_lowercase();
        match self.lookup_exact(&prefix) {
            None => Vec::new(),
            Some(node) => collect_terminals(node, prefix),
        }
    }
}

/// Depth-first collection of all terminal nodes under `node`.
///
/// Each call owns its result vector; nothing is shared between calls. A
/// terminal node is reported before its descendants.
fn collect_terminals(node: &TrieNode, prefix: String) -> Vec<(String, u64)> {
    let mut found = Vec::new();
    let mut path = prefix;
    walk_terminals(node, &mut path, &mut found);
    found
}

fn walk_terminals(node: &TrieNode, path: &mut String, found: &mut Vec<(String, u64)>) {
    if let Some(value) = node.value {
        found.push((path.clone(), value));
    }
    for (&c, child) in &node.children {
        path.push(c);
        walk_terminals(child, path, found);
        path.pop();
    }
}

fn count_terminals(node: &TrieNode) -> usize {
    usize::from(node.is_terminal()) + node.children.values().map(count_terminals).sum::<usize>()
}
