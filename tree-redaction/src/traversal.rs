//! Iterative, cycle-safe depth-first traversal.
//!
//! [`Walker`] keeps its own worklist and visited set and borrows the document
//! only for the duration of one step, so the caller may rewrite slots between
//! steps. [`Traversal`] wraps it as a plain read-only iterator.

use std::collections::HashSet;

use crate::document::{join_path, Document, Key, NodeId, Value};

/// A node produced by the traversal, with enough addressing metadata to
/// rewrite its slot.
#[derive(Clone, Debug, PartialEq)]
pub struct TraversalNode {
    /// The value found in the slot when the node was produced.
    pub value: Value,
    /// Dot-joined keys from the root. Empty for the root.
    pub path: String,
    /// Container owning the slot. `None` only for the root.
    pub parent: Option<NodeId>,
    /// Position within `parent`. `None` only for the root.
    pub key: Option<Key>,
}

impl TraversalNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug)]
struct Pending {
    path: String,
    parent: Option<NodeId>,
    key: Option<Key>,
}

/// Explicit-worklist walker over a [`Document`].
///
/// Each reachable container is expanded once; a container reached again
/// (through a cycle or a second reference) is produced as a node but not
/// re-entered. Siblings come out in ascending index or key order.
#[derive(Debug)]
pub struct Walker {
    stack: Vec<Pending>,
    seen: HashSet<NodeId>,
}

impl Walker {
    /// A walker positioned before the root.
    pub fn new() -> Self {
        Self {
            stack: vec![Pending {
                path: String::new(),
                parent: None,
                key: None,
            }],
            seen: HashSet::new(),
        }
    }

    /// Produces the next node, or `None` once the walk is exhausted.
    ///
    /// The node's value is read from `document` now; its children are queued
    /// before it is returned, so rewriting its slot afterwards does not affect
    /// which descendants are visited.
    pub fn next_node(&mut self, document: &Document) -> Option<TraversalNode> {
        while let Some(pending) = self.stack.pop() {
            let value = match (pending.parent, &pending.key) {
                (Some(parent), Some(key)) => match document.get(parent, key) {
                    Some(value) => value.clone(),
                    // slot vanished since it was queued
                    None => continue,
                },
                _ => document.root().clone(),
            };

            if let Value::Container(id) = value {
                if self.seen.insert(id) {
                    self.expand(document, id, &pending.path);
                }
            }

            return Some(TraversalNode {
                value,
                path: pending.path,
                parent: pending.parent,
                key: pending.key,
            });
        }
        None
    }

    /// Number of distinct containers expanded so far.
    pub fn visited(&self) -> usize {
        self.seen.len()
    }

    fn expand(&mut self, document: &Document, id: NodeId, path: &str) {
        let Some(container) = document.container(id) else {
            return;
        };
        // Pushed in reverse so the lowest key is popped first.
        for (key, _) in container.entries().rev() {
            self.stack.push(Pending {
                path: join_path(path, &key),
                parent: Some(id),
                key: Some(key),
            });
        }
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only iterator over every node of a document.
#[derive(Debug)]
pub struct Traversal<'a> {
    document: &'a Document,
    walker: Walker,
}

impl Iterator for Traversal<'_> {
    type Item = TraversalNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.walker.next_node(self.document)
    }
}

impl Document {
    /// Walks the document from its root, producing the root first.
    pub fn walk(&self) -> Traversal<'_> {
        Traversal {
            document: self,
            walker: Walker::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Walker;
    use crate::document::{Document, Key, Value};

    fn paths(document: &Document) -> Vec<String> {
        document.walk().map(|node| node.path).collect()
    }

    #[test]
    fn visits_depth_first_in_key_order() {
        let document = Document::from_json(json!({"b": [10, 20], "a": {"c": 1}}));
        assert_eq!(paths(&document), vec!["", "a", "a.c", "b", "b.0", "b.1"]);
    }

    #[test]
    fn root_has_no_parent() {
        let document = Document::from_json(json!({"a": 1}));
        let nodes: Vec<_> = document.walk().collect();
        assert!(nodes[0].is_root());
        assert_eq!(nodes[0].key, None);
        assert_eq!(nodes[1].parent, document.root().as_container());
        assert_eq!(nodes[1].key, Some(Key::from("a")));
        assert_eq!(nodes[1].value, Value::from(1_i64));
    }

    #[test]
    fn leaf_root_produces_single_node() {
        let document = Document::from_json(json!("x"));
        assert_eq!(paths(&document), vec![""]);
    }

    #[test]
    fn parent_slot_holds_value_at_emission() {
        let document = Document::from_json(json!({"a": [1, {"b": null}], "c": "d"}));
        for node in document.walk().filter(|node| !node.is_root()) {
            let parent = node.parent.unwrap();
            let key = node.key.as_ref().unwrap();
            assert_eq!(document.get(parent, key), Some(&node.value));
        }
    }

    #[test]
    fn cycle_is_produced_but_not_reentered() {
        let mut document = Document::new();
        let root = document.new_map([("a", Value::from(1_i64))]);
        let id = root.as_container().unwrap();
        document.set(id, Key::from("self"), root.clone()).unwrap();
        document.set_root(root);

        assert_eq!(paths(&document), vec!["", "a", "self"]);
    }

    #[test]
    fn shared_subtree_is_expanded_once() {
        let mut document = Document::new();
        let shared = document.new_map([("k", Value::Null)]);
        let root = document.new_map([("x", shared.clone()), ("y", shared)]);
        document.set_root(root);

        assert_eq!(paths(&document), vec!["", "x", "x.k", "y"]);
    }

    #[test]
    fn slots_can_be_rewritten_between_steps() {
        let mut document = Document::from_json(json!({"a": {"b": 1}, "c": 2}));
        let mut walker = Walker::new();
        let mut seen = Vec::new();
        while let Some(node) = walker.next_node(&document) {
            if let (Some(parent), Some(key)) = (node.parent, node.key.clone()) {
                document.set(parent, key, Value::from("x")).unwrap();
            }
            seen.push(node.path);
        }
        assert_eq!(seen, vec!["", "a", "a.b", "c"]);
        assert_eq!(document.to_json().unwrap(), json!({"a": "x", "c": "x"}));
        assert_eq!(walker.visited(), 2);
        assert!(walker.next_node(&document).is_none());
    }

    #[test]
    fn removed_slot_is_skipped() {
        let mut document = Document::from_json(json!({"a": 1, "b": 2}));
        let root = document.root().as_container().unwrap();
        let mut walker = Walker::new();
        let first = walker.next_node(&document).unwrap();
        assert!(first.is_root());
        document.remove(root, &Key::from("b")).unwrap();
        let rest: Vec<_> = std::iter::from_fn(|| walker.next_node(&document))
            .map(|node| node.path)
            .collect();
        assert_eq!(rest, vec!["a"]);
    }
}
