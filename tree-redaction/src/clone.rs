//! Structural cloning that preserves aliasing.
//!
//! Every source container maps to exactly one new container, so two slots
//! that referenced the same container still do afterwards and a cycle clones
//! to a cycle of the same shape. Work is driven by an explicit worklist; tree
//! depth is bounded by memory, not by the call stack.

use std::collections::HashMap;

use crate::{
    document::{Container, Document, NodeId, Value},
    error::{RedactError, Result},
};

/// Copies the tree reachable from `source`'s root into a fresh document.
///
/// The result shares no container with `source`. Containers in the source
/// arena that are not reachable from the root are not copied.
pub fn clone_document(source: &Document) -> Result<Document> {
    let mut target = Document::new();
    let root = match source.root() {
        Value::Container(id) => *id,
        leaf => {
            target.set_root(leaf.clone());
            return Ok(target);
        }
    };

    let mut identities: HashMap<NodeId, NodeId> = HashMap::new();
    let mut worklist: Vec<(NodeId, NodeId)> = Vec::new();

    // The root is registered before any child is visited so back-references
    // to it resolve to the copy.
    let root_copy = allocate_like(source, &mut target, root)?;
    identities.insert(root, root_copy);
    worklist.push((root, root_copy));
    target.set_root(Value::Container(root_copy));

    while let Some((src, dst)) = worklist.pop() {
        let container = source.container(src).ok_or(RedactError::DanglingNode(src))?;
        let mut copy = Container::empty(container.kind());

        for (key, child) in container.entries() {
            let cloned = match child {
                Value::Container(id) => {
                    let mapped = match identities.get(id) {
                        Some(existing) => *existing,
                        None => {
                            let fresh = allocate_like(source, &mut target, *id)?;
                            identities.insert(*id, fresh);
                            worklist.push((*id, fresh));
                            fresh
                        }
                    };
                    Value::Container(mapped)
                }
                leaf => leaf.clone(),
            };
            match &mut copy {
                Container::List(items) => items.push(cloned),
                Container::Map(entries) => {
                    entries.insert(key.to_string(), cloned);
                }
            }
        }

        let slot = target
            .container_mut(dst)
            .ok_or(RedactError::DanglingNode(dst))?;
        *slot = copy;
    }

    Ok(target)
}

/// Allocates an empty container in `target` of the same kind as `id`.
fn allocate_like(source: &Document, target: &mut Document, id: NodeId) -> Result<NodeId> {
    let kind = source
        .container(id)
        .ok_or(RedactError::DanglingNode(id))?
        .kind();
    Ok(target.alloc(Container::empty(kind)))
}
