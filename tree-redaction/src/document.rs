//! Arena-backed tree documents.
//!
//! A [`Document`] owns every container of a tree in an arena and addresses
//! them through [`NodeId`] handles. A handle is the container's identity: two
//! slots holding the same `NodeId` alias one container, which is how shared
//! sub-trees and cycles are expressed. Leaves are stored inline in [`Value`].
//!
//! Converting from `serde_json::Value` always yields a plain tree. Aliasing is
//! created explicitly by writing an existing handle into another slot.

use std::{
    collections::{btree_map, BTreeMap, HashSet},
    fmt, iter, slice,
};

use serde::{Serialize, Serializer};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::error::{RedactError, Result};

/// Identity handle of a container inside a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the container in its document's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the value lattice.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// An absent list slot. Written by `remove` mode so sibling indices stay
    /// stable; serialized as `null`.
    Hole,
    /// A list or map owned by the document arena.
    Container(NodeId),
}

impl Value {
    /// Returns `true` for every variant except [`Value::Container`].
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Value::Container(_))
    }

    /// Returns the container handle, if this value is one.
    pub fn as_container(&self) -> Option<NodeId> {
        match self {
            Value::Container(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_hole(&self) -> bool {
        matches!(self, Value::Hole)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become [`Value::Null`].
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

/// The two container shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    List,
    Map,
}

/// A list or map of child values.
#[derive(Clone, Debug, PartialEq)]
pub enum Container {
    List(Vec<Value>),
    /// Keys enumerate in ascending order.
    Map(BTreeMap<String, Value>),
}

impl Container {
    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::List(_) => ContainerKind::List,
            Container::Map(_) => ContainerKind::Map,
        }
    }

    /// A fresh, empty container of the given kind.
    pub fn empty(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::List => Container::List(Vec::new()),
            ContainerKind::Map => Container::Map(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Container::List(items) => items.len(),
            Container::Map(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a child slot. Index keys address lists, field keys address maps.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        match (self, key) {
            (Container::List(items), Key::Index(index)) => items.get(*index),
            (Container::Map(entries), Key::Field(field)) => entries.get(field),
            _ => None,
        }
    }

    /// Iterates children in ascending index or key order.
    pub fn entries(&self) -> Entries<'_> {
        match self {
            Container::List(items) => Entries::List(items.iter().enumerate()),
            Container::Map(entries) => Entries::Map(entries.iter()),
        }
    }
}

/// Iterator over the `(key, value)` children of a [`Container`].
#[derive(Debug)]
pub enum Entries<'a> {
    List(iter::Enumerate<slice::Iter<'a, Value>>),
    Map(btree_map::Iter<'a, String, Value>),
}

impl<'a> Iterator for Entries<'a> {
    type Item = (Key, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Entries::List(it) => it.next().map(|(index, value)| (Key::Index(index), value)),
            Entries::Map(it) => it.next().map(|(field, value)| (Key::Field(field.clone()), value)),
        }
    }
}

impl DoubleEndedIterator for Entries<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self {
            Entries::List(it) => it
                .next_back()
                .map(|(index, value)| (Key::Index(index), value)),
            Entries::Map(it) => it
                .next_back()
                .map(|(field, value)| (Key::Field(field.clone()), value)),
        }
    }
}

/// Identifies a child within its parent container.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Field(String),
}

impl Key {
    /// Field name, or `None` for list indices.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Key::Field(field) => Some(field),
            Key::Index(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{index}"),
            Key::Field(field) => f.write_str(field),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(field: &str) -> Self {
        Key::Field(field.to_string())
    }
}

impl From<String> for Key {
    fn from(field: String) -> Self {
        Key::Field(field)
    }
}

/// Extends a dot-notation path by one segment.
pub(crate) fn join_path(path: &str, key: &Key) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// A tree of values whose containers live in an arena.
#[derive(Clone, Debug, Default)]
pub struct Document {
    containers: Vec<Container>,
    root: Value,
}

impl Document {
    /// An empty document whose root is `null`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from a parsed JSON tree.
    pub fn from_json(json: JsonValue) -> Self {
        let mut document = Self::new();
        let root = document.import(json);
        document.root = root;
        document
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn set_root(&mut self, root: Value) {
        self.root = root;
    }

    /// Number of containers in the arena, reachable or not.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn container(&self, id: NodeId) -> Option<&Container> {
        self.containers.get(id.0)
    }

    pub(crate) fn container_mut(&mut self, id: NodeId) -> Option<&mut Container> {
        self.containers.get_mut(id.0)
    }

    pub(crate) fn alloc(&mut self, container: Container) -> NodeId {
        self.containers.push(container);
        NodeId(self.containers.len() - 1)
    }

    /// Allocates a list and returns a value referring to it.
    pub fn new_list<I>(&mut self, items: I) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Container(self.alloc(Container::List(items.into_iter().collect())))
    }

    /// Allocates a map and returns a value referring to it.
    pub fn new_map<K, I>(&mut self, entries: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Container(self.alloc(Container::Map(entries)))
    }

    /// Reads the slot at `key` in `parent`.
    pub fn get(&self, parent: NodeId, key: &Key) -> Option<&Value> {
        self.container(parent)?.get(key)
    }

    /// Writes `value` into `parent` at `key`, returning the previous value.
    ///
    /// Writing past the end of a list pads the gap with [`Value::Hole`]. An
    /// index key on a map addresses the field of the same decimal name; a
    /// field key on a list must parse as an index.
    pub fn set(&mut self, parent: NodeId, key: Key, value: Value) -> Result<Option<Value>> {
        let container = self
            .container_mut(parent)
            .ok_or(RedactError::DanglingNode(parent))?;
        match container {
            Container::List(items) => {
                let index = match &key {
                    Key::Index(index) => *index,
                    Key::Field(field) => field
                        .parse()
                        .map_err(|_| RedactError::InvalidKey(key.to_string()))?,
                };
                if index < items.len() {
                    Ok(Some(std::mem::replace(&mut items[index], value)))
                } else {
                    items.resize(index, Value::Hole);
                    items.push(value);
                    Ok(None)
                }
            }
            Container::Map(entries) => Ok(entries.insert(key.to_string(), value)),
        }
    }

    /// Removes the slot at `key`: list slots become [`Value::Hole`] so that
    /// later indices do not shift, map entries are deleted.
    pub fn remove(&mut self, parent: NodeId, key: &Key) -> Result<Option<Value>> {
        let container = self
            .container_mut(parent)
            .ok_or(RedactError::DanglingNode(parent))?;
        Ok(match (container, key) {
            (Container::List(items), Key::Index(index)) => items
                .get_mut(*index)
                .map(|slot| std::mem::replace(slot, Value::Hole)),
            (Container::Map(entries), Key::Field(field)) => entries.remove(field),
            _ => None,
        })
    }

    /// Resolves a dot-notation path from the root. The empty path is the root.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(&self.root);
        }
        path.split('.').try_fold(&self.root, |current, segment| {
            let container = self.container(current.as_container()?)?;
            match container {
                Container::List(items) => items.get(segment.parse::<usize>().ok()?),
                Container::Map(entries) => entries.get(segment),
            }
        })
    }

    /// Copies a JSON tree into the arena and returns the value for its root.
    pub fn import(&mut self, json: JsonValue) -> Value {
        let mut pending = Vec::new();
        let root = self.import_shallow(json, &mut pending);
        while let Some((id, json)) = pending.pop() {
            let container = match json {
                JsonValue::Array(items) => Container::List(
                    items
                        .into_iter()
                        .map(|item| self.import_shallow(item, &mut pending))
                        .collect(),
                ),
                JsonValue::Object(entries) => Container::Map(
                    entries
                        .into_iter()
                        .map(|(field, item)| (field, self.import_shallow(item, &mut pending)))
                        .collect(),
                ),
                _ => continue,
            };
            self.containers[id.0] = container;
        }
        root
    }

    /// Converts one JSON node; containers are allocated empty and queued.
    fn import_shallow(&mut self, json: JsonValue, pending: &mut Vec<(NodeId, JsonValue)>) -> Value {
        let kind = match json {
            JsonValue::Null => return Value::Null,
            JsonValue::Bool(b) => return Value::Bool(b),
            JsonValue::Number(n) => return Value::Number(n),
            JsonValue::String(s) => return Value::String(s),
            JsonValue::Array(_) => ContainerKind::List,
            JsonValue::Object(_) => ContainerKind::Map,
        };
        let id = self.alloc(Container::empty(kind));
        pending.push((id, json));
        Value::Container(id)
    }

    /// Converts the tree reachable from the root into JSON.
    ///
    /// Shared sub-trees are written once per reference. A container reached
    /// again while it is still being written is a cycle and fails with
    /// [`RedactError::Cycle`].
    pub fn to_json(&self) -> Result<JsonValue> {
        let root = match &self.root {
            Value::Container(id) => *id,
            leaf => return Ok(leaf_to_json(leaf)),
        };
        let mut on_path = HashSet::from([root]);
        let mut stack = vec![self.open_frame(root, None)?];

        loop {
            let Some(frame) = stack.last_mut() else {
                return Ok(JsonValue::Null);
            };
            if let Some((key, value)) = frame.children.next() {
                match value {
                    Value::Container(id) => {
                        if !on_path.insert(*id) {
                            let path = stack
                                .iter()
                                .filter_map(|f| f.key.as_ref())
                                .chain(iter::once(&key))
                                .map(ToString::to_string)
                                .collect::<Vec<_>>()
                                .join(".");
                            return Err(RedactError::Cycle { path });
                        }
                        let child = self.open_frame(*id, Some(key))?;
                        stack.push(child);
                    }
                    leaf => frame.accept(&key, leaf_to_json(leaf)),
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                return Ok(JsonValue::Null);
            };
            on_path.remove(&done.id);
            match (stack.last_mut(), done.key) {
                (Some(parent), Some(key)) => parent.accept(&key, done.out),
                _ => return Ok(done.out),
            }
        }
    }

    fn open_frame(&self, id: NodeId, key: Option<Key>) -> Result<JsonFrame<'_>> {
        let container = self.container(id).ok_or(RedactError::DanglingNode(id))?;
        let out = match container.kind() {
            ContainerKind::List => JsonValue::Array(Vec::with_capacity(container.len())),
            ContainerKind::Map => JsonValue::Object(JsonMap::new()),
        };
        Ok(JsonFrame {
            id,
            key,
            children: container.entries(),
            out,
        })
    }
}

struct JsonFrame<'a> {
    id: NodeId,
    key: Option<Key>,
    children: Entries<'a>,
    out: JsonValue,
}

impl JsonFrame<'_> {
    fn accept(&mut self, key: &Key, json: JsonValue) {
        match &mut self.out {
            JsonValue::Array(items) => items.push(json),
            JsonValue::Object(entries) => {
                entries.insert(key.to_string(), json);
            }
            _ => {}
        }
    }
}

fn leaf_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null | Value::Hole | Value::Container(_) => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::Number(n.clone()),
        Value::String(s) => JsonValue::String(s.clone()),
    }
}

impl From<JsonValue> for Document {
    fn from(json: JsonValue) -> Self {
        Self::from_json(json)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}
