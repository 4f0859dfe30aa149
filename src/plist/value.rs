//! Decoded property-list values stored in a flat arena.

use std::collections::HashMap;
use std::fmt;

/// Index of a node inside a [`Plist`] arena.
///
/// Node ids are only meaningful for the `Plist` that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the arena index of this node.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single decoded value.
///
/// Composite values refer to their children by [`NodeId`]. UID references
/// are resolved while decoding and never show up here.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    /// Seconds relative to 2001-01-01T00:00:00Z.
    Date(f64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<NodeId>),
    Dict(Dict),
}

impl Value {
    /// Short, human-readable name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Real(_) => "real",
            Value::Date(_) => "date",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Child node ids in traversal order (array items, dictionary values).
    pub fn children(&self) -> &[NodeId] {
        match self {
            Value::Array(items) => items,
            Value::Dict(dict) => &dict.values,
            _ => &[],
        }
    }
}

/// A string-keyed dictionary.
///
/// Keys and values are kept in two parallel vectors in encoded order so that
/// dictionary values can be handed out as a plain slice of children. `index`
/// maps each key to its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dict {
    keys: Vec<String>,
    values: Vec<NodeId>,
    index: HashMap<String, usize>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts an entry. A repeated key replaces the earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: NodeId) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => self.values[pos] = value,
            None => {
                self.index.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.values.push(value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).map(|&pos| self.values[pos])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the value of the first key in `spellings` that is present.
    pub fn get_first(&self, spellings: &[&str]) -> Option<NodeId> {
        spellings.iter().find_map(|key| self.get(key))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// A fully decoded property list.
///
/// Owns every node. The graph reachable from [`Plist::root`] is acyclic;
/// shared objects appear once and are referenced by several parents.
#[derive(Clone, Debug)]
pub struct Plist {
    nodes: Vec<Value>,
    root: NodeId,
}

impl Plist {
    pub(crate) fn from_parts(nodes: Vec<Value>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_value(&self) -> &Value {
        self.get(self.root)
    }

    /// Returns the value stored at `id`.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this `Plist`.
    pub fn get(&self, id: NodeId) -> &Value {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up `key` in `dict` and returns the referenced value.
    pub fn lookup<'a>(&'a self, dict: &Dict, key: &str) -> Option<&'a Value> {
        dict.get(key).map(|id| self.get(id))
    }

    /// Like [`Plist::lookup`] but tries each spelling in order.
    pub fn lookup_first<'a>(&'a self, dict: &Dict, spellings: &[&str]) -> Option<&'a Value> {
        dict.get_first(spellings).map(|id| self.get(id))
    }
}
