//! Composite ("object") nodes: insertion-ordered `key → node` maps.

use std::fmt;

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;
use indexmap::map::Entry;

use super::{Key, Node, NodePath};
use crate::{Error, Result};

type Entries = IndexMap<Key, Box<dyn Node>, DefaultHashBuilder>;

/// An insertion-ordered mapping from [`Key`] to one owned [`Node`].
///
/// Keys are unique. Iteration and cloning follow insertion order; erasing an
/// entry keeps the relative order of the others.
#[derive(Default)]
pub struct CompositeNode {
    entries: Entries,
}

impl CompositeNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn find(&self, key: &str) -> Option<&dyn Node> {
        self.entries.get(key).map(|node| node.as_ref())
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut dyn Node> {
        self.entries.get_mut(key).map(|node| node.as_mut())
    }

    /// Entry at insertion position `index`.
    pub fn get_index(&self, index: usize) -> Option<(&Key, &dyn Node)> {
        self.entries.get_index(index).map(|(key, node)| (key, node.as_ref()))
    }

    /// Insert unless `key` is already present.
    ///
    /// Returns the stored node and whether the insert happened. On a duplicate
    /// key the existing node is returned and `node` is dropped; callers that
    /// want replace semantics use [`CompositeNode::replace`].
    pub fn insert(&mut self, key: impl Into<Key>, node: Box<dyn Node>) -> (&mut dyn Node, bool) {
        match self.entries.entry(key.into()) {
            Entry::Occupied(entry) => (entry.into_mut().as_mut(), false),
            Entry::Vacant(entry) => (entry.insert(node).as_mut(), true),
        }
    }

    /// Like [`CompositeNode::insert`], but a duplicate key is an error.
    pub fn try_insert(&mut self, key: impl Into<Key>, node: Box<dyn Node>) -> Result<&mut dyn Node> {
        match self.entries.entry(key.into()) {
            Entry::Occupied(entry) => Err(Error::DuplicateKey(entry.key().to_string())),
            Entry::Vacant(entry) => Ok(entry.insert(node).as_mut()),
        }
    }

    /// Return the node under `key`, inserting `make()` first when absent.
    pub fn get_or_insert_with(
        &mut self,
        key: impl Into<Key>,
        make: impl FnOnce() -> Box<dyn Node>,
    ) -> (&mut dyn Node, bool) {
        match self.entries.entry(key.into()) {
            Entry::Occupied(entry) => (entry.into_mut().as_mut(), false),
            Entry::Vacant(entry) => (entry.insert(make()).as_mut(), true),
        }
    }

    /// Erase-then-insert. A replaced entry keeps its position; a new one is
    /// appended.
    pub fn replace(&mut self, key: impl Into<Key>, node: Box<dyn Node>) -> Option<Box<dyn Node>> {
        self.entries.insert(key.into(), node)
    }

    /// Remove and drop the entry. No-op when absent.
    pub fn erase(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &dyn Node)> {
        self.entries.iter().map(|(key, node)| (key, node.as_ref()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Key, &mut dyn Node)> {
        self.entries.iter_mut().map(|(key, node)| (key, node.as_mut()))
    }

    /// Walk `path` starting at this composite.
    pub fn resolve(&self, path: &NodePath) -> Option<&dyn Node> {
        (self as &dyn Node).resolve(path)
    }

    pub fn resolve_mut(&mut self, path: &NodePath) -> Option<&mut dyn Node> {
        (self as &mut dyn Node).resolve_mut(path)
    }
}

impl Clone for CompositeNode {
    fn clone(&self) -> Self {
        tracing::trace!(entries = self.entries.len(), "deep-cloning composite");
        let mut entries = Entries::with_capacity_and_hasher(self.entries.len(), DefaultHashBuilder::default());
        for (key, node) in &self.entries {
            entries.insert(key.clone(), node.clone_node());
        }
        Self { entries }
    }
}

/// Same keys in the same order, with pairwise-equal nodes.
impl PartialEq for CompositeNode {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, a), (kb, b))| ka == kb && a.eq_node(b))
    }
}

impl fmt::Debug for CompositeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl Node for CompositeNode {
    fn as_composite(&self) -> Option<&CompositeNode> {
        Some(self)
    }

    fn as_composite_mut(&mut self) -> Option<&mut CompositeNode> {
        Some(self)
    }
}

impl<K: Into<Key>> FromIterator<(K, Box<dyn Node>)> for CompositeNode {
    fn from_iter<I: IntoIterator<Item = (K, Box<dyn Node>)>>(iter: I) -> Self {
        let mut node = Self::new();
        for (key, child) in iter {
            node.replace(key, child);
        }
        node
    }
}
