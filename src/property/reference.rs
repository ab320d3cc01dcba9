//! Non-owning link accessors.
//!
//! A reference never owns its target. What the owner stores under the key is
//! only the link: the [`NodePath`] from some root to the target. The target
//! is looked up at the point of use via `resolve(root)`, and a path that no
//! longer resolves is a `DanglingReference` error rather than a stale
//! pointer.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use super::Property;
use crate::tree::{CompositeNode, Key, Node, NodePath, ValueNode};
use crate::{Error, Result};

fn resolve_link<'r, T: Node>(key: &Key, path: &NodePath, root: &'r dyn Node) -> Result<&'r T> {
    let target = root.resolve(path).ok_or_else(|| Error::DanglingReference {
        key: key.to_string(),
        path: path.to_string(),
    })?;
    target.try_downcast_ref::<T>(path)
}

// ============================================================================
// ReferenceProperty
// ============================================================================

/// Link to a single `T` living elsewhere in the tree.
pub struct ReferenceProperty<O, T> {
    link: Property<O, ValueNode<NodePath>>,
    _target: PhantomData<fn() -> T>,
}

impl<O, T> ReferenceProperty<O, T>
where
    O: Deref<Target = CompositeNode>,
    T: Node,
{
    pub fn new(owner: O, key: impl Into<Key>) -> Self {
        Self { link: Property::new(owner, key), _target: PhantomData }
    }

    pub fn key(&self) -> &Key {
        self.link.key()
    }

    /// Whether a target has been assigned.
    pub fn is_present(&self) -> bool {
        self.link.is_present()
    }

    fn stored(&self) -> Result<&NodePath> {
        self.link
            .peek()?
            .map(ValueNode::get)
            .ok_or_else(|| Error::NullReference { key: self.key().to_string() })
    }

    /// Look the target up under `root`.
    pub fn resolve<'r>(&self, root: &'r dyn Node) -> Result<&'r T> {
        resolve_link(self.key(), self.stored()?, root)
    }
}

impl<'a, T: Node> ReferenceProperty<&'a CompositeNode, T> {
    /// The stored link; `NullReference` when unset.
    pub fn path(&self) -> Result<&'a NodePath> {
        self.link
            .value_if_present()?
            .ok_or_else(|| Error::NullReference { key: self.key().to_string() })
    }
}

impl<'a, T: Node> ReferenceProperty<&'a mut CompositeNode, T> {
    pub fn path(&self) -> Result<&NodePath> {
        self.stored()
    }

    /// Point at `path`. Nothing is checked until the link is resolved.
    pub fn set(&mut self, path: NodePath) -> Result<()> {
        tracing::trace!(key = %self.key(), %path, "linking reference");
        self.link.set(path)
    }

    /// Drop the link. The target is unaffected.
    pub fn clear(&mut self) -> bool {
        self.link.clear()
    }
}

impl<O, T> fmt::Debug for ReferenceProperty<O, T>
where
    O: Deref<Target = CompositeNode>,
    T: Node,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceProperty")
            .field("key", self.key())
            .field("path", &self.stored().ok())
            .finish()
    }
}

// ============================================================================
// ReferencesListProperty
// ============================================================================

/// Ordered sequence of links to `T`s living elsewhere in the tree.
pub struct ReferencesListProperty<O, T> {
    links: Property<O, ValueNode<Vec<NodePath>>>,
    _target: PhantomData<fn() -> T>,
}

impl<O, T> ReferencesListProperty<O, T>
where
    O: Deref<Target = CompositeNode>,
    T: Node,
{
    pub fn new(owner: O, key: impl Into<Key>) -> Self {
        Self { links: Property::new(owner, key), _target: PhantomData }
    }

    pub fn key(&self) -> &Key {
        self.links.key()
    }

    pub fn is_present(&self) -> bool {
        self.links.is_present()
    }

    fn stored(&self) -> Result<&[NodePath]> {
        Ok(self.links.peek()?.map(|node| node.get().as_slice()).unwrap_or_default())
    }

    fn stored_at(&self, pos: usize) -> Result<&NodePath> {
        let paths = self.stored()?;
        paths.get(pos).ok_or(Error::OutOfRange { index: pos, len: paths.len() })
    }

    /// Link count; 0 when absent, `TypeMismatch` for a mistyped field.
    pub fn try_len(&self) -> Result<usize> {
        self.stored().map(<[NodePath]>::len)
    }

    /// Like [`ReferencesListProperty::try_len`], but a mistyped field counts
    /// as empty. The mismatch is still logged.
    pub fn len(&self) -> usize {
        self.try_len().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_item_present(&self, pos: usize) -> bool {
        pos < self.len()
    }

    pub fn resolve<'r>(&self, pos: usize, root: &'r dyn Node) -> Result<&'r T> {
        resolve_link(self.key(), self.stored_at(pos)?, root)
    }

    /// Resolve every link, failing on the first that does not resolve.
    pub fn resolve_all<'r>(&self, root: &'r dyn Node) -> Result<Vec<&'r T>> {
        self.stored()?
            .iter()
            .map(|path| resolve_link(self.key(), path, root))
            .collect()
    }
}

impl<'a, T: Node> ReferencesListProperty<&'a CompositeNode, T> {
    /// All links in order; empty when the field is absent.
    pub fn paths(&self) -> Result<&'a [NodePath]> {
        Ok(self.links.value_if_present()?.map(Vec::as_slice).unwrap_or_default())
    }

    pub fn path(&self, pos: usize) -> Result<&'a NodePath> {
        let paths = self.paths()?;
        paths.get(pos).ok_or(Error::OutOfRange { index: pos, len: paths.len() })
    }
}

impl<'a, T: Node> ReferencesListProperty<&'a mut CompositeNode, T> {
    pub fn paths(&self) -> Result<&[NodePath]> {
        self.stored()
    }

    pub fn path(&self, pos: usize) -> Result<&NodePath> {
        self.stored_at(pos)
    }

    /// Append a link.
    pub fn push(&mut self, path: NodePath) -> Result<()> {
        tracing::trace!(key = %self.key(), %path, "appending reference");
        self.links.ensure()?.get_mut().push(path);
        Ok(())
    }

    pub fn remove(&mut self, pos: usize) -> Result<NodePath> {
        let paths = self.links.get_mut()?.get_mut();
        if pos >= paths.len() {
            return Err(Error::OutOfRange { index: pos, len: paths.len() });
        }
        Ok(paths.remove(pos))
    }

    pub fn clear(&mut self) -> bool {
        self.links.clear()
    }
}

impl<O, T> fmt::Debug for ReferencesListProperty<O, T>
where
    O: Deref<Target = CompositeNode>,
    T: Node,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferencesListProperty")
            .field("key", self.key())
            .field("paths", &self.stored().ok())
            .finish()
    }
}
