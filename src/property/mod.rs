//! # Typed Properties
//!
//! A property is a short-lived, non-owning handle bound to `(owner, key)`:
//! "the child of `owner` at `key`, if present, is a `N`". All state lives in
//! the owner's [`CompositeNode`]; presence is re-derived from it on every
//! call.
//!
//! The owner parameter `O` decides what the handle may do:
//! - `&CompositeNode` ([`PropertyRef`]): read-only; absent fields are
//!   `NotPresent` and never created
//! - `&mut CompositeNode` ([`PropertyMut`]): may materialize storage via
//!   `ensure()` and remove it via `clear()`
//!
//! | Kind | Backing node | Module |
//! |------|--------------|--------|
//! | [`ValueProperty<O, T>`] | `ValueNode<T>` | `value` |
//! | [`CompositeProperty<O, M>`] | the model `M` | `composite` |
//! | [`ListProperty<O, I>`] | `ListNode` of `I` | `list` |
//! | [`ReferenceProperty<O, T>`] | a `NodePath` link | `reference` |
//! | [`ReferencesListProperty<O, T>`] | a list of `NodePath` links | `reference` |

pub mod value;
pub mod composite;
pub mod list;
pub mod reference;

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use crate::tree::{CompositeNode, Key, Node};
use crate::{Error, Result};

pub use value::ValueProperty;
pub use composite::CompositeProperty;
pub use list::{ListProperty, ValuesListProperty, CompositesListProperty};
pub use reference::{ReferenceProperty, ReferencesListProperty};

/// Read-only property over a borrowed owner.
pub type PropertyRef<'a, N> = Property<&'a CompositeNode, N>;

/// Mutable property over a mutably borrowed owner.
pub type PropertyMut<'a, N> = Property<&'a mut CompositeNode, N>;

// ============================================================================
// Property
// ============================================================================

/// Typed accessor for the child of `owner` at `key`.
pub struct Property<O, N> {
    owner: O,
    key: Key,
    _node: PhantomData<fn() -> N>,
}

/// Checked lookup of `key` in `owner`; `Ok(None)` when absent.
pub(crate) fn lookup<'a, N: Node>(owner: &'a CompositeNode, key: &Key) -> Result<Option<&'a N>> {
    owner
        .find(key.as_str())
        .map(|node| node.try_downcast_ref::<N>(key))
        .transpose()
}

impl<O, N> Property<O, N>
where
    O: Deref<Target = CompositeNode>,
    N: Node,
{
    pub fn new(owner: O, key: impl Into<Key>) -> Self {
        Self { owner, key: key.into(), _node: PhantomData }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn owner(&self) -> &CompositeNode {
        &self.owner
    }

    pub fn is_present(&self) -> bool {
        self.owner.contains_key(self.key.as_str())
    }

    /// Owner-agnostic lookup, borrowing through the handle.
    pub(crate) fn peek(&self) -> Result<Option<&N>> {
        lookup(&self.owner, &self.key)
    }

    pub(crate) fn not_present(&self) -> Error {
        Error::NotPresent { key: self.key.to_string() }
    }
}

/// Read-only handles hand out borrows of the owner itself, so results
/// outlive the handle.
impl<'a, N: Node> Property<&'a CompositeNode, N> {
    /// The stored node as stored, without a type check.
    pub fn raw(&self) -> Option<&'a dyn Node> {
        self.owner.find(self.key.as_str())
    }

    /// `Ok(None)` when absent; never creates the field.
    pub fn get_if_present(&self) -> Result<Option<&'a N>> {
        lookup(self.owner, &self.key)
    }

    /// The stored node; `NotPresent` when absent.
    pub fn get(&self) -> Result<&'a N> {
        self.get_if_present()?.ok_or_else(|| self.not_present())
    }
}

impl<'a, N: Node> Property<&'a mut CompositeNode, N> {
    pub fn raw(&self) -> Option<&dyn Node> {
        self.owner.find(self.key.as_str())
    }

    pub fn get_if_present(&self) -> Result<Option<&N>> {
        self.peek()
    }

    pub fn get(&self) -> Result<&N> {
        self.peek()?.ok_or_else(|| self.not_present())
    }

    pub fn owner_mut(&mut self) -> &mut CompositeNode {
        &mut *self.owner
    }

    /// The stored node for in-place edits; `NotPresent` when absent.
    pub fn get_mut(&mut self) -> Result<&mut N> {
        let key = &self.key;
        match self.owner.find_mut(key.as_str()) {
            Some(node) => node.try_downcast_mut::<N>(key),
            None => Err(Error::NotPresent { key: key.to_string() }),
        }
    }

    /// Store `node` under the key, replacing whatever was there.
    pub fn set_node(&mut self, node: N) -> Result<&mut N> {
        let key = &self.key;
        tracing::debug!(%key, "replacing property node");
        self.owner.replace(key, Box::new(node));
        match self.owner.find_mut(key.as_str()) {
            Some(node) => node.try_downcast_mut::<N>(key),
            None => Err(Error::NotPresent { key: key.to_string() }),
        }
    }

    /// Remove the field, dropping its node. Returns whether it was present.
    pub fn clear(&mut self) -> bool {
        let removed = self.owner.erase(self.key.as_str());
        if removed {
            tracing::debug!(key = %self.key, "cleared property");
        }
        removed
    }
}

impl<'a, N: Node + Default> Property<&'a mut CompositeNode, N> {
    /// Get-or-create: materializes a default `N` under the key when absent.
    ///
    /// Idempotent; a second call returns the same storage. A present node of
    /// another type is a `TypeMismatch`, never overwritten.
    pub fn ensure(&mut self) -> Result<&mut N> {
        let key = &self.key;
        let (node, inserted) = self
            .owner
            .get_or_insert_with(key, || Box::new(N::default()));
        if inserted {
            tracing::trace!(%key, node_type = std::any::type_name::<N>(), "materialized property");
        }
        node.try_downcast_mut::<N>(key)
    }
}

/// Absent equals absent; present equals present when the nodes are equal.
impl<O, O2, N> PartialEq<Property<O2, N>> for Property<O, N>
where
    O: Deref<Target = CompositeNode>,
    O2: Deref<Target = CompositeNode>,
    N: Node,
{
    fn eq(&self, other: &Property<O2, N>) -> bool {
        match (self.owner().find(self.key.as_str()), other.owner().find(other.key.as_str())) {
            (None, None) => true,
            (Some(a), Some(b)) => a.eq_node(b),
            _ => false,
        }
    }
}

impl<O, N> fmt::Debug for Property<O, N>
where
    O: Deref<Target = CompositeNode>,
    N: Node,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("key", &self.key)
            .field("node", &self.owner().find(self.key.as_str()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ListNode, ValueNode};

    type IntNode = ValueNode<i32>;

    #[test]
    fn test_fresh_owner_has_nothing_present() {
        let owner = CompositeNode::new();
        let prop = PropertyRef::<IntNode>::new(&owner, "a");
        assert!(!prop.is_present());
        assert_eq!(prop.get_if_present().unwrap(), None);
        assert_eq!(prop.get().unwrap_err(), Error::NotPresent { key: "a".into() });
    }

    #[test]
    fn test_read_only_get_outlives_handle() {
        let mut owner = CompositeNode::new();
        owner.insert("a", Box::new(IntNode::new(8)));

        let node = PropertyRef::<IntNode>::new(&owner, "a").get().unwrap();
        let raw = PropertyRef::<IntNode>::new(&owner, "a").raw().unwrap();
        assert_eq!(*node.get(), 8);
        assert!(raw.is::<IntNode>());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut owner = CompositeNode::new();
        let mut prop = PropertyMut::<IntNode>::new(&mut owner, "a");

        let first = prop.ensure().unwrap() as *const IntNode;
        let second = prop.ensure().unwrap() as *const IntNode;
        assert_eq!(first, second);
        assert_eq!(prop.owner().len(), 1);
    }

    #[test]
    fn test_clear_removes_exactly_one_entry() {
        let mut owner = CompositeNode::new();
        owner.insert("other", Box::new(IntNode::default()));

        let mut prop = PropertyMut::<IntNode>::new(&mut owner, "a");
        prop.ensure().unwrap();
        assert_eq!(prop.owner().len(), 2);

        assert!(prop.clear());
        assert!(!prop.is_present());
        assert_eq!(prop.owner().len(), 1);

        assert!(!prop.clear());
        assert_eq!(prop.owner().len(), 1);
    }

    #[test]
    fn test_ensure_on_wrong_type_is_type_mismatch() {
        let mut owner = CompositeNode::new();
        owner.insert("a", Box::new(ListNode::new()));

        let mut prop = PropertyMut::<IntNode>::new(&mut owner, "a");
        let err = prop.ensure().unwrap_err();
        assert!(err.is_integrity_violation());
        // The mismatching node is left alone.
        assert!(prop.raw().unwrap().is::<ListNode>());
    }

    #[test]
    fn test_get_mut_requires_presence() {
        let mut owner = CompositeNode::new();
        let mut prop = PropertyMut::<IntNode>::new(&mut owner, "a");
        assert!(matches!(prop.get_mut(), Err(Error::NotPresent { .. })));
        prop.ensure().unwrap().set(3);
        prop.get_mut().unwrap().set(4);
        assert_eq!(*prop.get().unwrap().get(), 4);
    }

    #[test]
    fn test_set_node_replaces_existing() {
        let mut owner = CompositeNode::new();
        let mut prop = PropertyMut::<IntNode>::new(&mut owner, "a");
        prop.ensure().unwrap().set(1);
        prop.set_node(IntNode::new(2)).unwrap();
        assert_eq!(*prop.get().unwrap().get(), 2);
        assert_eq!(owner.len(), 1);
    }

    #[test]
    fn test_property_equality() {
        let mut a = CompositeNode::new();
        let mut b = CompositeNode::new();

        assert_eq!(PropertyRef::<IntNode>::new(&a, "x"), PropertyRef::<IntNode>::new(&b, "x"));

        PropertyMut::<IntNode>::new(&mut a, "x").ensure().unwrap().set(5);
        assert_ne!(PropertyRef::<IntNode>::new(&a, "x"), PropertyRef::<IntNode>::new(&b, "x"));

        PropertyMut::<IntNode>::new(&mut b, "x").ensure().unwrap().set(5);
        assert_eq!(PropertyRef::<IntNode>::new(&a, "x"), PropertyRef::<IntNode>::new(&b, "x"));

        PropertyMut::<IntNode>::new(&mut b, "x").ensure().unwrap().set(6);
        assert_ne!(PropertyRef::<IntNode>::new(&a, "x"), PropertyRef::<IntNode>::new(&b, "x"));
    }
}
