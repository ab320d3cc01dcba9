//! # Tree Storage
//!
//! Polymorphic, owned tree nodes. Three kinds are built in:
//! - [`ValueNode<T>`]: a leaf holding one scalar
//! - [`ListNode`]: an ordered sequence of owned nodes
//! - [`CompositeNode`]: an insertion-ordered `key → node` map
//!
//! Typed models (see [`crate::model`]) are nodes too; they wrap a
//! `CompositeNode` and expose it through [`Node::as_composite`].
//!
//! Design rule: nothing in this module knows about properties. Tree walkers
//! (generators, dumpers) only need what is here.

pub mod value;
pub mod list;
pub mod composite;
pub mod path;

use std::any::Any;
use std::borrow::{Borrow, Cow};
use std::fmt;

use serde::{Deserialize, Serialize};

pub use value::{Value, ValueNode};
pub use list::ListNode;
pub use composite::CompositeNode;
pub use path::{NodePath, Segment};

use crate::{Error, Result};

// ============================================================================
// Node capability
// ============================================================================

/// A unit of tree storage.
///
/// Every node can be deep-cloned and compared through `dyn Node`. Both come
/// for free from `Clone + PartialEq` via blanket impls of [`NodeClone`] and
/// [`NodeEq`], so a concrete node type only overrides the structural views it
/// actually provides.
pub trait Node: Any + fmt::Debug + Send + Sync + NodeClone + NodeEq + 'static {
    /// Concrete type name, used in diagnostics.
    fn node_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_composite(&self) -> Option<&CompositeNode> {
        None
    }

    fn as_composite_mut(&mut self) -> Option<&mut CompositeNode> {
        None
    }

    fn as_list(&self) -> Option<&ListNode> {
        None
    }

    fn as_list_mut(&mut self) -> Option<&mut ListNode> {
        None
    }
}

/// Polymorphic deep clone. Implemented for every `Node + Clone`.
pub trait NodeClone {
    fn clone_node(&self) -> Box<dyn Node>;
}

impl<T: Node + Clone> NodeClone for T {
    fn clone_node(&self) -> Box<dyn Node> {
        Box::new(self.clone())
    }
}

/// Polymorphic structural equality. Nodes of different concrete types are
/// never equal.
pub trait NodeEq {
    fn eq_node(&self, other: &dyn Node) -> bool;
}

impl<T: Node + PartialEq> NodeEq for T {
    fn eq_node(&self, other: &dyn Node) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

impl dyn Node {
    pub fn is<T: Node>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Node>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }

    /// Checked downcast; `location` names the field or item for the error.
    pub fn try_downcast_ref<T: Node>(&self, location: impl fmt::Display) -> Result<&T> {
        let found = self.node_type_name();
        self.downcast_ref::<T>().ok_or_else(|| {
            Error::type_mismatch(location.to_string(), std::any::type_name::<T>(), found)
        })
    }

    pub fn try_downcast_mut<T: Node>(&mut self, location: impl fmt::Display) -> Result<&mut T> {
        let found = self.node_type_name();
        self.downcast_mut::<T>().ok_or_else(|| {
            Error::type_mismatch(location.to_string(), std::any::type_name::<T>(), found)
        })
    }

    /// Walk `path` from this node. `None` when any segment does not resolve.
    pub fn resolve(&self, path: &NodePath) -> Option<&dyn Node> {
        path.segments().iter().try_fold(self, |node, segment| match segment {
            Segment::Key(key) => node.as_composite()?.find(key.as_str()),
            Segment::Index(index) => node.as_list()?.at(*index).ok(),
        })
    }

    pub fn resolve_mut(&mut self, path: &NodePath) -> Option<&mut dyn Node> {
        path.segments().iter().try_fold(self, |node, segment| match segment {
            Segment::Key(key) => node.as_composite_mut()?.find_mut(key.as_str()),
            Segment::Index(index) => node.as_list_mut()?.at_mut(*index).ok(),
        })
    }
}

impl Clone for Box<dyn Node> {
    fn clone(&self) -> Self {
        (**self).clone_node()
    }
}

impl PartialEq for dyn Node {
    fn eq(&self, other: &Self) -> bool {
        self.eq_node(other)
    }
}

// ============================================================================
// Key
// ============================================================================

/// Key of an entry in a [`CompositeNode`].
///
/// Declared properties use `&'static str` keys, which are stored without
/// allocating; keys built at runtime are owned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(Cow<'static, str>);

impl Key {
    pub const fn from_static(key: &'static str) -> Self {
        Key(Cow::Borrowed(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Key {
    fn from(key: &'static str) -> Self {
        Key(Cow::Borrowed(key))
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Key(Cow::Owned(key))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}
