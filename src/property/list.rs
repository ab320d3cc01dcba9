//! List field accessors.
//!
//! A list property is backed by a [`ListNode`] stored under its key. Items
//! are downcast to `I` on every access; the list itself stays untyped.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use super::Property;
use crate::tree::{CompositeNode, Key, ListNode, Node, Value, ValueNode};
use crate::{Error, Result};

/// List of scalar items.
pub type ValuesListProperty<O, T> = ListProperty<O, ValueNode<T>>;

/// List of composite-backed model items.
pub type CompositesListProperty<O, M> = ListProperty<O, M>;

/// Typed accessor for a list field whose items are `I`.
///
/// Items are told apart by address, so `I` must not be zero-sized:
///
/// ```compile_fail
/// use model_tree::{CompositeNode, ValuesListProperty};
///
/// let owner = CompositeNode::new();
/// let units = ValuesListProperty::<_, ()>::new(&owner, "units");
/// ```
pub struct ListProperty<O, I> {
    list: Property<O, ListNode>,
    _item: PhantomData<fn() -> I>,
}

/// `key[pos]`, used to locate item-level errors.
struct ItemLocation<'a>(&'a Key, usize);

impl fmt::Display for ItemLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.0, self.1)
    }
}

fn item_at<'a, I: Node>(list: &'a ListNode, key: &Key, pos: usize) -> Result<&'a I> {
    list.at(pos)?.try_downcast_ref::<I>(ItemLocation(key, pos))
}

impl<O, I> ListProperty<O, I>
where
    O: Deref<Target = CompositeNode>,
    I: Node,
{
    pub fn new(owner: O, key: impl Into<Key>) -> Self {
        const {
            assert!(
                std::mem::size_of::<I>() != 0,
                "list items are identified by address and must not be zero-sized"
            )
        };
        Self { list: Property::new(owner, key), _item: PhantomData }
    }

    pub fn key(&self) -> &Key {
        self.list.key()
    }

    pub fn owner(&self) -> &CompositeNode {
        self.list.owner()
    }

    /// Whether the list field itself exists (it may be empty).
    pub fn is_present(&self) -> bool {
        self.list.is_present()
    }

    /// Item count; 0 when the field is absent, `TypeMismatch` when the field
    /// holds something other than a list.
    pub fn try_len(&self) -> Result<usize> {
        Ok(self.list.peek()?.map_or(0, ListNode::len))
    }

    /// Like [`ListProperty::try_len`], but a mistyped field counts as empty.
    /// The mismatch is still logged.
    pub fn len(&self) -> usize {
        self.try_len().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `pos < len()`; false for an absent or mistyped field.
    pub fn is_item_present(&self, pos: usize) -> bool {
        pos < self.len()
    }

    /// Position of `item` in this list, by identity: `item` must be one of
    /// the stored nodes, not merely equal to one.
    pub fn index_of(&self, item: &I) -> Result<usize> {
        self.list
            .peek()?
            .and_then(|list| list.iter().position(|stored| std::ptr::addr_eq(stored, item)))
            .ok_or_else(|| Error::NotAnElement { key: self.key().to_string() })
    }
}

impl<'a, I: Node> ListProperty<&'a CompositeNode, I> {
    /// The backing list; `Ok(None)` when the field is absent.
    pub fn list(&self) -> Result<Option<&'a ListNode>> {
        self.list.get_if_present()
    }

    /// The item at `pos`. `NotPresent` when the field is absent,
    /// `OutOfRange` past the end, `TypeMismatch` for a foreign item.
    pub fn get(&self, pos: usize) -> Result<&'a I> {
        item_at(self.list.get()?, self.key(), pos)
    }

    /// Items in order; empty when the field is absent.
    pub fn iter(&self) -> Result<impl Iterator<Item = Result<&'a I>> + use<'a, I>> {
        let key = self.key().clone();
        let list = self.list()?;
        Ok(list
            .into_iter()
            .flat_map(ListNode::iter)
            .enumerate()
            .map(move |(pos, node)| node.try_downcast_ref::<I>(ItemLocation(&key, pos))))
    }
}

impl<'a, I: Node> ListProperty<&'a mut CompositeNode, I> {
    pub fn list(&self) -> Result<Option<&ListNode>> {
        self.list.get_if_present()
    }

    pub fn get(&self, pos: usize) -> Result<&I> {
        item_at(self.list.get()?, self.key(), pos)
    }

    pub fn iter(&self) -> Result<impl Iterator<Item = Result<&I>>> {
        let key = self.key();
        let list = self.list()?;
        Ok(list
            .into_iter()
            .flat_map(ListNode::iter)
            .enumerate()
            .map(move |(pos, node)| node.try_downcast_ref::<I>(ItemLocation(key, pos))))
    }

    /// Materialize the backing list (empty) if absent.
    pub fn ensure_list(&mut self) -> Result<&mut ListNode> {
        self.list.ensure()
    }

    pub fn get_mut(&mut self, pos: usize) -> Result<&mut I> {
        let key = self.list.key().clone();
        let list = self.list.get_mut()?;
        list.at_mut(pos)?.try_downcast_mut::<I>(ItemLocation(&key, pos))
    }

    /// Append a caller-built item, materializing the list if needed.
    pub fn push(&mut self, item: I) -> Result<&mut I> {
        let key = self.list.key().clone();
        let list = self.list.ensure()?;
        let pos = list.len();
        list.add(Box::new(item)).try_downcast_mut::<I>(ItemLocation(&key, pos))
    }

    /// Insert at `pos` (`pos == len()` appends).
    pub fn insert(&mut self, pos: usize, item: I) -> Result<&mut I> {
        let key = self.list.key().clone();
        let list = self.list.ensure()?;
        list.insert(pos, Box::new(item))?
            .try_downcast_mut::<I>(ItemLocation(&key, pos))
    }

    /// Replace the existing item at `pos` (erase, then insert in place).
    pub fn replace(&mut self, pos: usize, item: I) -> Result<&mut I> {
        let key = self.list.key().clone();
        let list = self.list.get_mut()?;
        list.erase(pos)?;
        list.insert(pos, Box::new(item))?
            .try_downcast_mut::<I>(ItemLocation(&key, pos))
    }

    /// Remove and drop the item at `pos`.
    pub fn remove(&mut self, pos: usize) -> Result<()> {
        self.list.get_mut()?.erase(pos)?;
        Ok(())
    }

    /// Remove the whole list field.
    pub fn clear(&mut self) -> bool {
        self.list.clear()
    }
}

impl<'a, I: Node + Default> ListProperty<&'a mut CompositeNode, I> {
    /// Grow-to-fit: materializes the list and appends default items until
    /// `pos` exists, then returns the item at `pos`. Existing items are
    /// untouched.
    pub fn ensure(&mut self, pos: usize) -> Result<&mut I> {
        let key = self.list.key().clone();
        let list = self.list.ensure()?;
        if pos >= list.len() {
            tracing::trace!(%key, from = list.len(), to = pos + 1, "growing list property");
        }
        while pos >= list.len() {
            list.add(Box::new(I::default()));
        }
        list.at_mut(pos)?.try_downcast_mut::<I>(ItemLocation(&key, pos))
    }
}

impl<'a, T: Value> ListProperty<&'a CompositeNode, ValueNode<T>> {
    pub fn value(&self, pos: usize) -> Result<&'a T> {
        self.get(pos).map(ValueNode::get)
    }
}

impl<'a, T: Value> ListProperty<&'a mut CompositeNode, ValueNode<T>> {
    pub fn value(&self, pos: usize) -> Result<&T> {
        self.get(pos).map(ValueNode::get)
    }

    pub fn push_value(&mut self, value: impl Into<T>) -> Result<()> {
        self.push(ValueNode::new(value.into()))?;
        Ok(())
    }
}

impl<O, I> fmt::Debug for ListProperty<O, I>
where
    O: Deref<Target = CompositeNode>,
    I: Node,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListProperty")
            .field("key", self.key())
            .field("len", &self.len())
            .finish()
    }
}
