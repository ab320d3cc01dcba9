//! Ordered sequences of owned nodes.

use std::ops::{Index, IndexMut};

use super::Node;
use crate::{Error, Result};

/// An ordered sequence of owned child nodes.
///
/// The list is untyped: elements are `Box<dyn Node>` and may in principle be
/// heterogeneous. List properties use it homogeneously and downcast on access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListNode {
    items: Vec<Box<dyn Node>>,
}

impl ListNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bounds-checked access.
    pub fn at(&self, pos: usize) -> Result<&dyn Node> {
        let len = self.items.len();
        self.items
            .get(pos)
            .map(|item| item.as_ref())
            .ok_or(Error::OutOfRange { index: pos, len })
    }

    pub fn at_mut(&mut self, pos: usize) -> Result<&mut dyn Node> {
        let len = self.items.len();
        self.items
            .get_mut(pos)
            .map(|item| item.as_mut())
            .ok_or(Error::OutOfRange { index: pos, len })
    }

    /// Append, taking ownership. Returns the stored element.
    pub fn add(&mut self, node: Box<dyn Node>) -> &mut dyn Node {
        self.items.push(node);
        let last = self.items.len() - 1;
        self.items[last].as_mut()
    }

    /// Insert at `pos`, shifting the tail. `pos == len()` appends.
    pub fn insert(&mut self, pos: usize, node: Box<dyn Node>) -> Result<&mut dyn Node> {
        if pos > self.items.len() {
            return Err(Error::OutOfRange { index: pos, len: self.items.len() });
        }
        self.items.insert(pos, node);
        Ok(self.items[pos].as_mut())
    }

    /// Remove the element at `pos`, shifting the tail down.
    pub fn erase(&mut self, pos: usize) -> Result<Box<dyn Node>> {
        if pos >= self.items.len() {
            return Err(Error::OutOfRange { index: pos, len: self.items.len() });
        }
        Ok(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Node> {
        self.items.iter().map(|item| item.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut dyn Node> {
        self.items.iter_mut().map(|item| item.as_mut())
    }
}

impl Node for ListNode {
    fn as_list(&self) -> Option<&ListNode> {
        Some(self)
    }

    fn as_list_mut(&mut self) -> Option<&mut ListNode> {
        Some(self)
    }
}

/// Unchecked access: panics when `pos >= len()`, like slice indexing.
impl Index<usize> for ListNode {
    type Output = dyn Node;

    fn index(&self, pos: usize) -> &Self::Output {
        self.items[pos].as_ref()
    }
}

impl IndexMut<usize> for ListNode {
    fn index_mut(&mut self, pos: usize) -> &mut Self::Output {
        self.items[pos].as_mut()
    }
}

impl FromIterator<Box<dyn Node>> for ListNode {
    fn from_iter<I: IntoIterator<Item = Box<dyn Node>>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}
