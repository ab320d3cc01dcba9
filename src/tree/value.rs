//! Scalar leaf nodes.

use std::fmt;

use super::Node;

/// Types that can live in a [`ValueNode`].
///
/// Blanket-implemented: anything default-constructible, comparable, cloneable
/// and thread-safe qualifies (integers, floats, `String`, `bool`, ...).
pub trait Value: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> Value for T where T: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// A leaf holding exactly one value, default-constructed until set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueNode<T> {
    value: T,
}

impl<T: Value> ValueNode<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Replace the stored value in place.
    pub fn set(&mut self, value: impl Into<T>) {
        self.value = value.into();
    }

    /// Replace the stored value, returning the previous one.
    pub fn replace(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Value> Node for ValueNode<T> {}

impl<T: Value> From<T> for ValueNode<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Value + fmt::Display> fmt::Display for ValueNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
