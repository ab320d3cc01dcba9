//! Scalar field accessors.

use std::ops::Deref;

use super::Property;
use crate::tree::{CompositeNode, Value, ValueNode};
use crate::Result;

/// Property whose backing node is a `ValueNode<T>`.
pub type ValueProperty<O, T> = Property<O, ValueNode<T>>;

impl<'a, T: Value> Property<&'a CompositeNode, ValueNode<T>> {
    /// The stored value; `NotPresent` when absent.
    pub fn value(&self) -> Result<&'a T> {
        self.get().map(ValueNode::get)
    }

    pub fn value_if_present(&self) -> Result<Option<&'a T>> {
        Ok(self.get_if_present()?.map(ValueNode::get))
    }

    /// True when present and equal to `value`; a mistyped field is an error.
    pub fn holds(&self, value: &T) -> Result<bool> {
        Ok(self.value_if_present()? == Some(value))
    }
}

impl<'a, T: Value> Property<&'a mut CompositeNode, ValueNode<T>> {
    pub fn value(&self) -> Result<&T> {
        self.get().map(ValueNode::get)
    }

    pub fn value_if_present(&self) -> Result<Option<&T>> {
        Ok(self.get_if_present()?.map(ValueNode::get))
    }

    pub fn holds(&self, value: &T) -> Result<bool> {
        Ok(self.value_if_present()? == Some(value))
    }

    /// Materialize and set in one step.
    pub fn set(&mut self, value: impl Into<T>) -> Result<()> {
        self.ensure()?.set(value);
        Ok(())
    }

    /// Copy `other`'s value when present; clear this field when it is absent.
    pub fn assign_from<O2>(&mut self, other: &Property<O2, ValueNode<T>>) -> Result<()>
    where
        O2: Deref<Target = CompositeNode>,
    {
        match other.peek()? {
            Some(node) => self.set(node.get().clone()),
            None => {
                self.clear();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_set_materializes_field() {
        let mut owner = CompositeNode::new();
        let mut prop = ValueProperty::<_, i64>::new(&mut owner, "n");
        assert!(!prop.is_present());

        prop.set(42).unwrap();
        assert!(prop.is_present());
        assert_eq!(prop.value().unwrap(), &42);
        assert_eq!(owner.len(), 1);
    }

    #[test]
    fn test_value_of_absent_field() {
        let owner = CompositeNode::new();
        let prop = ValueProperty::<_, String>::new(&owner, "name");
        assert!(matches!(prop.value(), Err(Error::NotPresent { .. })));
        assert_eq!(prop.value_if_present().unwrap(), None);
        assert!(!prop.holds(&String::new()).unwrap());
    }

    #[test]
    fn test_value_outlives_read_only_handle() {
        let mut owner = CompositeNode::new();
        ValueProperty::<_, String>::new(&mut owner, "name").set("kept").unwrap();

        let name = ValueProperty::<_, String>::new(&owner, "name").value().unwrap();
        assert_eq!(name, "kept");
    }

    #[test]
    fn test_holds_on_mistyped_field_is_error() {
        let mut owner = CompositeNode::new();
        owner.insert("n", Box::new(ValueNode::new(String::from("7"))));

        let prop = ValueProperty::<_, i32>::new(&owner, "n");
        assert!(matches!(prop.holds(&7), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_assign_from_copies_or_clears() {
        let mut src = CompositeNode::new();
        let mut dst = CompositeNode::new();

        ValueProperty::<_, String>::new(&mut src, "name").set("alpha").unwrap();
        ValueProperty::<_, String>::new(&mut dst, "name")
            .assign_from(&ValueProperty::<_, String>::new(&src, "name"))
            .unwrap();
        assert!(ValueProperty::<_, String>::new(&dst, "name").holds(&"alpha".to_string()).unwrap());

        let empty = CompositeNode::new();
        ValueProperty::<_, String>::new(&mut dst, "name")
            .assign_from(&ValueProperty::<_, String>::new(&empty, "name"))
            .unwrap();
        assert!(dst.is_empty());
    }
}
