//! Typed models: named facades over a [`CompositeNode`].
//!
//! A model owns one composite and declares a fixed set of properties against
//! it. Declaring one by hand means a struct wrapping the composite plus a
//! pair of accessors per field; [`model!`](crate::model!) writes all of that.
//!
//! ```rust
//! use model_tree::{model, Model, NodePath};
//!
//! model! {
//!     pub struct Param {
//!         name / name_mut: value(String),
//!     }
//! }
//!
//! model! {
//!     pub struct Method {
//!         name / name_mut: value(String),
//!         params / params_mut: composites(Param),
//!         tags / tags_mut: values(String),
//!         returns / returns_mut: reference(Param),
//!     }
//! }
//!
//! # fn main() -> model_tree::Result<()> {
//! let mut method = Method::new();
//! method.name_mut().set("run")?;
//! method.params_mut().ensure(0)?.name_mut().set("ctx")?;
//! method.tags_mut().push_value("async")?;
//! method.returns_mut().set(NodePath::root().key("params").index(0))?;
//!
//! let param = method.returns().resolve(method.as_node())?;
//! assert_eq!(param.name().value()?, "ctx");
//! # Ok(())
//! # }
//! ```

use crate::tree::{CompositeNode, Node};

/// A composite-backed typed model.
///
/// Models are nodes: they nest as composite fields and list items, and tree
/// walkers see them as composites through [`Node::as_composite`].
pub trait Model: Node + Default + Clone + PartialEq {
    fn composite(&self) -> &CompositeNode;

    fn composite_mut(&mut self) -> &mut CompositeNode;

    /// Wrap an existing composite, e.g. one assembled by a parser.
    fn from_composite(node: CompositeNode) -> Self;

    fn into_composite(self) -> CompositeNode;

    fn as_node(&self) -> &dyn Node {
        self
    }
}

/// Declare a [`Model`].
///
/// Each field is written `getter / getter_mut: kind(Type)`; the property key
/// is the getter's name. `getter(&self)` returns a read-only property,
/// `getter_mut(&mut self)` a materializing one.
///
/// | kind | property |
/// |------|----------|
/// | `value(T)` | [`ValueProperty`](crate::ValueProperty) |
/// | `values(T)` | [`ValuesListProperty`](crate::ValuesListProperty) |
/// | `composite(M)` | [`CompositeProperty`](crate::CompositeProperty) |
/// | `composites(M)` | [`CompositesListProperty`](crate::CompositesListProperty) |
/// | `reference(T)` | [`ReferenceProperty`](crate::ReferenceProperty) |
/// | `references(T)` | [`ReferencesListProperty`](crate::ReferencesListProperty) |
///
/// The generated struct dereferences to its [`CompositeNode`], so `len()`,
/// `is_empty()` and `clear()` act on the whole model.
#[macro_export]
macro_rules! model {
    (@property value, $owner:ty, $ty:ty) => {
        $crate::ValueProperty<$owner, $ty>
    };
    (@property values, $owner:ty, $ty:ty) => {
        $crate::ValuesListProperty<$owner, $ty>
    };
    (@property composite, $owner:ty, $ty:ty) => {
        $crate::CompositeProperty<$owner, $ty>
    };
    (@property composites, $owner:ty, $ty:ty) => {
        $crate::CompositesListProperty<$owner, $ty>
    };
    (@property reference, $owner:ty, $ty:ty) => {
        $crate::ReferenceProperty<$owner, $ty>
    };
    (@property references, $owner:ty, $ty:ty) => {
        $crate::ReferencesListProperty<$owner, $ty>
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident / $field_mut:ident : $kind:ident ( $ty:ty )
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            node: $crate::CompositeNode,
        }

        #[allow(dead_code)]
        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                $(#[$field_meta])*
                pub fn $field(&self) -> $crate::model!(@property $kind, &'_ $crate::CompositeNode, $ty) {
                    <$crate::model!(@property $kind, &'_ $crate::CompositeNode, $ty)>::new(
                        &self.node,
                        $crate::Key::from_static(stringify!($field)),
                    )
                }

                $(#[$field_meta])*
                pub fn $field_mut(&mut self) -> $crate::model!(@property $kind, &'_ mut $crate::CompositeNode, $ty) {
                    <$crate::model!(@property $kind, &'_ mut $crate::CompositeNode, $ty)>::new(
                        &mut self.node,
                        $crate::Key::from_static(stringify!($field)),
                    )
                }
            )*
        }

        impl $crate::Node for $name {
            fn as_composite(&self) -> Option<&$crate::CompositeNode> {
                Some(&self.node)
            }

            fn as_composite_mut(&mut self) -> Option<&mut $crate::CompositeNode> {
                Some(&mut self.node)
            }
        }

        impl $crate::Model for $name {
            fn composite(&self) -> &$crate::CompositeNode {
                &self.node
            }

            fn composite_mut(&mut self) -> &mut $crate::CompositeNode {
                &mut self.node
            }

            fn from_composite(node: $crate::CompositeNode) -> Self {
                Self { node }
            }

            fn into_composite(self) -> $crate::CompositeNode {
                self.node
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::CompositeNode;

            fn deref(&self) -> &Self::Target {
                &self.node
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.node
            }
        }
    };
}
