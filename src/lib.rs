//! # model-tree: Typed Facades over a Dynamically-Keyed Tree
//!
//! A generic tree of heterogeneous nodes (composites, lists, scalar leaves)
//! plus a typed accessor layer ("properties") for navigating it. Model types
//! are thin facades over a [`CompositeNode`]; each declared field is a
//! property bound to `(owner, key)` that materializes its storage on first
//! write.
//!
//! ## Design Principles
//!
//! 1. **The tree owns everything**: composites and lists exclusively own their
//!    children; properties only borrow their owner
//! 2. **Presence is derived**: a field exists iff its key is in the owner's map
//! 3. **Explicit materialization**: `get()` never mutates, `ensure()` may
//! 4. **Checked downcasts**: a stored node of the wrong type is an `Err`, never
//!    a silent `None`
//!
//! ## Quick Start
//!
//! ```rust
//! use model_tree::model;
//!
//! model! {
//!     /// A field declaration.
//!     pub struct Field {
//!         name / name_mut: value(String),
//!         size / size_mut: value(u32),
//!     }
//! }
//!
//! model! {
//!     pub struct Record {
//!         title / title_mut: value(String),
//!         fields / fields_mut: composites(Field),
//!     }
//! }
//!
//! # fn main() -> model_tree::Result<()> {
//! let mut record = Record::new();
//! assert!(!record.title().is_present());
//!
//! record.title_mut().set("Header")?;
//! record.fields_mut().ensure(1)?.size_mut().set(8u32)?;
//!
//! assert_eq!(record.fields().len(), 2);
//! assert_eq!(record.len(), 2);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod tree;
pub mod property;
pub mod model;
pub mod shared;

// ============================================================================
// Re-exports: Tree
// ============================================================================

pub use tree::{
    Node, Key, Value, ValueNode, ListNode, CompositeNode,
    NodePath, Segment,
};

// ============================================================================
// Re-exports: Properties
// ============================================================================

pub use property::{
    Property, PropertyRef, PropertyMut,
    ValueProperty, CompositeProperty,
    ListProperty, ValuesListProperty, CompositesListProperty,
    ReferenceProperty, ReferencesListProperty,
};

// ============================================================================
// Re-exports: Models and sharing
// ============================================================================

pub use model::Model;
pub use shared::SharedTree;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Property not present in the owning composite: {key}")]
    NotPresent { key: String },

    #[error("Unexpected node type at {location}: expected {expected}, found {found}")]
    TypeMismatch {
        location: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Index {index} out of range for list of length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Cannot access null reference property: {key}")]
    NullReference { key: String },

    #[error("Reference {key} points to '{path}', which no longer resolves")]
    DanglingReference { key: String, path: String },

    #[error("Node is not an element of list property {key}")]
    NotAnElement { key: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl Error {
    /// Build a `TypeMismatch` and log it. A mismatch means the tree no longer
    /// matches the model declared over it.
    pub(crate) fn type_mismatch(
        location: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        let location = location.into();
        tracing::error!(%location, expected, found, "unexpected node type");
        Error::TypeMismatch { location, expected, found }
    }

    /// True for errors that indicate a corrupted model rather than a normal
    /// absent/out-of-range branch.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. } | Error::DanglingReference { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
