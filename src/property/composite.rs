//! Nested model accessors.

use super::Property;

/// Property whose backing node is itself a composite-backed model `M`.
///
/// Same contract as [`Property`]; `ensure()` yields a fully typed `&mut M`
/// whose own properties can be navigated in turn.
pub type CompositeProperty<O, M> = Property<O, M>;
