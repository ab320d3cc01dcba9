//! Serialized cross-thread access to one model tree.
//!
//! Trees and properties are single-owner structures with no internal
//! locking. When several threads need the same tree, wrap its root in a
//! [`SharedTree`]: one mutex per top-level tree, held for the lifetime of
//! whatever properties are created under the guard.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

/// An `Arc`-shared, mutex-guarded tree root. Cloning shares the same tree.
#[derive(Debug, Default)]
pub struct SharedTree<M> {
    inner: Arc<Mutex<M>>,
}

impl<M> SharedTree<M> {
    pub fn new(root: M) -> Self {
        Self { inner: Arc::new(Mutex::new(root)) }
    }

    /// Block until the tree is free, then borrow it exclusively.
    pub fn lock(&self) -> MutexGuard<'_, M> {
        self.inner.lock()
    }

    pub fn try_lock(&self) -> Option<MutexGuard<'_, M>> {
        self.inner.try_lock()
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// The root, if this is the last handle.
    pub fn into_inner(self) -> Result<M, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<M> Clone for SharedTree<M> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}
