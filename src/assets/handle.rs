//! Asset Handle System
//!
//! Provides shared, reference-counted handles to assets that may still be
//! loading.
//!
//! # Design Principles
//! - A handle is created `Pending` and resolved exactly once, to `Ready` or `Failed`
//! - Clones share the same state through `Arc`, so every holder observes the resolution
//! - Equality is identity: two handles are equal when they point at the same load

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::AssetError;

/// Lifecycle state of a load.
#[derive(Debug)]
pub enum LoadState<T> {
    Pending,
    Ready(Arc<T>),
    Failed(AssetError),
}

struct HandleInner<T> {
    uri: String,
    state: RwLock<LoadState<T>>,
}

/// Shared handle to a load-once asset.
pub struct AssetHandle<T> {
    inner: Arc<HandleInner<T>>,
}

impl<T> AssetHandle<T> {
    /// Creates an unresolved handle.
    pub fn pending(uri: impl Into<String>) -> Self {
        Self::with_state(uri, LoadState::Pending)
    }

    /// Creates a handle that is already resolved.
    pub fn ready(uri: impl Into<String>, asset: T) -> Self {
        Self::with_state(uri, LoadState::Ready(Arc::new(asset)))
    }

    /// Creates a handle that already failed.
    pub fn failed(uri: impl Into<String>, error: AssetError) -> Self {
        Self::with_state(uri, LoadState::Failed(error))
    }

    fn with_state(uri: impl Into<String>, state: LoadState<T>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                uri: uri.into(),
                state: RwLock::new(state),
            }),
        }
    }

    /// The URI this handle was loaded from.
    #[inline]
    pub fn uri(&self) -> &str {
        &self.inner.uri
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(*self.inner.state.read(), LoadState::Pending)
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(*self.inner.state.read(), LoadState::Ready(_))
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(*self.inner.state.read(), LoadState::Failed(_))
    }

    /// The loaded asset, if the handle resolved successfully.
    pub fn get(&self) -> Option<Arc<T>> {
        match &*self.inner.state.read() {
            LoadState::Ready(asset) => Some(Arc::clone(asset)),
            _ => None,
        }
    }

    /// The load error, if the handle failed.
    pub fn error(&self) -> Option<AssetError> {
        match &*self.inner.state.read() {
            LoadState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Resolves a pending handle. Returns `false` (and leaves the handle
    /// untouched) if it was already resolved.
    pub(crate) fn resolve(&self, result: Result<T, AssetError>) -> bool {
        let mut state = self.inner.state.write();
        if !matches!(*state, LoadState::Pending) {
            return false;
        }
        *state = match result {
            Ok(asset) => LoadState::Ready(Arc::new(asset)),
            Err(err) => LoadState::Failed(err),
        };
        true
    }

    /// Number of live clones of this handle.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.inner.state.read() {
            LoadState::Pending => "pending",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(_) => "failed",
        };
        f.debug_struct("AssetHandle")
            .field("uri", &self.inner.uri)
            .field("state", &state)
            .finish()
    }
}
