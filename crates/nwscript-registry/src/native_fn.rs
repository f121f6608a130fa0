//! Native function storage.

use std::fmt;
use std::sync::Arc;

use nwscript_core::NativeError;

use crate::FunctionContext;

type Callback<H> =
    dyn Fn(&mut H, &mut FunctionContext<'_>) -> Result<(), NativeError> + Send + Sync;

/// Type-erased native engine function.
///
/// The callback receives the host runtime explicitly (there is no global
/// state to reach for) and the per-call [`FunctionContext`]. The inner
/// callable is shared through an `Arc` so a binding can be cloned out of the
/// registry before the host is borrowed mutably for the call.
pub struct NativeFn<H> {
    inner: Arc<Callback<H>>,
}

impl<H> NativeFn<H> {
    /// Wrap a callable.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut H, &mut FunctionContext<'_>) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call this native function.
    pub fn call(&self, host: &mut H, ctx: &mut FunctionContext<'_>) -> Result<(), NativeError> {
        (self.inner)(host, ctx)
    }
}

impl<H> Clone for NativeFn<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H> fmt::Debug for NativeFn<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}
