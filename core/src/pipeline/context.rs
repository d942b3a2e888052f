// listshare/src/pipeline/context.rs
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable state threaded through every step of a pipeline run.
///
/// Cloning is cheap and yields another handle to the same state. Guards are
/// blocking locks and must be dropped before any `.await`.
#[derive(Debug)]
pub struct PipelineCtx<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> PipelineCtx<T> {
  pub fn new(data: T) -> Self {
    PipelineCtx(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Reads a projection of the state without holding the guard any longer
  /// than the closure.
  pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
    f(&self.0.read())
  }
}

impl<T: Send + Sync + 'static> Clone for PipelineCtx<T> {
  fn clone(&self) -> Self {
    PipelineCtx(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for PipelineCtx<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}
