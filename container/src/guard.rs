//! Cycle detection for reentrant resolution.

use crate::error::{ContainerError, Result};
use std::cell::RefCell;

/// An RAII guard marking a key as being resolved.
///
/// Entering a key that is already on the container's resolution stack means a
/// service (transitively) depends on itself, and is reported as
/// [`ContainerError::CyclicDependency`] instead of recursing until the stack
/// overflows. Dropping the guard pops the key again, also when the service
/// failed or panicked.
pub(crate) struct ResolutionGuard<'a> {
  stack: &'a RefCell<Vec<String>>,
}

impl<'a> ResolutionGuard<'a> {
  pub(crate) fn enter(stack: &'a RefCell<Vec<String>>, key: &str) -> Result<Self> {
    let mut resolving = stack.borrow_mut();
    if let Some(start) = resolving.iter().position(|k| k == key) {
      let mut chain: Vec<String> = resolving[start..].to_vec();
      chain.push(key.to_owned());
      tracing::warn!(key, chain = ?chain, "Circular dependency detected");
      return Err(ContainerError::CyclicDependency {
        key: key.to_owned(),
        chain,
      });
    }
    resolving.push(key.to_owned());
    Ok(Self { stack })
  }
}

impl Drop for ResolutionGuard<'_> {
  fn drop(&mut self) {
    self.stack.borrow_mut().pop();
  }
}
