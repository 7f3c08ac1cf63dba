//! Lifecycle flags and the two-phase compile events.
//!
//! A composition root typically disables instantiation while independent
//! modules register their definitions, lets every module adjust definitions
//! in a `compile.pre` listener, and then wires instantiated services together
//! in `compile.post` listeners once instantiation is enabled again.

use crate::container::Container;
use crate::error::Result;
use crate::events::{emit_all, EventEmitter};
use serde::{Deserialize, Serialize};

/// Event fired by [`Compiler::emit_compile`] before instantiation is enabled.
pub const COMPILE_PRE: &str = "compile.pre";
/// Event fired by [`Compiler::emit_compile`] after instantiation is enabled.
pub const COMPILE_POST: &str = "compile.post";

/// Flags gating what a container may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
  /// When `false`, unresolved, unprotected services can be neither resolved
  /// nor fetched raw. Parameters stay readable.
  pub instantiate: bool,
  /// When `true`, `set`, `unset` and `extend` fail for every key.
  pub locked: bool,
}

impl Default for LifecycleConfig {
  fn default() -> Self {
    Self {
      instantiate: true,
      locked: false,
    }
  }
}

/// Registered compile listeners.
#[derive(Debug, Default)]
pub struct CompileHooks {
  events: EventEmitter<Container>,
}

impl CompileHooks {
  /// Registers a listener for the phase that runs with instantiation still in
  /// whatever state the caller left it.
  pub fn on_compile_pre<F>(&mut self, listener: F) -> &mut Self
  where
    F: Fn(&Container) -> Result<()> + 'static,
  {
    self.events.on(COMPILE_PRE, listener);
    self
  }

  /// Registers a listener for the phase that runs with instantiation enabled.
  pub fn on_compile_post<F>(&mut self, listener: F) -> &mut Self
  where
    F: Fn(&Container) -> Result<()> + 'static,
  {
    self.events.on(COMPILE_POST, listener);
    self
  }

  pub fn events(&self) -> &EventEmitter<Container> {
    &self.events
  }
}

/// Handle on a container's compile events, see [`Container::compiler`].
pub struct Compiler<'a> {
  pub(crate) container: &'a Container,
}

impl Compiler<'_> {
  pub fn on_compile_pre<F>(&self, listener: F) -> &Self
  where
    F: Fn(&Container) -> Result<()> + 'static,
  {
    self.container.hooks.borrow_mut().on_compile_pre(listener);
    self
  }

  pub fn on_compile_post<F>(&self, listener: F) -> &Self
  where
    F: Fn(&Container) -> Result<()> + 'static,
  {
    self.container.hooks.borrow_mut().on_compile_post(listener);
    self
  }

  /// Runs the compile sequence.
  ///
  /// Fires every `compile.pre` listener, enables instantiation, then fires
  /// every `compile.post` listener. Listeners registered while the sequence
  /// runs are not part of it. The first failing listener aborts the sequence.
  pub fn emit_compile(&self) -> Result<()> {
    let container = self.container;

    let pre = container.hooks.borrow().events.listeners(COMPILE_PRE);
    tracing::debug!(listeners = pre.len(), "Running compile pre phase");
    emit_all(&pre, container)?;

    container.set_instantiate(true);

    let post = container.hooks.borrow().events.listeners(COMPILE_POST);
    tracing::debug!(listeners = post.len(), "Running compile post phase");
    emit_all(&post, container)
  }
}
