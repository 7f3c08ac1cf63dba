use crate::container::Container;
use crate::definition::Definition;
use crate::error::Result;
use crate::lifecycle::{CompileHooks, LifecycleConfig};

use core::fmt;
use std::cell::RefCell;

/// A builder for creating a [`Container`] with initial definitions, lifecycle
/// flags and compile listeners in place before first use.
#[derive(Default)]
pub struct ContainerBuilder {
  definitions: Vec<(String, Definition)>,
  config: LifecycleConfig,
  hooks: CompileHooks,
}

impl fmt::Debug for ContainerBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContainerBuilder")
      .field("definitions", &self.definitions.len())
      .field("config", &self.config)
      .field("hooks", &self.hooks)
      .finish()
  }
}

impl ContainerBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an initial definition. Initial definitions are stored in the given
  /// order before the `locked` flag takes effect.
  pub fn definition(mut self, key: impl Into<String>, definition: impl Into<Definition>) -> Self {
    self.definitions.push((key.into(), definition.into()));
    self
  }

  pub fn definitions<I, K, D>(mut self, definitions: I) -> Self
  where
    I: IntoIterator<Item = (K, D)>,
    K: Into<String>,
    D: Into<Definition>,
  {
    self.definitions.extend(
      definitions
        .into_iter()
        .map(|(key, definition)| (key.into(), definition.into())),
    );
    self
  }

  /// Replaces the lifecycle flags.
  pub fn config(mut self, config: LifecycleConfig) -> Self {
    self.config = config;
    self
  }

  pub fn instantiate(mut self, instantiate: bool) -> Self {
    self.config.instantiate = instantiate;
    self
  }

  pub fn locked(mut self, locked: bool) -> Self {
    self.config.locked = locked;
    self
  }

  pub fn on_compile_pre<F>(mut self, listener: F) -> Self
  where
    F: Fn(&Container) -> Result<()> + 'static,
  {
    self.hooks.on_compile_pre(listener);
    self
  }

  pub fn on_compile_post<F>(mut self, listener: F) -> Self
  where
    F: Fn(&Container) -> Result<()> + 'static,
  {
    self.hooks.on_compile_post(listener);
    self
  }

  /// Hands the lifecycle flags and the compile hooks to a composition root.
  ///
  /// `controller` runs immediately, before the container exists, so it can
  /// disable instantiation and subscribe to compile events up front.
  pub fn controller<F>(mut self, controller: F) -> Self
  where
    F: FnOnce(&mut LifecycleConfig, &mut CompileHooks),
  {
    controller(&mut self.config, &mut self.hooks);
    self
  }

  /// Creates the container. Fails if an initial definition has an invalid key.
  pub fn build(self) -> Result<Container> {
    let ContainerBuilder {
      definitions,
      config,
      hooks,
    } = self;

    let container = Container {
      hooks: RefCell::new(hooks),
      ..Container::default()
    };
    for (key, definition) in definitions {
      container.set(&key, definition)?;
    }
    container.config.set(config);

    tracing::debug!(
      definitions = container.len(),
      instantiate = config.instantiate,
      locked = config.locked,
      "Built container"
    );
    Ok(container)
  }
}
