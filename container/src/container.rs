//! The main `Container` struct and its associated methods.

use crate::builder::ContainerBuilder;
use crate::definition::{Definition, Service};
use crate::error::{ContainerError, Result};
use crate::guard::ResolutionGuard;
use crate::identity::{CallableTag, IdentityTagger};
use crate::inject::Injected;
use crate::lifecycle::{CompileHooks, Compiler, LifecycleConfig};
use crate::store::{DefinitionStore, Slot};
use crate::tags::{TagAssociation, TagConfig, TagRegistry};

use std::any::{type_name, Any};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Key reported by `factory`/`protect` when handed a plain value, which has
/// no key yet.
const ANONYMOUS: &str = "<anonymous>";

/// A lazy registry of parameters and services.
///
/// Every method takes `&self`: services receive the container while it is
/// resolving them and may resolve, or even define, other keys. No internal
/// borrow is held while user code runs.
///
/// The container is single-threaded (`!Send`, `!Sync`).
#[derive(Default)]
pub struct Container {
  pub(crate) store: RefCell<DefinitionStore>,
  pub(crate) identities: RefCell<IdentityTagger>,
  pub(crate) tags: RefCell<TagRegistry>,
  pub(crate) config: Cell<LifecycleConfig>,
  pub(crate) hooks: RefCell<CompileHooks>,
  pub(crate) resolving: RefCell<Vec<String>>,
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let store = self.store.borrow();
    let mut map = f.debug_map();
    for key in store.keys() {
      let state = match store.get(&key) {
        Some(Slot::Parameter(_)) => "parameter",
        Some(Slot::Pending(_)) => "service",
        Some(Slot::Resolved { .. }) => "resolved",
        None => continue,
      };
      map.entry(&key, &state);
    }
    map.finish()
  }
}

impl Container {
  /// Creates a new, empty `Container` with the default lifecycle flags.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  /// Creates a container pre-populated with `definitions`, in order.
  pub fn with_definitions<I, K, D>(definitions: I) -> Result<Self>
  where
    I: IntoIterator<Item = (K, D)>,
    K: Into<String>,
    D: Into<Definition>,
  {
    ContainerBuilder::new().definitions(definitions).build()
  }

  // --- Lifecycle ---

  pub fn config(&self) -> LifecycleConfig {
    self.config.get()
  }

  pub fn set_instantiate(&self, instantiate: bool) {
    self.update_config(|config| config.instantiate = instantiate);
  }

  pub fn set_locked(&self, locked: bool) {
    self.update_config(|config| config.locked = locked);
  }

  /// Shorthand for `set_locked(true)`.
  pub fn lock(&self) {
    self.set_locked(true);
  }

  /// Handle on the compile events of this container.
  pub fn compiler(&self) -> Compiler<'_> {
    Compiler { container: self }
  }

  fn update_config(&self, update: impl FnOnce(&mut LifecycleConfig)) {
    let mut config = self.config.get();
    update(&mut config);
    tracing::debug!(
      instantiate = config.instantiate,
      locked = config.locked,
      "Lifecycle changed"
    );
    self.config.set(config);
  }

  fn ensure_unlocked(&self, key: &str) -> Result<()> {
    if self.config.get().locked {
      return Err(ContainerError::LockedContainer {
        key: key.to_owned(),
      });
    }
    Ok(())
  }

  fn slot(&self, key: &str) -> Result<Slot> {
    self
      .store
      .borrow()
      .get(key)
      .cloned()
      .ok_or_else(|| ContainerError::UndefinedService {
        key: key.to_owned(),
      })
  }

  // --- Definitions ---

  /// Stores `definition` under `key`, replacing any unfrozen definition.
  pub fn set(&self, key: &str, definition: impl Into<Definition>) -> Result<&Self> {
    if key.is_empty() {
      return Err(ContainerError::InvalidKey {
        key: key.to_owned(),
      });
    }
    self.ensure_unlocked(key)?;

    let definition = definition.into();
    let mut store = self.store.borrow_mut();
    if store.is_frozen(key) {
      return Err(ContainerError::FrozenOverwrite {
        key: key.to_owned(),
      });
    }
    tracing::debug!(key, callable = definition.is_callable(), "Defined");
    store.insert(key, definition);
    Ok(self)
  }

  /// `true` if `key` has a definition, resolved or not.
  pub fn exists(&self, key: &str) -> bool {
    self.store.borrow().contains(key)
  }

  /// Removes the definition of `key`. Unknown keys are ignored.
  ///
  /// The factory and protected flags of the removed service are cleared as
  /// well, which also affects any other key holding the same service.
  pub fn unset(&self, key: &str) -> Result<&Self> {
    self.ensure_unlocked(key)?;

    let mut store = self.store.borrow_mut();
    match store.get(key) {
      None => return Ok(self),
      Some(Slot::Resolved { .. }) => {
        return Err(ContainerError::FrozenOverwrite {
          key: key.to_owned(),
        })
      }
      Some(Slot::Pending(service)) => self.identities.borrow_mut().clear(service),
      Some(Slot::Parameter(_)) => {}
    }
    let removed = store.remove(key);
    drop(store);
    drop(removed);
    self.identities.borrow_mut().prune();

    tracing::debug!(key, "Removed");
    Ok(self)
  }

  /// Snapshot of the defined keys, in insertion order.
  pub fn keys(&self) -> Vec<String> {
    self.store.borrow().keys()
  }

  pub fn len(&self) -> usize {
    self.store.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  // --- Callable flags ---

  /// Marks a service so that every resolution invokes it again.
  ///
  /// The flag belongs to the service itself: every key holding a clone of it
  /// is affected. Returns the definition for chaining into [`Container::set`].
  pub fn factory(&self, definition: impl Into<Definition>) -> Result<Definition> {
    let definition = definition.into();
    let service = callable(&definition)?;
    let tag = self.identities.borrow_mut().mark_factory(service);
    tracing::trace!(%tag, "Marked factory");
    Ok(definition)
  }

  /// Marks a service so that it is handed out as is and never invoked by the
  /// container.
  pub fn protect(&self, definition: impl Into<Definition>) -> Result<Definition> {
    let definition = definition.into();
    let service = callable(&definition)?;
    let tag = self.identities.borrow_mut().mark_protected(service);
    tracing::trace!(%tag, "Marked protected");
    Ok(definition)
  }

  /// The tag of `service`, if it was ever marked in this container.
  pub fn callable_tag(&self, service: &Service) -> Option<CallableTag> {
    self.identities.borrow().tag_of(service)
  }

  // --- Resolution ---

  /// Resolves `key`.
  ///
  /// - Parameters and already resolved values are returned unchanged.
  /// - Protected services are returned uninvoked.
  /// - Factories are invoked on every call and never cached.
  /// - Any other service is invoked once; its value replaces it and the key
  ///   becomes frozen.
  ///
  /// While instantiation is disabled, invoking a service fails with
  /// [`ContainerError::NotInstantiable`].
  pub fn get(&self, key: &str) -> Result<Definition> {
    let service = match self.slot(key)? {
      Slot::Parameter(value) | Slot::Resolved { value, .. } => {
        return Ok(Definition::Value(value));
      }
      Slot::Pending(service) => service,
    };

    let flags = self.identities.borrow().flags(&service);
    if flags.protected {
      return Ok(Definition::Service(service));
    }
    if !self.config.get().instantiate {
      return Err(ContainerError::NotInstantiable {
        key: key.to_owned(),
      });
    }

    if flags.factory {
      tracing::trace!(key, "Invoking factory");
      let _guard = ResolutionGuard::enter(&self.resolving, key)?;
      return service.call(self).map(Definition::Value);
    }

    let value = {
      let _guard = ResolutionGuard::enter(&self.resolving, key)?;
      service.call(self)?
    };
    self
      .store
      .borrow_mut()
      .resolve(key, value.clone(), service);
    tracing::debug!(key, "Resolved service");
    Ok(Definition::Value(value))
  }

  /// Resolves `key` and downcasts the value.
  pub fn get_as<T: Any>(&self, key: &str) -> Result<Rc<T>> {
    self.get(key)?.downcast(key)
  }

  /// Resolves `key` expecting a service, i.e. a protected callable.
  pub fn get_service(&self, key: &str) -> Result<Service> {
    match self.get(key)? {
      Definition::Service(service) => Ok(service),
      Definition::Value(_) => Err(ContainerError::DowncastFailed {
        key: key.to_owned(),
        expected: type_name::<Service>(),
      }),
    }
  }

  /// The definition of `key` as registered.
  ///
  /// For a resolved service this is the original service, not its value.
  /// Fails with [`ContainerError::NotInstantiable`] for an unresolved,
  /// unprotected service while instantiation is disabled.
  pub fn raw(&self, key: &str) -> Result<Definition> {
    match self.slot(key)? {
      Slot::Parameter(value) => Ok(Definition::Value(value)),
      Slot::Resolved { original, .. } => Ok(Definition::Service(original)),
      Slot::Pending(service) => {
        if !self.config.get().instantiate && !self.identities.borrow().flags(&service).protected
        {
          return Err(ContainerError::NotInstantiable {
            key: key.to_owned(),
          });
        }
        Ok(Definition::Service(service))
      }
    }
  }

  // --- Composition ---

  /// Wraps the service stored under `key`.
  ///
  /// The new service calls `f` with the previous service itself, not its
  /// value, and the container; `f` decides whether to invoke it. If the
  /// previous service was a factory, the wrapper takes over the factory flag.
  pub fn extend<T, F>(&self, key: &str, f: F) -> Result<&Self>
  where
    T: Any,
    F: Fn(&Service, &Container) -> Result<T> + 'static,
  {
    let slot = self.slot(key)?;
    self.ensure_unlocked(key)?;
    let Slot::Pending(previous) = slot else {
      return Err(ContainerError::NotCallable {
        key: key.to_owned(),
      });
    };

    let inner = previous.clone();
    let wrapped = Service::new(move |container: &Container| f(&inner, container));

    {
      let mut identities = self.identities.borrow_mut();
      if identities.flags(&previous).factory {
        identities.clear_factory(&previous);
        identities.mark_factory(&wrapped);
      }
    }

    tracing::debug!(key, "Extended service");
    self.set(key, wrapped)
  }

  /// Defines `key` as a service receiving the resolved `injects`, in order.
  ///
  /// At resolution time every dependency must exist, otherwise
  /// [`ContainerError::MissingDependency`] names the first absent one. The
  /// dependencies are then resolved with [`Container::get`] and handed to
  /// `target` positionally.
  pub fn inject<T, F, I, S>(&self, key: &str, target: F, injects: I) -> Result<&Self>
  where
    T: Any,
    F: Fn(&Injected) -> Result<T> + 'static,
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let names: Rc<[String]> = injects.into_iter().map(Into::into).collect();
    let owner = key.to_owned();

    let wrapper = Service::new(move |container: &Container| {
      if let Some(missing) = names.iter().find(|name| !container.exists(name)) {
        return Err(ContainerError::MissingDependency {
          key: owner.clone(),
          dependency: missing.clone(),
        });
      }
      let resolved = names
        .iter()
        .map(|name| container.get(name))
        .collect::<Result<Vec<_>>>()?;
      target(&Injected::new(&owner, Rc::clone(&names), resolved))
    });

    self.set(key, wrapper)
  }

  // --- Tags ---

  /// Associates `key` with the tag `name` and an empty config.
  pub fn tag(&self, key: &str, name: &str) -> &Self {
    self.tag_with(key, name, TagConfig::new())
  }

  /// Associates `key` with the tag `name`. `key` does not need to be defined
  /// and repeated associations are kept.
  pub fn tag_with(&self, key: &str, name: &str, config: TagConfig) -> &Self {
    self.tags.borrow_mut().add(key, name, config);
    self
  }

  /// Associations of tag `name` in registration order, empty if unknown.
  pub fn tagged(&self, name: &str) -> Vec<TagAssociation> {
    self.tags.borrow().tagged(name)
  }

  /// Every tag name used so far, in first-use order.
  pub fn tag_names(&self) -> Vec<String> {
    self.tags.borrow().names()
  }
}

fn callable(definition: &Definition) -> Result<&Service> {
  definition
    .as_service()
    .ok_or_else(|| ContainerError::NotCallable {
      key: ANONYMOUS.to_owned(),
    })
}
