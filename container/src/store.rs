//! The key -> slot mapping behind a container.

use crate::definition::{Definition, Service, Value};
use indexmap::IndexMap;

/// State of a single registry entry.
#[derive(Clone)]
pub(crate) enum Slot {
  /// A plain parameter, returned as is.
  Parameter(Value),
  /// A service that has not been memoized. Factories and protected services
  /// stay here forever.
  Pending(Service),
  /// A service resolved once through the plain path. The key is frozen and
  /// `original` is what `raw` hands out.
  Resolved { value: Value, original: Service },
}

impl Slot {
  pub(crate) fn is_frozen(&self) -> bool {
    matches!(self, Slot::Resolved { .. })
  }
}

impl From<Definition> for Slot {
  fn from(definition: Definition) -> Self {
    match definition {
      Definition::Value(value) => Slot::Parameter(value),
      Definition::Service(service) => Slot::Pending(service),
    }
  }
}

/// Insertion-ordered definitions. Rewriting an existing key keeps its position.
#[derive(Default)]
pub(crate) struct DefinitionStore {
  slots: IndexMap<String, Slot>,
}

impl DefinitionStore {
  pub(crate) fn get(&self, key: &str) -> Option<&Slot> {
    self.slots.get(key)
  }

  pub(crate) fn contains(&self, key: &str) -> bool {
    self.slots.contains_key(key)
  }

  pub(crate) fn is_frozen(&self, key: &str) -> bool {
    self.slots.get(key).is_some_and(Slot::is_frozen)
  }

  pub(crate) fn insert(&mut self, key: &str, definition: Definition) {
    self.slots.insert(key.to_owned(), definition.into());
  }

  pub(crate) fn resolve(&mut self, key: &str, value: Value, original: Service) {
    self
      .slots
      .insert(key.to_owned(), Slot::Resolved { value, original });
  }

  pub(crate) fn remove(&mut self, key: &str) -> Option<Slot> {
    self.slots.shift_remove(key)
  }

  pub(crate) fn keys(&self) -> Vec<String> {
    self.slots.keys().cloned().collect()
  }

  pub(crate) fn len(&self) -> usize {
    self.slots.len()
  }
}
