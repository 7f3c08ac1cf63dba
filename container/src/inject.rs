//! Positional arguments handed to services registered with
//! [`Container::inject`](crate::Container::inject).

use crate::definition::{Definition, Service};
use crate::error::{ContainerError, Result};
use std::any::{type_name, Any};
use std::rc::Rc;

/// Dependencies resolved for an injected service, in the order they were
/// listed at registration.
#[derive(Debug, Clone)]
pub struct Injected {
  owner: String,
  names: Rc<[String]>,
  resolved: Vec<Definition>,
}

impl Injected {
  pub(crate) fn new(owner: &str, names: Rc<[String]>, resolved: Vec<Definition>) -> Self {
    Self {
      owner: owner.to_owned(),
      names,
      resolved,
    }
  }

  pub fn len(&self) -> usize {
    self.resolved.len()
  }

  pub fn is_empty(&self) -> bool {
    self.resolved.is_empty()
  }

  /// Dependency keys, in argument order.
  pub fn names(&self) -> &[String] {
    &self.names
  }

  pub fn definition(&self, index: usize) -> Option<&Definition> {
    self.resolved.get(index)
  }

  /// Downcasts the argument at `index`.
  pub fn value<T: Any>(&self, index: usize) -> Result<Rc<T>> {
    let (name, definition) = self.argument(index)?;
    definition.clone().downcast(name)
  }

  /// The argument at `index` if it resolved to a (protected) service.
  pub fn service(&self, index: usize) -> Result<Service> {
    match self.argument(index)? {
      (_, Definition::Service(service)) => Ok(service.clone()),
      (name, Definition::Value(_)) => Err(ContainerError::DowncastFailed {
        key: name.to_owned(),
        expected: type_name::<Service>(),
      }),
    }
  }

  fn argument(&self, index: usize) -> Result<(&str, &Definition)> {
    match (self.names.get(index), self.resolved.get(index)) {
      (Some(name), Some(definition)) => Ok((name.as_str(), definition)),
      _ => Err(ContainerError::MissingArgument {
        key: self.owner.clone(),
        index,
      }),
    }
  }
}
