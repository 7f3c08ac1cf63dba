//! Values, services and the definitions stored under a key.

use crate::container::Container;
use crate::error::{ContainerError, Result};
use std::any::{type_name, Any};
use std::fmt;
use std::rc::{Rc, Weak};

/// A resolved value. Identity is the `Rc` allocation, compare with `Rc::ptr_eq`.
pub type Value = Rc<dyn Any>;

pub(crate) type ServiceFn = dyn Fn(&Container) -> Result<Value>;

/// A deferred computation producing a [`Value`] from the container.
///
/// Cloning a `Service` does not copy the closure: every clone shares the same
/// identity, and therefore the same factory/protected flags inside a
/// container.
#[derive(Clone)]
pub struct Service(Rc<ServiceFn>);

impl Service {
  /// Wraps a closure whose output is boxed into a fresh [`Value`] on every call.
  pub fn new<T, F>(f: F) -> Self
  where
    T: Any,
    F: Fn(&Container) -> Result<T> + 'static,
  {
    Service(Rc::new(move |container: &Container| {
      f(container).map(|value| Rc::new(value) as Value)
    }))
  }

  /// Wraps a closure that already produces a type-erased [`Value`].
  ///
  /// Useful when the closure hands out an existing `Rc` and the identity of
  /// that allocation matters.
  pub fn from_value_fn<F>(f: F) -> Self
  where
    F: Fn(&Container) -> Result<Value> + 'static,
  {
    Service(Rc::new(f))
  }

  /// Invokes the service with `container`.
  pub fn call(&self, container: &Container) -> Result<Value> {
    (self.0)(container)
  }

  /// Invokes the service and downcasts its output.
  ///
  /// `key` is only used to label a [`ContainerError::DowncastFailed`].
  pub fn call_as<T: Any>(&self, container: &Container, key: &str) -> Result<Rc<T>> {
    downcast(self.call(container)?, key)
  }

  /// Returns `true` if both handles point at the same closure.
  pub fn ptr_eq(&self, other: &Service) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }

  pub(crate) fn downgrade(&self) -> Weak<ServiceFn> {
    Rc::downgrade(&self.0)
  }

  /// Address of the shared closure, used as the identity key.
  pub(crate) fn address(&self) -> usize {
    Rc::as_ptr(&self.0) as *const () as usize
  }
}

impl fmt::Debug for Service {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Service({:#x})", self.address())
  }
}

/// What is stored under a key: a plain parameter or a callable service.
#[derive(Clone)]
pub enum Definition {
  Value(Value),
  Service(Service),
}

impl Definition {
  /// A plain parameter.
  pub fn value<T: Any>(value: T) -> Self {
    Definition::Value(Rc::new(value))
  }

  /// A service built from a closure, see [`Service::new`].
  pub fn service<T, F>(f: F) -> Self
  where
    T: Any,
    F: Fn(&Container) -> Result<T> + 'static,
  {
    Definition::Service(Service::new(f))
  }

  pub fn is_callable(&self) -> bool {
    matches!(self, Definition::Service(_))
  }

  pub fn as_value(&self) -> Option<&Value> {
    match self {
      Definition::Value(value) => Some(value),
      Definition::Service(_) => None,
    }
  }

  pub fn as_service(&self) -> Option<&Service> {
    match self {
      Definition::Service(service) => Some(service),
      Definition::Value(_) => None,
    }
  }

  /// Downcasts a parameter or resolved value.
  ///
  /// Fails with [`ContainerError::DowncastFailed`] when the definition is a
  /// service or holds another type.
  pub fn downcast<T: Any>(self, key: &str) -> Result<Rc<T>> {
    match self {
      Definition::Value(value) => downcast(value, key),
      Definition::Service(_) => Err(ContainerError::DowncastFailed {
        key: key.to_owned(),
        expected: type_name::<T>(),
      }),
    }
  }
}

impl From<Service> for Definition {
  fn from(service: Service) -> Self {
    Definition::Service(service)
  }
}

impl From<Value> for Definition {
  fn from(value: Value) -> Self {
    Definition::Value(value)
  }
}

impl fmt::Debug for Definition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Definition::Value(_) => f.write_str("Value(..)"),
      Definition::Service(service) => service.fmt(f),
    }
  }
}

pub(crate) fn downcast<T: Any>(value: Value, key: &str) -> Result<Rc<T>> {
  value.downcast::<T>().map_err(|_| ContainerError::DowncastFailed {
    key: key.to_owned(),
    expected: type_name::<T>(),
  })
}
