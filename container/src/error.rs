use thiserror::Error;

/// Boxed error a service can report through [`ContainerError::Service`].
pub type DynError = Box<dyn std::error::Error + 'static>;

/// The error type for every fallible container operation.
///
/// Each variant carries the key it was raised for so a failure deep inside a
/// chain of resolutions still points at the offending definition.
#[derive(Debug, Error)]
pub enum ContainerError {
  #[error("Service is not defined: {key}")]
  UndefinedService { key: String },

  #[error("Invalid key '{key}': keys must be non-empty strings")]
  InvalidKey { key: String },

  #[error("Cannot overwrite frozen service: {key}")]
  FrozenOverwrite { key: String },

  #[error("Container is locked, cannot change definition of '{key}'")]
  LockedContainer { key: String },

  #[error("Definition of '{key}' is not a callable service")]
  NotCallable { key: String },

  #[error("Service '{key}' depends on '{dependency}' which is not defined")]
  MissingDependency { key: String, dependency: String },

  #[error("Service '{key}' has no injected argument at index {index}")]
  MissingArgument { key: String, index: usize },

  #[error("Container is not allowed to instantiate service '{key}' yet")]
  NotInstantiable { key: String },

  #[error("Circular dependency detected while resolving '{key}': {}", .chain.join(" -> "))]
  CyclicDependency { key: String, chain: Vec<String> },

  #[error("Value of '{key}' is not a '{expected}'")]
  DowncastFailed { key: String, expected: &'static str },

  #[error("Service '{key}' failed: {source}")]
  Service {
    key: String,
    #[source]
    source: DynError,
  },
}

impl ContainerError {
  /// Wraps an arbitrary error raised by the service registered under `key`.
  pub fn service(key: impl Into<String>, source: impl Into<DynError>) -> Self {
    ContainerError::Service {
      key: key.into(),
      source: source.into(),
    }
  }

  /// The key the error was raised for.
  pub fn key(&self) -> &str {
    match self {
      ContainerError::UndefinedService { key }
      | ContainerError::InvalidKey { key }
      | ContainerError::FrozenOverwrite { key }
      | ContainerError::LockedContainer { key }
      | ContainerError::NotCallable { key }
      | ContainerError::MissingDependency { key, .. }
      | ContainerError::MissingArgument { key, .. }
      | ContainerError::NotInstantiable { key }
      | ContainerError::CyclicDependency { key, .. }
      | ContainerError::DowncastFailed { key, .. }
      | ContainerError::Service { key, .. } => key,
    }
  }
}

/// A specialized `Result` type for `fibre_container` operations.
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
