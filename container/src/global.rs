//! The per-thread default container and access functions.

use crate::container::Container;

thread_local! {
  // Containers are `!Sync`, so each thread gets its own default instance,
  // created on first access.
  static GLOBAL_CONTAINER: Container = Container::new();
}

/// Runs `f` with this thread's default container.
///
/// This allows registering and resolving definitions from anywhere in an
/// application without passing a container around.
///
/// # Examples
///
/// ```
/// use fibre_container::{global::with_global, Definition};
///
/// with_global(|container| {
///   container.set("greeting", Definition::value("Hello from global!")).unwrap();
/// });
///
/// let greeting = with_global(|container| container.get_as::<&str>("greeting").unwrap());
/// assert_eq!(*greeting, "Hello from global!");
/// ```
pub fn with_global<R>(f: impl FnOnce(&Container) -> R) -> R {
  GLOBAL_CONTAINER.with(f)
}
