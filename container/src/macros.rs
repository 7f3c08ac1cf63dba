//! Public macros for ergonomic service resolution.

/// Resolves a key and downcasts it, panicking if that fails.
///
/// Without a container the thread's default container is used, see
/// [`with_global`](crate::global::with_global). Use `from <container>` to
/// resolve from a specific one.
///
/// # Panics
///
/// Panics with the key, the requested type and the underlying error if the
/// key cannot be resolved as that type. For a non-panicking version use
/// [`Container::get_as`](crate::Container::get_as).
///
/// # Examples
///
/// ```
/// use fibre_container::{resolve, Container, Definition};
///
/// let container = Container::new();
/// container.set("name", Definition::value(String::from("world"))).unwrap();
/// container
///   .set(
///     "hello",
///     Definition::service(|c| Ok(format!("hello {}", c.get_as::<String>("name")?))),
///   )
///   .unwrap();
///
/// let hello = resolve!(from container, String, "hello");
/// assert_eq!(*hello, "hello world");
/// ```
#[macro_export]
macro_rules! resolve {
  // Arm for resolving from a given container: resolve!(from container, Type, "key")
  (from $container:expr, $type:ty, $key:expr) => {
    $container.get_as::<$type>($key).unwrap_or_else(|err| {
      panic!(
        "Failed to resolve required service '{}' as {}: {}",
        $key,
        std::any::type_name::<$type>(),
        err
      )
    })
  };

  // Arm for resolving from the thread's default container: resolve!(Type, "key")
  ($type:ty, $key:expr) => {
    $crate::global::with_global(|container| $crate::resolve!(from container, $type, $key))
  };
}
