use fibre_container::{Container, ContainerError, Definition, Service};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn test_unset_a_parameter() {
  let container = Container::new();
  container.set("bar", Definition::value(42)).unwrap();
  assert!(container.exists("bar"));
  assert_eq!(*container.get_as::<i32>("bar").unwrap(), 42);

  // Reading a parameter never freezes it.
  container.unset("bar").unwrap();

  assert!(!container.exists("bar"));
  assert!(matches!(
    container.raw("bar"),
    Err(ContainerError::UndefinedService { .. })
  ));
}

#[test]
fn test_unset_an_unresolved_service() {
  let container = Container::new();
  container.set("foo", Definition::service(|_| Ok(42))).unwrap();
  assert!(container.exists("foo"));

  container.unset("foo").unwrap();
  assert!(!container.exists("foo"));
  assert!(container.keys().is_empty());
  assert!(matches!(
    container.get("foo"),
    Err(ContainerError::UndefinedService { .. })
  ));
}

#[test]
fn test_unset_an_unknown_key_is_a_no_op() {
  let container = Container::new();
  container.unset("nothing").unwrap().unset("nothing").unwrap();
}

#[test]
fn test_unset_a_frozen_service_fails() {
  let container = Container::new();
  container.set("foo", Definition::service(|_| Ok(42))).unwrap();
  assert_eq!(*container.get_as::<i32>("foo").unwrap(), 42);

  let err = container.unset("foo").unwrap_err();
  assert!(err.to_string().contains("frozen"));
  assert!(container.exists("foo"));
}

#[test]
fn test_unset_clears_flags_shared_with_other_keys() {
  // Arrange: one factory stored under two keys.
  let calls = Rc::new(Cell::new(0));
  let counter = Rc::clone(&calls);
  let container = Container::new();
  let shared = container
    .factory(Service::new(move |_| {
      counter.set(counter.get() + 1);
      Ok(counter.get())
    }))
    .unwrap();
  container.set("a", shared.clone()).unwrap();
  container.set("b", shared).unwrap();

  // Act: removing one key drops the factory flag of the callable itself.
  container.unset("a").unwrap();

  // Assert: `b` now memoizes.
  let first = container.get_as::<i32>("b").unwrap();
  let second = container.get_as::<i32>("b").unwrap();
  assert!(Rc::ptr_eq(&first, &second));
  assert_eq!(calls.get(), 1);
}

#[test]
fn test_unset_a_protected_service_unprotects_the_callable() {
  let container = Container::new();
  let callback = container
    .protect(Definition::service(|_| Ok("invoked")))
    .unwrap();
  container.set("a", callback.clone()).unwrap();
  container.set("b", callback).unwrap();

  assert!(container.get("b").unwrap().is_callable());
  container.unset("a").unwrap();
  assert_eq!(*container.get_as::<&str>("b").unwrap(), "invoked");
}

#[test]
fn test_unset_then_redefine() {
  let container = Container::new();
  container.set("a", Definition::value(1)).unwrap();
  container.set("b", Definition::value(2)).unwrap();
  container.unset("a").unwrap();
  container.set("a", Definition::value(3)).unwrap();

  // A removed key loses its position.
  assert_eq!(container.keys(), ["b", "a"]);
}

#[test]
fn test_unset_releases_what_factories_captured() {
  // Arrange
  let resource = Rc::new(());
  let container = Container::new();

  // Act: repeatedly register and remove factories holding the resource.
  for _ in 0..100 {
    let captured = Rc::clone(&resource);
    let factory = container
      .factory(Service::new(move |_| Ok(*captured)))
      .unwrap();
    container.set("connection", factory).unwrap();
    container.get("connection").unwrap();
    container.unset("connection").unwrap();
  }

  // Assert: only the local handle is left.
  assert_eq!(Rc::strong_count(&resource), 1);
}

#[test]
fn test_unset_releases_extended_factories() {
  let resource = Rc::new(());
  let container = Container::new();

  let captured = Rc::clone(&resource);
  let factory = container
    .factory(Service::new(move |_| Ok(*captured)))
    .unwrap();
  container.set("connection", factory).unwrap();
  container
    .extend("connection", |inner, c| inner.call_as::<()>(c, "connection").map(|_| 1))
    .unwrap();
  assert_eq!(Rc::strong_count(&resource), 2);

  container.unset("connection").unwrap();
  assert_eq!(Rc::strong_count(&resource), 1);
}
