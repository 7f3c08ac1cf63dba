use fibre_container::{Container, ContainerError, Definition, Injected};
use std::cell::Cell;
use std::rc::Rc;

// --- Test Fixtures ---

struct Greeter {
  hello: Rc<&'static str>,
  answer: Rc<i32>,
}

impl Greeter {
  fn greet(&self) -> String {
    format!("{}: {}", self.hello, self.answer)
  }
}

// --- Inject Tests ---

#[test]
fn test_inject_without_dependencies() {
  let container = Container::new();
  container
    .inject(
      "foo",
      |args: &Injected| {
        assert!(args.is_empty());
        Ok(42)
      },
      Vec::<String>::new(),
    )
    .unwrap();

  assert_eq!(*container.get_as::<i32>("foo").unwrap(), 42);
}

#[test]
fn test_inject_passes_dependencies_in_order() {
  // Arrange
  let container = Container::new();
  container.set("hello", Definition::value("world")).unwrap();
  container.set("foo", Definition::service(|_| Ok(42))).unwrap();

  // Act
  container
    .inject(
      "bar",
      |args: &Injected| {
        assert_eq!(args.names(), ["foo", "hello"]);
        let foo = args.value::<i32>(0)?;
        let hello = args.value::<&str>(1)?;
        Ok(format!("{}: {}", hello, foo))
      },
      ["foo", "hello"],
    )
    .unwrap();

  // Assert
  assert_eq!(*container.get_as::<String>("bar").unwrap(), "world: 42");
  // Dependencies were resolved through the container, so `foo` is frozen.
  assert!(container.set("foo", Definition::value(0)).is_err());
}

#[test]
fn test_inject_constructs_structs() {
  let container = Container::new();
  container.set("hello", Definition::value("world")).unwrap();
  container.set("answer", Definition::value(42)).unwrap();

  container
    .inject(
      "greeter",
      |args: &Injected| {
        Ok(Greeter {
          hello: args.value(0)?,
          answer: args.value(1)?,
        })
      },
      ["hello", "answer"],
    )
    .unwrap();

  let greeter = container.get_as::<Greeter>("greeter").unwrap();
  assert_eq!(greeter.greet(), "world: 42");
  // Injected services are memoized like any other service.
  assert!(Rc::ptr_eq(
    &greeter,
    &container.get_as::<Greeter>("greeter").unwrap()
  ));
}

#[test]
fn test_inject_reports_the_first_missing_dependency() {
  let calls = Rc::new(Cell::new(0));
  let counter = Rc::clone(&calls);

  let container = Container::new();
  container
    .set(
      "present",
      Definition::service(move |_| {
        counter.set(counter.get() + 1);
        Ok(1)
      }),
    )
    .unwrap();
  container
    .inject("needy", |_: &Injected| Ok(()), ["present", "first", "second"])
    .unwrap();

  match container.get("needy") {
    Err(ContainerError::MissingDependency { key, dependency }) => {
      assert_eq!(key, "needy");
      assert_eq!(dependency, "first");
    }
    other => panic!("expected a missing dependency, got {:?}", other),
  }
  // Existence is checked before anything is resolved.
  assert_eq!(calls.get(), 0);

  // Dependencies only need to exist at resolution time.
  container.set("first", Definition::value(1)).unwrap();
  container.set("second", Definition::value(2)).unwrap();
  container.get("needy").unwrap();
  assert_eq!(calls.get(), 1);
}

#[test]
fn test_injected_protected_service_is_passed_uninvoked() {
  let container = Container::new();
  let callback = container
    .protect(Definition::service(|_| Ok("called")))
    .unwrap();
  container.set("callback", callback).unwrap();

  container
    .inject(
      "runner",
      |args: &Injected| {
        assert!(args.value::<&str>(0).is_err());
        Ok(args.service(0)?)
      },
      ["callback"],
    )
    .unwrap();

  let callback = container.get_as::<fibre_container::Service>("runner").unwrap();
  assert_eq!(
    *callback.call_as::<&str>(&container, "callback").unwrap(),
    "called"
  );
}

#[test]
fn test_inject_downcast_failure_names_the_dependency() {
  let container = Container::new();
  container.set("number", Definition::value(1_u8)).unwrap();
  container
    .inject(
      "broken",
      |args: &Injected| Ok(args.value::<String>(0)?),
      ["number"],
    )
    .unwrap();

  assert!(matches!(
    container.get("broken"),
    Err(ContainerError::DowncastFailed { key, .. }) if key == "number"
  ));
}

#[test]
fn test_inject_respects_locking() {
  let container = Container::builder().locked(true).build().unwrap();
  assert!(matches!(
    container.inject("late", |_: &Injected| Ok(()), ["x"]),
    Err(ContainerError::LockedContainer { .. })
  ));
}

#[test]
fn test_out_of_range_arguments_are_reported() {
  let container = Container::new();
  container.set("only", Definition::value(1)).unwrap();
  container
    .inject(
      "short",
      |args: &Injected| {
        assert_eq!(args.len(), 1);
        assert!(args.definition(1).is_none());
        assert!(args.service(3).is_err());
        Ok(args.value::<i32>(1)?)
      },
      ["only"],
    )
    .unwrap();

  match container.get("short") {
    Err(ContainerError::MissingArgument { key, index }) => {
      assert_eq!(key, "short");
      assert_eq!(index, 1);
    }
    other => panic!("expected a missing argument, got {:?}", other),
  }
}
