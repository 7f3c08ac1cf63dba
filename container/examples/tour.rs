use fibre_container::{Container, Definition, Injected, LifecycleConfig, Service};
use std::cell::Cell;
use std::rc::Rc;

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

fn main() -> fibre_container::Result<()> {
  let container = Container::new();

  // --- Parameters and services ---
  container.set("name", Definition::value("world"))?;
  container.set(
    "hello",
    Definition::service(|c| Ok(format!("hello {}", c.get_as::<&str>("name")?))),
  )?;
  println!("{}", container.get_as::<String>("hello")?);

  container.inject(
    "bye",
    |args: &Injected| Ok(format!("bye {}", args.value::<&str>(0)?)),
    ["name"],
  )?;
  println!("{}", container.get_as::<String>("bye")?);

  // --- Singleton vs factory ---
  let ids = Rc::new(Cell::new(0));

  let next = Rc::clone(&ids);
  container.set(
    "singleton_tracker",
    Service::new(move |_| {
      println!("Creating SINGLETON RequestTracker...");
      next.set(next.get() + 1);
      Ok(RequestTracker { id: next.get() })
    }),
  )?;

  let next = Rc::clone(&ids);
  container.set(
    "factory_tracker",
    container.factory(Service::new(move |_| {
      println!("Creating FACTORY RequestTracker...");
      next.set(next.get() + 1);
      Ok(RequestTracker { id: next.get() })
    }))?,
  )?;

  let s1 = container.get_as::<RequestTracker>("singleton_tracker")?;
  let s2 = container.get_as::<RequestTracker>("singleton_tracker")?;
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert!(Rc::ptr_eq(&s1, &s2), "Singleton instances should be identical");

  let f1 = container.get_as::<RequestTracker>("factory_tracker")?;
  let f2 = container.get_as::<RequestTracker>("factory_tracker")?;
  println!("Factory 1 ID: {}, Factory 2 ID: {}", f1.id, f2.id);
  assert!(!Rc::ptr_eq(&f1, &f2), "Factory instances should be different");

  // --- Extend, protect, raw ---
  container.set("alice", Definition::service(|_| Ok("Hello Alice!".to_string())))?;
  container.extend("alice", |inner, c| {
    Ok(format!("Hello Bob! {}", inner.call_as::<String>(c, "alice")?))
  })?;
  println!("{}", container.get_as::<String>("alice")?);

  container.set(
    "simple.callback",
    container.protect(Definition::service(|_| Ok("Very simple!")))?,
  )?;
  let callback = container.get_service("simple.callback")?;
  println!("{}", callback.call_as::<&str>(&container, "simple.callback")?);

  container.set("leet", Definition::service(|_| Ok(1337)))?;
  println!("leet = {}", container.get_as::<i32>("leet")?);
  if let Some(raw) = container.raw("leet")?.as_service() {
    println!("raw leet = {}", raw.call_as::<i32>(&container, "leet")?);
  }

  // --- Tags ---
  container.tag("hello", "greetings").tag("bye", "greetings");
  for association in container.tagged("greetings") {
    println!("tagged: {}", association.key);
  }
  println!("All defined keys: {:?}", container.keys());

  // --- Compile phase ---
  let composed = Container::builder()
    .controller(|config: &mut LifecycleConfig, hooks| {
      config.instantiate = false;
      hooks
        .on_compile_pre(|c: &Container| {
          println!("onCompilePre, instantiate is {}", c.config().instantiate);
          Ok(())
        })
        .on_compile_post(|c: &Container| {
          println!("onCompilePost, instantiate is {}", c.config().instantiate);
          Ok(())
        });
    })
    .build()?;
  composed.compiler().emit_compile()?;

  composed.lock();
  if let Err(err) = composed.set("foo", Definition::value("bar")) {
    println!("As expected: {err}");
  }

  Ok(())
}
