//! # Fibre Container
//!
//! A lazy, single-threaded service and parameter container.
//!
//! A [`Container`] maps string keys to either plain values ("parameters") or
//! deferred computations ("services"), and decides at resolution time how a
//! service is evaluated.
//!
//! ## Core Concepts
//!
//! - **Parameter**: a plain value, returned as is.
//! - **Service**: a closure invoked with the container on first resolution.
//!   Its value replaces it and the key becomes *frozen*: it can no longer be
//!   redefined or removed. [`Container::raw`] still hands out the closure.
//! - **Factory**: a service marked with [`Container::factory`], invoked on every
//!   resolution and never cached.
//! - **Protected**: a service marked with [`Container::protect`], handed out
//!   uninvoked, like a parameter.
//! - **Tags**: free-form `(key, tag, config)` associations for discovery.
//! - **Compile phase**: `compile.pre` and `compile.post` events coordinating
//!   independent registration sites, see [`Compiler`].
//!
//! Factory and protected flags belong to the service itself, not to the key:
//! storing clones of one [`Service`] under several keys shares the flags.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_container::{Container, Definition, Service};
//! use std::rc::Rc;
//!
//! # fn main() -> fibre_container::Result<()> {
//! let container = Container::new();
//!
//! // A parameter.
//! container.set("name", Definition::value(String::from("world")))?;
//!
//! // A service resolving another key. It runs once, on first access.
//! container.set(
//!   "hello",
//!   Definition::service(|c| Ok(format!("hello {}", c.get_as::<String>("name")?))),
//! )?;
//!
//! let first = container.get_as::<String>("hello")?;
//! let second = container.get_as::<String>("hello")?;
//! assert_eq!(*first, "hello world");
//! assert!(Rc::ptr_eq(&first, &second));
//!
//! // A factory runs on every access.
//! let counter = Rc::new(std::cell::Cell::new(0));
//! let ticks = Rc::clone(&counter);
//! container.set(
//!   "tick",
//!   container.factory(Service::new(move |_| {
//!     ticks.set(ticks.get() + 1);
//!     Ok(ticks.get())
//!   }))?,
//! )?;
//! assert_eq!(*container.get_as::<i32>("tick")?, 1);
//! assert_eq!(*container.get_as::<i32>("tick")?, 2);
//! # Ok(())
//! # }
//! ```

mod builder;
mod container;
mod definition;
mod error;
pub mod events;
mod guard;
mod identity;
mod inject;
mod lifecycle;
mod macros;
mod store;
mod tags;

pub mod global;

pub use builder::ContainerBuilder;
pub use container::Container;
pub use definition::{Definition, Service, Value};
pub use error::{ContainerError, DynError, Result};
pub use identity::CallableTag;
pub use inject::Injected;
pub use lifecycle::{CompileHooks, Compiler, LifecycleConfig, COMPILE_POST, COMPILE_PRE};
pub use tags::{TagAssociation, TagConfig};
