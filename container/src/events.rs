//! A minimal synchronous publish/subscribe primitive.
//!
//! Listeners are invoked on the caller's thread, in registration order. The
//! first failing listener stops the emission and its error is returned.

use crate::error::Result;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// A listener receiving a borrowed event argument.
pub type Listener<T> = Rc<dyn Fn(&T) -> Result<()>>;

pub struct EventEmitter<T: ?Sized> {
  listeners: IndexMap<String, Vec<Listener<T>>>,
}

impl<T: ?Sized> Default for EventEmitter<T> {
  fn default() -> Self {
    Self {
      listeners: IndexMap::new(),
    }
  }
}

impl<T: ?Sized> EventEmitter<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `listener` for `event`.
  pub fn on<F>(&mut self, event: &str, listener: F)
  where
    F: Fn(&T) -> Result<()> + 'static,
  {
    self
      .listeners
      .entry(event.to_owned())
      .or_default()
      .push(Rc::new(listener));
  }

  /// Snapshot of the listeners registered for `event`.
  ///
  /// Callers that keep the emitter behind a `RefCell` use this to release the
  /// borrow before invoking anything.
  pub fn listeners(&self, event: &str) -> Vec<Listener<T>> {
    self.listeners.get(event).cloned().unwrap_or_default()
  }

  pub fn listener_count(&self, event: &str) -> usize {
    self.listeners.get(event).map_or(0, Vec::len)
  }

  /// Invokes every listener of `event` with `arg`.
  pub fn emit(&self, event: &str, arg: &T) -> Result<()> {
    emit_all(&self.listeners(event), arg)
  }
}

impl<T: ?Sized> fmt::Debug for EventEmitter<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut map = f.debug_map();
    for (event, listeners) in &self.listeners {
      map.entry(event, &listeners.len());
    }
    map.finish()
  }
}

pub(crate) fn emit_all<T: ?Sized>(listeners: &[Listener<T>], arg: &T) -> Result<()> {
  for listener in listeners {
    listener(arg)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ContainerError;
  use std::cell::RefCell;

  #[test]
  fn emits_in_registration_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut emitter = EventEmitter::<str>::new();

    for id in 0..3 {
      let seen = Rc::clone(&seen);
      emitter.on("tick", move |arg: &str| {
        seen.borrow_mut().push(format!("{id}:{arg}"));
        Ok(())
      });
    }
    emitter.on("other", |_: &str| -> Result<()> { panic!("wrong event") });

    emitter.emit("tick", "now").unwrap();
    assert_eq!(*seen.borrow(), ["0:now", "1:now", "2:now"]);
    assert_eq!(emitter.listener_count("tick"), 3);
    assert_eq!(emitter.listener_count("missing"), 0);
  }

  #[test]
  fn failing_listener_stops_emission() {
    let calls = Rc::new(RefCell::new(0));
    let mut emitter = EventEmitter::<u32>::new();

    let counter = Rc::clone(&calls);
    emitter.on("tick", move |_| {
      *counter.borrow_mut() += 1;
      Ok(())
    });
    emitter.on("tick", |_| {
      Err(ContainerError::NotCallable {
        key: "tick".into(),
      })
    });
    let counter = Rc::clone(&calls);
    emitter.on("tick", move |_| {
      *counter.borrow_mut() += 1;
      Ok(())
    });

    let err = emitter.emit("tick", &1).unwrap_err();
    assert!(matches!(err, ContainerError::NotCallable { .. }));
    assert_eq!(*calls.borrow(), 1);
  }

  #[test]
  fn emitting_an_unknown_event_is_a_no_op() {
    let emitter = EventEmitter::<u32>::new();
    emitter.emit("nothing", &0).unwrap();
  }
}
