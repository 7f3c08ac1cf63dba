//! Identity tagging for services.
//!
//! Factory and protected status belong to a callable, not to the key it is
//! stored under: two keys holding clones of the same [`Service`] share one
//! tag and therefore one set of flags. The tags live in a side table owned by
//! a single container, so marking a service in one container never leaks into
//! another.

use crate::definition::{Service, ServiceFn};
use std::collections::HashMap;
use std::fmt;
use std::rc::Weak;

/// Opaque identifier assigned to a service the first time it is marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallableTag(u64);

impl fmt::Display for CallableTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Evaluation flags attached to a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CallableFlags {
  pub(crate) factory: bool,
  pub(crate) protected: bool,
}

struct TaggedService {
  // A weak handle keeps the allocation, not the closure, alive: the address
  // cannot be handed out to another closure while the entry exists.
  service: Weak<ServiceFn>,
  tag: CallableTag,
}

impl TaggedService {
  fn is_alive(&self) -> bool {
    self.service.strong_count() > 0
  }
}

pub(crate) struct IdentityTagger {
  next: u64,
  tags: HashMap<usize, TaggedService>,
  flags: HashMap<CallableTag, CallableFlags>,
}

impl Default for IdentityTagger {
  fn default() -> Self {
    Self {
      next: 1,
      tags: HashMap::new(),
      flags: HashMap::new(),
    }
  }
}

impl IdentityTagger {
  /// Returns the tag of `service`, allocating the next one if it has none.
  pub(crate) fn tag(&mut self, service: &Service) -> CallableTag {
    if let Some(existing) = self.tags.get(&service.address()) {
      return existing.tag;
    }

    self.prune();
    let tag = CallableTag(self.next);
    self.next += 1;
    tracing::trace!(%tag, ?service, "Tagged callable");
    self.tags.insert(
      service.address(),
      TaggedService {
        service: service.downgrade(),
        tag,
      },
    );
    tag
  }

  /// Forgets every service that no longer has a strong holder, along with
  /// its flags.
  pub(crate) fn prune(&mut self) {
    let flags = &mut self.flags;
    self.tags.retain(|_, entry| {
      if entry.is_alive() {
        return true;
      }
      flags.remove(&entry.tag);
      false
    });
  }

  pub(crate) fn tag_of(&self, service: &Service) -> Option<CallableTag> {
    self.tags.get(&service.address()).map(|entry| entry.tag)
  }

  pub(crate) fn flags(&self, service: &Service) -> CallableFlags {
    self
      .tag_of(service)
      .and_then(|tag| self.flags.get(&tag).copied())
      .unwrap_or_default()
  }

  pub(crate) fn mark_factory(&mut self, service: &Service) -> CallableTag {
    let tag = self.tag(service);
    self.flags.entry(tag).or_default().factory = true;
    tag
  }

  pub(crate) fn mark_protected(&mut self, service: &Service) -> CallableTag {
    let tag = self.tag(service);
    self.flags.entry(tag).or_default().protected = true;
    tag
  }

  /// Drops the factory flag of `service`, leaving any protected flag intact.
  pub(crate) fn clear_factory(&mut self, service: &Service) {
    if let Some(tag) = self.tag_of(service) {
      if let Some(flags) = self.flags.get_mut(&tag) {
        flags.factory = false;
      }
    }
  }

  /// Drops every flag of `service`. Other keys holding the same service are
  /// affected too.
  pub(crate) fn clear(&mut self, service: &Service) {
    if let Some(tag) = self.tag_of(service) {
      self.flags.remove(&tag);
    }
  }
}
