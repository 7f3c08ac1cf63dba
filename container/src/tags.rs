//! Tag based discovery of services.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Free-form configuration attached to a tag association.
pub type TagConfig = serde_json::Map<String, serde_json::Value>;

/// One `tag(key, name, config)` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagAssociation {
  pub key: String,
  #[serde(default)]
  pub config: TagConfig,
}

impl TagAssociation {
  pub fn new(key: impl Into<String>, config: TagConfig) -> Self {
    Self {
      key: key.into(),
      config,
    }
  }
}

/// Tag name -> associations, in registration order.
///
/// Keys are not checked against the definitions and duplicates are kept.
#[derive(Debug, Default)]
pub(crate) struct TagRegistry {
  tags: IndexMap<String, Vec<TagAssociation>>,
}

impl TagRegistry {
  pub(crate) fn add(&mut self, key: &str, name: &str, config: TagConfig) {
    tracing::trace!(key, tag = name, "Tagged service");
    self
      .tags
      .entry(name.to_owned())
      .or_default()
      .push(TagAssociation::new(key, config));
  }

  pub(crate) fn tagged(&self, name: &str) -> Vec<TagAssociation> {
    self.tags.get(name).cloned().unwrap_or_default()
  }

  pub(crate) fn names(&self) -> Vec<String> {
    self.tags.keys().cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  #[test]
  fn unknown_tag_is_empty() {
    let registry = TagRegistry::default();
    assert!(registry.tagged("listeners").is_empty());
    assert!(registry.names().is_empty());
  }

  #[test]
  fn associations_keep_order_and_duplicates() {
    let mut registry = TagRegistry::default();
    let mut config = TagConfig::new();
    config.insert("priority".into(), json!(10));

    registry.add("mailer", "listeners", TagConfig::new());
    registry.add("audit", "listeners", config.clone());
    registry.add("mailer", "listeners", TagConfig::new());
    registry.add("mailer", "commands", TagConfig::new());

    assert_eq!(
      registry.tagged("listeners"),
      vec![
        TagAssociation::new("mailer", TagConfig::new()),
        TagAssociation::new("audit", config),
        TagAssociation::new("mailer", TagConfig::new()),
      ]
    );
    assert_eq!(registry.names(), ["listeners", "commands"]);
  }

  #[test]
  fn association_serializes_as_a_record() {
    let association = TagAssociation::new("mailer", TagConfig::new());
    assert_eq!(
      serde_json::to_value(&association).unwrap(),
      json!({ "key": "mailer", "config": {} })
    );
  }
}
