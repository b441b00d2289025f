//! Template persistence seam
//!
//! Durability lives with the caller; the protocol core only defines the
//! shape of the collaboration: opaque template blobs keyed by user
//! identifier.

use std::collections::HashMap;
use std::convert::Infallible;

use r307_types::Template;

/// Storage collaborator for enrolled templates
pub trait TemplateStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a user's template, replacing any previous one
    fn save(&mut self, user_id: &str, template: &Template) -> Result<(), Self::Error>;

    /// Fetch a user's template, if enrolled
    fn load(&self, user_id: &str) -> Result<Option<Template>, Self::Error>;

    /// Drop a user's template; returns whether one existed
    fn remove(&mut self, user_id: &str) -> Result<bool, Self::Error>;
}

/// In-memory store for examples and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    templates: HashMap<String, Template>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of enrolled users
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateStore for MemoryStore {
    type Error = Infallible;

    fn save(&mut self, user_id: &str, template: &Template) -> Result<(), Infallible> {
        self.templates.insert(user_id.to_string(), template.clone());
        Ok(())
    }

    fn load(&self, user_id: &str) -> Result<Option<Template>, Infallible> {
        Ok(self.templates.get(user_id).cloned())
    }

    fn remove(&mut self, user_id: &str) -> Result<bool, Infallible> {
        Ok(self.templates.remove(user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let template = Template::normalized(vec![0xAB; 100]);

        store.save("alice", &template).unwrap();

        assert_eq!(store.load("alice").unwrap(), Some(template));
        assert_eq!(store.load("bob").unwrap(), None);
    }

    #[test]
    fn test_save_replaces() {
        let mut store = MemoryStore::new();
        let first = Template::normalized(vec![1]);
        let second = Template::normalized(vec![2]);

        store.save("alice", &first).unwrap();
        store.save("alice", &second).unwrap();

        assert_eq!(store.load("alice").unwrap(), Some(second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryStore::new();
        store.save("alice", &Template::normalized(vec![1])).unwrap();

        assert!(store.remove("alice").unwrap());
        assert!(!store.remove("alice").unwrap());
        assert!(store.is_empty());
    }
}
