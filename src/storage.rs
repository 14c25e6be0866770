//! Client-local key/value storage.
//!
//! Stands in for browser local storage: string keys, string values, no
//! schema. [`LocalDb`] persists to SQLite; [`MemoryStorage`] lives and dies
//! with the process.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::db::{DbError, LocalDb};

pub trait LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DbError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DbError>;
    fn remove(&self, key: &str) -> Result<(), DbError>;
}

impl LocalStorage for LocalDb {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        self.get_item(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.set_item(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DbError> {
        self.remove_item(key).map(|_| ())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DbError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;

    fn exercise(storage: &dyn LocalStorage) {
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("two"));
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        exercise(&storage);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_sqlite_storage() {
        exercise(&test_db());
    }
}
