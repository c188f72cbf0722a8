//! Persistence for story projects: a small key/value seam with SQLite and
//! in-memory backends, and the project document/index layout on top of it.

use anyhow::Result;

mod config;
pub use config::*;
mod memory;
pub use memory::*;
mod projects;
pub use projects::*;
mod sqlite;
pub use sqlite::*;

/// String key/value storage. Implementations are used from a single thread at a time.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
