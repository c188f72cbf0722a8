use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use story::{now_millis, Project, ProjectId, ProjectIndexEntry};

use crate::KeyValueStore;

/// Key of the dashboard index: a JSON array of [`ProjectIndexEntry`].
pub const PROJECTS_KEY: &str = "projects";

pub fn project_key(id: &ProjectId) -> String {
    format!("project:{id}")
}

/// Project documents plus the lightweight index the dashboard lists.
pub struct ProjectStore<S> {
    kv: S,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    /// Best-effort read. Missing, unreadable and unparsable values all yield `fallback`.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return fallback,
            Err(err) => {
                tracing::warn!(key, error = %err, "store read failed; using fallback");
                return fallback;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is not valid; using fallback");
                fallback
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.kv
            .set(key, &json)
            .with_context(|| format!("failed to write {key}"))
    }

    pub fn load(&self, id: &ProjectId) -> Option<Project> {
        self.read_json(&project_key(id), None)
    }

    /// Restamps `updated_at`, writes the document, then upserts its index entry.
    pub fn save(&self, project: &mut Project) -> Result<()> {
        project.updated_at = now_millis()
            .max(project.updated_at)
            .max(project.created_at);
        self.write_json(&project_key(&project.id), project)?;

        let mut index: Vec<ProjectIndexEntry> = self.read_json(PROJECTS_KEY, Vec::new());
        let entry = project.index_entry();
        match index.iter_mut().find(|e| e.id == project.id) {
            Some(existing) => *existing = entry,
            None => index.push(entry),
        }
        self.write_json(PROJECTS_KEY, &index)?;
        tracing::debug!(project = %project.id, updated_at = project.updated_at, "saved project");
        Ok(())
    }

    /// Index entries, most recently updated first.
    pub fn list_index(&self) -> Vec<ProjectIndexEntry> {
        let mut index: Vec<ProjectIndexEntry> = self.read_json(PROJECTS_KEY, Vec::new());
        index.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        index
    }

    pub fn create(&self, name: &str) -> Result<Project> {
        let mut project = Project::new(name);
        self.save(&mut project)?;
        tracing::info!(project = %project.id, name = %project.name, "created project");
        Ok(project)
    }

    /// Removes the document and its index entry. Unknown ids are a no-op.
    pub fn delete(&self, id: &ProjectId) -> Result<()> {
        self.kv
            .remove(&project_key(id))
            .with_context(|| format!("failed to remove project {id}"))?;
        let mut index: Vec<ProjectIndexEntry> = self.read_json(PROJECTS_KEY, Vec::new());
        let before = index.len();
        index.retain(|e| &e.id != id);
        if index.len() != before {
            self.write_json(PROJECTS_KEY, &index)?;
            tracing::info!(project = %id, "deleted project");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn corrupt_values_read_as_fallback() {
        let store = ProjectStore::new(MemoryStore::new());
        store.backend().set(PROJECTS_KEY, "{not json").unwrap();
        assert!(store.list_index().is_empty());

        let id = ProjectId::from("broken");
        store.backend().set(&project_key(&id), "[]").unwrap();
        assert!(store.load(&id).is_none());
    }

    #[test]
    fn empty_value_reads_as_fallback() {
        let store = ProjectStore::new(MemoryStore::new());
        store.backend().set(PROJECTS_KEY, "").unwrap();
        assert_eq!(store.read_json(PROJECTS_KEY, vec![1u8]), vec![1u8]);
    }

    #[test]
    fn save_appends_then_replaces_index_entry() {
        let store = ProjectStore::new(MemoryStore::new());
        let mut project = store.create("Lighthouse").unwrap();
        assert_eq!(store.list_index().len(), 1);

        project.name = "Lighthouse Keeper".into();
        store.save(&mut project).unwrap();
        let index = store.list_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0], project.index_entry());
    }
}
