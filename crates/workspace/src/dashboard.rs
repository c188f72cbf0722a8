use store::{KeyValueStore, ProjectStore};
use story::{time_ago_since, ProjectId, ProjectIndexEntry, Timestamp};

use crate::{Result, Workspace};

/// One tile on the dashboard grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    pub id: ProjectId,
    pub name: String,
    /// e.g. `Updated 5m ago`
    pub updated: String,
}

pub enum OpenOutcome<'s, S> {
    Opened(Workspace<'s, S>),
    /// Unknown or unreadable project: go back to the dashboard.
    Redirect,
}

impl<'s, S> OpenOutcome<'s, S> {
    pub fn into_workspace(self) -> Option<Workspace<'s, S>> {
        match self {
            OpenOutcome::Opened(workspace) => Some(workspace),
            OpenOutcome::Redirect => None,
        }
    }
}

pub struct Dashboard<'s, S> {
    store: &'s ProjectStore<S>,
    pending_delete: Option<ProjectId>,
}

impl<'s, S: KeyValueStore> Dashboard<'s, S> {
    pub fn new(store: &'s ProjectStore<S>) -> Self {
        Self {
            store,
            pending_delete: None,
        }
    }

    /// Most recently updated first.
    pub fn entries(&self) -> Vec<ProjectIndexEntry> {
        self.store.list_index()
    }

    pub fn cards(&self, now: Timestamp) -> Vec<ProjectCard> {
        self.entries()
            .into_iter()
            .map(|entry| ProjectCard {
                updated: format!("Updated {}", time_ago_since(entry.updated_at, now)),
                name: story::display_name(&entry.name),
                id: entry.id,
            })
            .collect()
    }

    /// Creates and persists a project, then opens it.
    pub fn create_project(&self, name: Option<&str>) -> Result<Workspace<'s, S>> {
        let project = self.store.create(name.unwrap_or_default())?;
        Ok(Workspace::new(self.store, project))
    }

    pub fn open(&self, id: &ProjectId) -> OpenOutcome<'s, S> {
        match Workspace::open(self.store, id) {
            Some(workspace) => OpenOutcome::Opened(workspace),
            None => {
                tracing::info!(project = %id, "project not found; staying on dashboard");
                OpenOutcome::Redirect
            }
        }
    }

    /// Whether the index lists `id`, even if its document no longer loads.
    pub fn is_listed(&self, id: &ProjectId) -> bool {
        self.entries().iter().any(|entry| &entry.id == id)
    }

    pub fn request_delete(&mut self, id: ProjectId) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<&ProjectId> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the project awaiting confirmation, if any, and returns its id.
    pub fn confirm_delete(&mut self) -> Result<Option<ProjectId>> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };
        self.store.delete(&id)?;
        Ok(Some(id))
    }
}
