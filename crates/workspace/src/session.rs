use serde::{Deserialize, Serialize};
use story::{CharacterId, Project, SceneId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarTab {
    #[default]
    Characters,
    Research,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainTab {
    #[default]
    Draft,
    Corkboard,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum DeleteTarget {
    Scene(SceneId),
    Character(CharacterId),
}

impl DeleteTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            DeleteTarget::Scene(_) => "scene",
            DeleteTarget::Character(_) => "character",
        }
    }
}

/// A destructive action waiting on the confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub target: DeleteTarget,
    /// Shown in the dialog; never used to find the entity.
    pub title: String,
}

impl DeleteRequest {
    pub fn prompt(&self) -> String {
        format!("Delete {}?", self.target.kind())
    }
}

/// Transient view state for one open project. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub(crate) selected_character: Option<CharacterId>,
    pub(crate) sidebar_tab: SidebarTab,
    pub(crate) main_tab: MainTab,
    pub(crate) sidebar_hidden: bool,
    pub(crate) focus_mode: bool,
    pub(crate) pending_delete: Option<DeleteRequest>,
}

impl Session {
    pub fn selected_character_id(&self) -> Option<&CharacterId> {
        self.selected_character.as_ref()
    }

    pub fn sidebar_tab(&self) -> SidebarTab {
        self.sidebar_tab
    }

    pub fn main_tab(&self) -> MainTab {
        self.main_tab
    }

    pub fn sidebar_hidden(&self) -> bool {
        self.sidebar_hidden
    }

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    pub fn pending_delete(&self) -> Option<&DeleteRequest> {
        self.pending_delete.as_ref()
    }

    /// Drops a selection whose character no longer exists.
    pub(crate) fn sync_with(&mut self, project: &Project) {
        if let Some(id) = &self.selected_character {
            if project.character(id).is_none() {
                tracing::debug!(character = %id, "selected character is gone; clearing selection");
                self.selected_character = None;
            }
        }
    }
}
