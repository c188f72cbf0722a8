use std::path::Path;

use store::{KeyValueStore, ProjectStore};
use story::{
    apply_command, Character, CharacterId, CharacterPatch, Image, ImageId, ImageOwner, Link,
    LinkId, Note, NoteId, Project, ProjectId, Scene, SceneId, ScenePatch, SceneText,
    StoryCommand, StoryError,
};

use crate::dnd::{DragCoordinator, DragPayload, DropTarget};
use crate::{images, DeleteRequest, DeleteTarget, MainTab, Result, Session, SidebarTab};

/// Corkboard card: the same scene sequence the draft editor shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneCard {
    pub id: SceneId,
    pub title: String,
    pub words: usize,
}

/// Uncommitted edits to one scene. Nothing reaches the project until
/// [`Workspace::commit_scene_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEdit {
    pub scene_id: SceneId,
    pub title: String,
    pub text: SceneText,
}

/// An open project. Owns the document for the session; every change goes
/// through [`Workspace::update`], which applies, restamps and persists.
pub struct Workspace<'s, S> {
    store: &'s ProjectStore<S>,
    project: Project,
    session: Session,
    drag: DragCoordinator,
}

impl<'s, S: KeyValueStore> Workspace<'s, S> {
    pub(crate) fn new(store: &'s ProjectStore<S>, project: Project) -> Self {
        Self {
            store,
            project,
            session: Session::default(),
            drag: DragCoordinator::new(),
        }
    }

    /// `None` when the project is missing or unreadable.
    pub fn open(store: &'s ProjectStore<S>, id: &ProjectId) -> Option<Self> {
        store.load(id).map(|project| Self::new(store, project))
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    pub fn update(&mut self, command: StoryCommand) -> Result<()> {
        let mut next = apply_command(&self.project, command)?;
        self.store.save(&mut next)?;
        self.project = next;
        self.session.sync_with(&self.project);
        Ok(())
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        self.update(StoryCommand::Rename {
            name: name.to_string(),
        })
    }

    // Characters

    /// Adds a blank character and selects it.
    pub fn add_character(&mut self) -> Result<CharacterId> {
        let character = Character::new();
        let id = character.id.clone();
        self.update(StoryCommand::AddCharacter { character })?;
        self.session.selected_character = Some(id.clone());
        Ok(id)
    }

    pub fn update_character(&mut self, id: &CharacterId, patch: CharacterPatch) -> Result<()> {
        self.update(StoryCommand::UpdateCharacter {
            id: id.clone(),
            patch,
        })
    }

    /// Returns false and leaves the selection alone if there is no such character.
    pub fn select_character(&mut self, id: &CharacterId) -> bool {
        if self.project.character(id).is_none() {
            return false;
        }
        self.session.selected_character = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.session.selected_character = None;
    }

    /// The character shown in the detail pane.
    pub fn selected_character(&self) -> Option<&Character> {
        self.session
            .selected_character
            .as_ref()
            .and_then(|id| self.project.character(id))
    }

    // Scenes

    pub fn add_scene(&mut self) -> Result<SceneId> {
        let scene = Scene::new();
        let id = scene.id.clone();
        self.update(StoryCommand::AddScene { scene })?;
        Ok(id)
    }

    pub fn update_scene(&mut self, id: &SceneId, patch: ScenePatch) -> Result<()> {
        self.update(StoryCommand::UpdateScene {
            id: id.clone(),
            patch,
        })
    }

    pub fn move_scene(&mut self, moved: &SceneId, before: &SceneId) -> Result<()> {
        self.update(StoryCommand::ReorderScene {
            moved: moved.clone(),
            before: before.clone(),
        })
    }

    pub fn scene_cards(&self) -> Vec<SceneCard> {
        self.project
            .scenes
            .iter()
            .map(|scene| SceneCard {
                id: scene.id.clone(),
                title: scene.display_title().to_string(),
                words: scene.word_count(),
            })
            .collect()
    }

    pub fn edit_scene(&self, id: &SceneId) -> Option<SceneEdit> {
        self.project.scene(id).map(|scene| SceneEdit {
            scene_id: scene.id.clone(),
            title: scene.title.clone(),
            text: scene.text.clone(),
        })
    }

    /// Writes back only the fields that changed. Returns false when nothing was
    /// written (no changes, or the scene was deleted meanwhile).
    pub fn commit_scene_edit(&mut self, edit: SceneEdit) -> Result<bool> {
        let Some(scene) = self.project.scene(&edit.scene_id) else {
            return Ok(false);
        };
        let patch = ScenePatch {
            title: (scene.title != edit.title).then_some(edit.title),
            text: (scene.text != edit.text).then_some(edit.text),
            image_ids: None,
        };
        if patch.is_empty() {
            return Ok(false);
        }
        self.update_scene(&edit.scene_id, patch)?;
        Ok(true)
    }

    // Research

    pub fn add_note(&mut self) -> Result<NoteId> {
        let note = Note::default();
        let id = note.id.clone();
        self.update(StoryCommand::AddNote { note })?;
        Ok(id)
    }

    pub fn update_note(&mut self, id: &NoteId, text: &str) -> Result<()> {
        self.update(StoryCommand::UpdateNote {
            id: id.clone(),
            text: text.to_string(),
        })
    }

    pub fn remove_note(&mut self, id: &NoteId) -> Result<()> {
        self.update(StoryCommand::RemoveNote { id: id.clone() })
    }

    /// Blank input is ignored and yields `None`.
    pub fn add_link(&mut self, url: &str) -> Result<Option<LinkId>> {
        let link = Link::new(url);
        let id = link.id.clone();
        match self.update(StoryCommand::AddLink { link }) {
            Ok(()) => Ok(Some(id)),
            Err(crate::WorkspaceError::Story(StoryError::EmptyLink)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn remove_link(&mut self, id: &LinkId) -> Result<()> {
        self.update(StoryCommand::RemoveLink { id: id.clone() })
    }

    /// Encodes the files in order and appends them to research images in one save.
    pub async fn import_images<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Vec<ImageId>> {
        let images = images::encode_images(paths).await;
        self.add_images(images)
    }

    pub fn add_images(&mut self, images: Vec<Image>) -> Result<Vec<ImageId>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }
        let ids = images.iter().map(|i| i.id.clone()).collect();
        self.update(StoryCommand::AddImages { images })?;
        Ok(ids)
    }

    /// Removes the image only; scenes and characters keep the dangling id.
    pub fn remove_image(&mut self, id: &ImageId) -> Result<()> {
        self.update(StoryCommand::RemoveImage { id: id.clone() })
    }

    pub fn attach_image(&mut self, owner: ImageOwner, image_id: &ImageId) -> Result<()> {
        self.update(StoryCommand::AttachImage {
            owner,
            image_id: image_id.clone(),
        })
    }

    /// Images attached to `owner`, in attachment order, skipping deleted ones.
    pub fn attached_images(&self, owner: &ImageOwner) -> Vec<&Image> {
        self.project.attached_images(self.attached_ids(owner))
    }

    // Deletion

    /// Replaces any request already waiting on the dialog.
    pub fn request_delete(&mut self, request: DeleteRequest) {
        self.session.pending_delete = Some(request);
    }

    pub fn request_scene_delete(&mut self, id: &SceneId) -> bool {
        let Some(scene) = self.project.scene(id) else {
            return false;
        };
        let request = DeleteRequest {
            target: DeleteTarget::Scene(id.clone()),
            title: scene.title.clone(),
        };
        self.request_delete(request);
        true
    }

    pub fn request_character_delete(&mut self, id: &CharacterId) -> bool {
        let Some(character) = self.project.character(id) else {
            return false;
        };
        let request = DeleteRequest {
            target: DeleteTarget::Character(id.clone()),
            title: character.name.clone(),
        };
        self.request_delete(request);
        true
    }

    pub fn cancel_delete(&mut self) {
        self.session.pending_delete = None;
    }

    /// Applies the pending request and clears it. Nothing pending is a no-op.
    pub fn confirm_delete(&mut self) -> Result<Option<DeleteRequest>> {
        let Some(request) = self.session.pending_delete.take() else {
            return Ok(None);
        };
        let command = match &request.target {
            DeleteTarget::Scene(id) => StoryCommand::RemoveScene { id: id.clone() },
            DeleteTarget::Character(id) => StoryCommand::RemoveCharacter { id: id.clone() },
        };
        self.update(command)?;
        Ok(Some(request))
    }

    // Presentation

    pub fn toggle_focus_mode(&mut self) -> bool {
        self.session.focus_mode = !self.session.focus_mode;
        self.session.focus_mode
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.session.sidebar_hidden = !self.session.sidebar_hidden;
        !self.session.sidebar_hidden
    }

    pub fn set_sidebar_tab(&mut self, tab: SidebarTab) {
        self.session.sidebar_tab = tab;
    }

    pub fn set_main_tab(&mut self, tab: MainTab) {
        self.session.main_tab = tab;
    }

    // Drag and drop

    pub fn drag_start(&mut self, payload: DragPayload) {
        self.drag.start(payload);
    }

    pub fn drag_over(&mut self, target: DropTarget) -> bool {
        self.drag.over(target)
    }

    pub fn drag_end(&mut self) {
        self.drag.end();
    }

    /// Returns true when the drop changed the project.
    pub fn drop_on(&mut self, target: &DropTarget) -> Result<bool> {
        let Some(command) = self.drag.drop_on(target) else {
            return Ok(false);
        };
        let before = self.drop_footprint(&command);
        let replay = command.clone();
        self.update(command)?;
        Ok(self.drop_footprint(&replay) != before)
    }

    /// The part of the project a drop command can change.
    fn drop_footprint(&self, command: &StoryCommand) -> DropFootprint {
        match command {
            StoryCommand::ReorderScene { .. } => DropFootprint::Order(
                self.project.scenes.iter().map(|s| s.id.clone()).collect(),
            ),
            StoryCommand::AttachImage { owner, .. } => {
                DropFootprint::Attached(self.attached_ids(owner).to_vec())
            }
            _ => DropFootprint::Untracked,
        }
    }

    fn attached_ids(&self, owner: &ImageOwner) -> &[ImageId] {
        match owner {
            ImageOwner::Scene(id) => self
                .project
                .scene(id)
                .map(|s| s.image_ids.as_slice())
                .unwrap_or_default(),
            ImageOwner::Character(id) => self
                .project
                .character(id)
                .map(|c| c.image_ids.as_slice())
                .unwrap_or_default(),
        }
    }
}

#[derive(PartialEq, Eq)]
enum DropFootprint {
    Order(Vec<SceneId>),
    Attached(Vec<ImageId>),
    Untracked,
}
