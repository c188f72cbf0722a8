use serde::{Deserialize, Serialize};

use crate::{
    display_name, Character, CharacterId, Image, ImageId, Link, LinkId, Note, NoteId, Project,
    Scene, SceneId, SceneText, StoryError,
};

/// Entity that can hold research image references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ImageOwner {
    Scene(SceneId),
    Character(CharacterId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flaws: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<ImageId>>,
}

impl CharacterPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_to(self, character: &mut Character) {
        if let Some(name) = self.name {
            character.name = name;
        }
        if let Some(age) = self.age {
            character.age = age;
        }
        if let Some(appearance) = self.appearance {
            character.appearance = appearance;
        }
        if let Some(flaws) = self.flaws {
            character.flaws = flaws;
        }
        if let Some(goals) = self.goals {
            character.goals = goals;
        }
        if let Some(arc) = self.arc {
            character.arc = arc;
        }
        if let Some(image_ids) = self.image_ids {
            character.image_ids = image_ids;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<SceneText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ids: Option<Vec<ImageId>>,
}

impl ScenePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn text(text: SceneText) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_to(self, scene: &mut Scene) {
        if let Some(title) = self.title {
            scene.title = title;
        }
        if let Some(text) = self.text {
            scene.text = text;
        }
        if let Some(image_ids) = self.image_ids {
            scene.image_ids = image_ids;
        }
    }
}

/// Every mutation a view can request on a project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum StoryCommand {
    Rename {
        name: String,
    },
    AddCharacter {
        character: Character,
    },
    UpdateCharacter {
        id: CharacterId,
        patch: CharacterPatch,
    },
    RemoveCharacter {
        id: CharacterId,
    },
    AddScene {
        scene: Scene,
    },
    UpdateScene {
        id: SceneId,
        patch: ScenePatch,
    },
    RemoveScene {
        id: SceneId,
    },
    ReorderScene {
        moved: SceneId,
        before: SceneId,
    },
    AddNote {
        note: Note,
    },
    UpdateNote {
        id: NoteId,
        text: String,
    },
    RemoveNote {
        id: NoteId,
    },
    AddLink {
        link: Link,
    },
    RemoveLink {
        id: LinkId,
    },
    AddImages {
        images: Vec<Image>,
    },
    RemoveImage {
        id: ImageId,
    },
    AttachImage {
        owner: ImageOwner,
        image_id: ImageId,
    },
}

/// Applies `command` to a copy of `project`. The input document is never touched.
pub fn apply_command(project: &Project, command: StoryCommand) -> Result<Project, StoryError> {
    match command {
        StoryCommand::Rename { name } => Ok(rename(project, &name)),
        StoryCommand::AddCharacter { character } => add_character(project, character),
        StoryCommand::UpdateCharacter { id, patch } => Ok(update_character(project, &id, patch)),
        StoryCommand::RemoveCharacter { id } => Ok(remove_character(project, &id)),
        StoryCommand::AddScene { scene } => add_scene(project, scene),
        StoryCommand::UpdateScene { id, patch } => Ok(update_scene(project, &id, patch)),
        StoryCommand::RemoveScene { id } => Ok(remove_scene(project, &id)),
        StoryCommand::ReorderScene { moved, before } => {
            Ok(reorder_scene(project, &moved, &before))
        }
        StoryCommand::AddNote { note } => add_note(project, note),
        StoryCommand::UpdateNote { id, text } => Ok(update_note(project, &id, text)),
        StoryCommand::RemoveNote { id } => Ok(remove_note(project, &id)),
        StoryCommand::AddLink { link } => add_link(project, link),
        StoryCommand::RemoveLink { id } => Ok(remove_link(project, &id)),
        StoryCommand::AddImages { images } => add_images(project, images),
        StoryCommand::RemoveImage { id } => Ok(remove_image(project, &id)),
        StoryCommand::AttachImage { owner, image_id } => {
            Ok(attach_image(project, &owner, &image_id))
        }
    }
}

pub fn rename(project: &Project, name: &str) -> Project {
    let mut next = project.clone();
    next.name = display_name(name);
    next
}

pub fn add_character(project: &Project, character: Character) -> Result<Project, StoryError> {
    if project.character(&character.id).is_some() {
        return Err(StoryError::duplicate("character", character.id.as_str()));
    }
    let mut next = project.clone();
    next.characters.push(character);
    Ok(next)
}

pub fn update_character(project: &Project, id: &CharacterId, patch: CharacterPatch) -> Project {
    let mut next = project.clone();
    if let Some(character) = next.characters.iter_mut().find(|c| &c.id == id) {
        patch.apply_to(character);
    }
    next
}

pub fn remove_character(project: &Project, id: &CharacterId) -> Project {
    let mut next = project.clone();
    next.characters.retain(|c| &c.id != id);
    next
}

pub fn add_scene(project: &Project, scene: Scene) -> Result<Project, StoryError> {
    if project.scene(&scene.id).is_some() {
        return Err(StoryError::duplicate("scene", scene.id.as_str()));
    }
    let mut next = project.clone();
    next.scenes.push(scene);
    Ok(next)
}

pub fn update_scene(project: &Project, id: &SceneId, patch: ScenePatch) -> Project {
    let mut next = project.clone();
    if let Some(scene) = next.scenes.iter_mut().find(|s| &s.id == id) {
        patch.apply_to(scene);
    }
    next
}

pub fn remove_scene(project: &Project, id: &SceneId) -> Project {
    let mut next = project.clone();
    next.scenes.retain(|s| &s.id != id);
    next
}

/// Moves `moved` so that it sits immediately before `before`.
///
/// The target index is looked up after `moved` is taken out, so moving a scene
/// down the list lands it in front of the target rather than behind it.
pub fn reorder_scene(project: &Project, moved: &SceneId, before: &SceneId) -> Project {
    let mut next = project.clone();
    if moved == before {
        return next;
    }
    let (Some(from), Some(_)) = (project.scene_position(moved), project.scene_position(before))
    else {
        return next;
    };
    let scene = next.scenes.remove(from);
    let to = next
        .scene_position(before)
        .unwrap_or(next.scenes.len());
    next.scenes.insert(to, scene);
    next
}

pub fn add_note(project: &Project, note: Note) -> Result<Project, StoryError> {
    if project.research.notes.iter().any(|n| n.id == note.id) {
        return Err(StoryError::duplicate("note", note.id.as_str()));
    }
    let mut next = project.clone();
    next.research.notes.push(note);
    Ok(next)
}

pub fn update_note(project: &Project, id: &NoteId, text: String) -> Project {
    let mut next = project.clone();
    if let Some(note) = next.research.notes.iter_mut().find(|n| &n.id == id) {
        note.text = text;
    }
    next
}

pub fn remove_note(project: &Project, id: &NoteId) -> Project {
    let mut next = project.clone();
    next.research.notes.retain(|n| &n.id != id);
    next
}

/// Stores the link with its URL trimmed; blank URLs are rejected.
pub fn add_link(project: &Project, link: Link) -> Result<Project, StoryError> {
    let url = link.url.trim();
    if url.is_empty() {
        return Err(StoryError::EmptyLink);
    }
    if project.research.links.iter().any(|l| l.id == link.id) {
        return Err(StoryError::duplicate("link", link.id.as_str()));
    }
    let mut next = project.clone();
    next.research.links.push(Link {
        id: link.id,
        url: url.to_string(),
    });
    Ok(next)
}

pub fn remove_link(project: &Project, id: &LinkId) -> Project {
    let mut next = project.clone();
    next.research.links.retain(|l| &l.id != id);
    next
}

/// Appends images in the given order.
pub fn add_images(project: &Project, images: Vec<Image>) -> Result<Project, StoryError> {
    let mut next = project.clone();
    for image in images {
        if next.image(&image.id).is_some() {
            return Err(StoryError::duplicate("image", image.id.as_str()));
        }
        next.research.images.push(image);
    }
    Ok(next)
}

/// Removes the image itself. Scene and character references are left dangling.
pub fn remove_image(project: &Project, id: &ImageId) -> Project {
    let mut next = project.clone();
    next.research.images.retain(|i| &i.id != id);
    next
}

/// Adds `image_id` to the owner's references unless it is already there.
pub fn attach_image(project: &Project, owner: &ImageOwner, image_id: &ImageId) -> Project {
    let mut next = project.clone();
    let image_ids = match owner {
        ImageOwner::Scene(id) => next
            .scenes
            .iter_mut()
            .find(|s| &s.id == id)
            .map(|s| &mut s.image_ids),
        ImageOwner::Character(id) => next
            .characters
            .iter_mut()
            .find(|c| &c.id == id)
            .map(|c| &mut c.image_ids),
    };
    if let Some(image_ids) = image_ids {
        if !image_ids.contains(image_id) {
            image_ids.push(image_id.clone());
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_scenes(titles: &[&str]) -> (Project, Vec<SceneId>) {
        let mut project = Project::new("Order");
        let mut ids = Vec::new();
        for title in titles {
            let scene = Scene::titled(*title);
            ids.push(scene.id.clone());
            project = add_scene(&project, scene).unwrap();
        }
        (project, ids)
    }

    fn titles(project: &Project) -> Vec<&str> {
        project.scenes.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn reorder_moves_down_in_front_of_target() {
        let (project, ids) = with_scenes(&["S1", "S2", "S3"]);
        let moved = reorder_scene(&project, &ids[0], &ids[2]);
        assert_eq!(titles(&moved), vec!["S2", "S1", "S3"]);
        let restored = reorder_scene(&moved, &ids[0], &ids[1]);
        assert_eq!(titles(&restored), vec!["S1", "S2", "S3"]);
    }

    #[test]
    fn reorder_moves_up_in_front_of_target() {
        let (project, ids) = with_scenes(&["S1", "S2", "S3", "S4"]);
        let moved = reorder_scene(&project, &ids[3], &ids[1]);
        assert_eq!(titles(&moved), vec!["S1", "S4", "S2", "S3"]);
    }

    #[test]
    fn reorder_with_unknown_or_same_id_is_noop() {
        let (project, ids) = with_scenes(&["S1", "S2"]);
        let ghost = SceneId::from("ghost");
        assert_eq!(reorder_scene(&project, &ghost, &ids[0]), project);
        assert_eq!(reorder_scene(&project, &ids[0], &ghost), project);
        assert_eq!(reorder_scene(&project, &ids[1], &ids[1]), project);
    }

    #[test]
    fn commands_leave_input_untouched() {
        let (project, ids) = with_scenes(&["S1", "S2"]);
        let before = project.clone();
        let _ = apply_command(
            &project,
            StoryCommand::UpdateScene {
                id: ids[0].clone(),
                patch: ScenePatch::title("Renamed"),
            },
        )
        .unwrap();
        assert_eq!(project, before);
    }

    #[test]
    fn attach_image_is_idempotent() {
        let (project, ids) = with_scenes(&["S1"]);
        let owner = ImageOwner::Scene(ids[0].clone());
        let image = ImageId::from("img");
        let once = attach_image(&project, &owner, &image);
        let twice = attach_image(&once, &owner, &image);
        assert_eq!(once, twice);
        assert_eq!(twice.scenes[0].image_ids, vec![image]);
    }

    #[test]
    fn attach_to_missing_owner_is_noop() {
        let project = Project::new("Empty");
        let owner = ImageOwner::Character(CharacterId::from("nobody"));
        assert_eq!(attach_image(&project, &owner, &ImageId::from("img")), project);
    }

    #[test]
    fn removing_image_keeps_references() {
        let (project, ids) = with_scenes(&["S1"]);
        let image = Image::new("map.png", "data:image/png;base64,AA==");
        let image_id = image.id.clone();
        let project = add_images(&project, vec![image]).unwrap();
        let project = attach_image(&project, &ImageOwner::Scene(ids[0].clone()), &image_id);
        let project = remove_image(&project, &image_id);
        assert_eq!(project.scenes[0].image_ids, vec![image_id]);
        assert!(project.attached_images(&project.scenes[0].image_ids).is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let project = Project::new("Dupes");
        let character = Character::new();
        let project = add_character(&project, character.clone()).unwrap();
        let err = add_character(&project, character).unwrap_err();
        assert!(matches!(err, StoryError::DuplicateId { kind: "character", .. }));
    }

    #[test]
    fn links_are_trimmed_and_blank_rejected() {
        let project = Project::new("Links");
        let project = add_link(&project, Link::new("  https://example.com  ")).unwrap();
        assert_eq!(project.research.links[0].url, "https://example.com");
        assert!(matches!(
            add_link(&project, Link::new("   ")),
            Err(StoryError::EmptyLink)
        ));
    }

    #[test]
    fn character_patch_only_touches_given_fields() {
        let character = Character::named("Mara");
        let id = character.id.clone();
        let project = add_character(&Project::new("Cast"), character).unwrap();
        let patch = CharacterPatch {
            goals: Some("Find the lighthouse".into()),
            ..CharacterPatch::default()
        };
        let project = update_character(&project, &id, patch);
        let updated = project.character(&id).unwrap();
        assert_eq!(updated.name, "Mara");
        assert_eq!(updated.goals, "Find the lighthouse");
    }

    #[test]
    fn rename_falls_back_to_untitled() {
        let project = rename(&Project::new("Draft"), "");
        assert_eq!(project.name, crate::UNTITLED);
    }

    #[test]
    fn command_wire_format_is_tagged() {
        let command = StoryCommand::ReorderScene {
            moved: SceneId::from("a"),
            before: SceneId::from("b"),
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["command"], "reorder_scene");
        assert_eq!(json["moved"], "a");
    }
}
