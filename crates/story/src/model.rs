use serde::{Deserialize, Serialize};

use crate::{CharacterId, ImageId, LinkId, NoteId, ProjectId, SceneId, SceneText, Timestamp};

pub const UNTITLED: &str = "Untitled";

pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Dashboard listing row. Mirrors the four header fields of a stored [`Project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIndexEntry {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub research: Research,
}

impl Project {
    pub fn new(name: &str) -> Self {
        let ts = now_millis();
        Self {
            id: ProjectId::new(),
            name: display_name(name),
            created_at: ts,
            updated_at: ts,
            characters: Vec::new(),
            scenes: Vec::new(),
            research: Research::default(),
        }
    }

    pub fn index_entry(&self) -> ProjectIndexEntry {
        ProjectIndexEntry {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| &c.id == id)
    }

    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| &s.id == id)
    }

    pub fn image(&self, id: &ImageId) -> Option<&Image> {
        self.research.images.iter().find(|i| &i.id == id)
    }

    pub fn scene_position(&self, id: &SceneId) -> Option<usize> {
        self.scenes.iter().position(|s| &s.id == id)
    }

    /// Resolves image references in order. Ids whose image has been deleted are skipped.
    pub fn attached_images(&self, image_ids: &[ImageId]) -> Vec<&Image> {
        image_ids.iter().filter_map(|id| self.image(id)).collect()
    }

    pub fn stats(&self) -> ProjectStats {
        ProjectStats {
            scenes: self.scenes.len(),
            words: self.scenes.iter().map(Scene::word_count).sum(),
            characters: self.characters.len(),
            notes: self.research.notes.len(),
            links: self.research.links.len(),
            images: self.research.images.len(),
        }
    }
}

/// Blank names fall back to [`UNTITLED`].
pub fn display_name(name: &str) -> String {
    if name.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        name.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub scenes: usize,
    pub words: usize,
    pub characters: usize,
    pub notes: usize,
    pub links: usize,
    pub images: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    #[serde(default)]
    pub name: String,
    /// Free text; the sheet only nudges towards a number.
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub appearance: String,
    #[serde(default)]
    pub flaws: String,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub arc: String,
    #[serde(default)]
    pub image_ids: Vec<ImageId>,
}

impl Character {
    pub fn new() -> Self {
        Self::named("New Character")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            age: String::new(),
            appearance: String::new(),
            flaws: String::new(),
            goals: String::new(),
            arc: String::new(),
            image_ids: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unnamed"
        } else {
            &self.name
        }
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: SceneText,
    #[serde(default)]
    pub image_ids: Vec<ImageId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::titled("New Scene")
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            id: SceneId::new(),
            title: title.into(),
            text: SceneText::default(),
            image_ids: Vec::new(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled Scene"
        } else {
            &self.title
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.word_count()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Research {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub text: String,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NoteId::new(),
            text: text.into(),
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new("New note")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub url: String,
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: LinkId::new(),
            url: url.into(),
        }
    }
}

/// Research image. Owns the encoded bytes as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    #[serde(default)]
    pub name: String,
    pub data_url: String,
}

impl Image {
    pub fn new(name: impl Into<String>, data_url: impl Into<String>) -> Self {
        Self {
            id: ImageId::new(),
            name: name.into(),
            data_url: data_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_project_name_is_untitled() {
        let project = Project::new("   ");
        assert_eq!(project.name, UNTITLED);
        assert_eq!(project.created_at, project.updated_at);
        assert!(project.scenes.is_empty());
        assert!(project.research.images.is_empty());
    }

    #[test]
    fn reads_browser_layout() {
        let raw = json!({
            "id": "a1b2c3d4",
            "name": "Harbor",
            "createdAt": 1_700_000_000_000i64,
            "updatedAt": 1_700_000_500_000i64,
            "characters": [{
                "id": "c1", "name": "Mara", "age": "31", "appearance": "",
                "flaws": "", "goals": "", "arc": "", "imageIds": ["i1"]
            }],
            "scenes": [{ "id": "s1", "title": "Dock", "text": "<p>Fog.</p>", "imageIds": [] }],
            "research": { "notes": [], "links": [], "images": [
                { "id": "i1", "name": "pier.png", "dataUrl": "data:image/png;base64,AA==" }
            ] }
        });
        let project: Project = serde_json::from_value(raw).unwrap();
        assert_eq!(project.id.as_str(), "a1b2c3d4");
        assert_eq!(project.characters[0].image_ids, vec![ImageId::from("i1")]);
        assert_eq!(project.scenes[0].word_count(), 1);

        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(back["updatedAt"], 1_700_000_500_000i64);
        assert_eq!(back["research"]["images"][0]["dataUrl"], "data:image/png;base64,AA==");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let raw = json!({ "id": "p", "name": "Bare", "createdAt": 1, "updatedAt": 1 });
        let project: Project = serde_json::from_value(raw).unwrap();
        assert!(project.characters.is_empty());
        assert!(project.research.notes.is_empty());
    }

    #[test]
    fn attached_images_skip_dangling_ids() {
        let mut project = Project::new("Refs");
        let kept = Image::new("kept.png", "data:image/png;base64,AA==");
        let kept_id = kept.id.clone();
        project.research.images.push(kept);
        let refs = vec![ImageId::from("gone"), kept_id.clone()];
        let resolved = project.attached_images(&refs);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, kept_id);
    }

    #[test]
    fn stats_sum_scene_words() {
        let mut project = Project::new("Stats");
        let mut scene = Scene::new();
        scene.text = SceneText::from_markup("<p>one two</p>");
        project.scenes.push(scene);
        project.scenes.push(Scene::new());
        let stats = project.stats();
        assert_eq!(stats.scenes, 2);
        assert_eq!(stats.words, 2);
    }
}
