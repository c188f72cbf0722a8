//! Drag-and-drop between views.
//!
//! A gesture carries one typed payload from its source to a drop target. The
//! target decides whether it accepts the payload kind; an accepted drop turns
//! into a single [`StoryCommand`]. On the wire (the browser drag-data channel)
//! payloads travel as `(kind, id)` string pairs.

use serde::{Deserialize, Serialize};
use story::{CharacterId, ImageId, ImageOwner, SceneId, StoryCommand};

pub const SCENE_KIND: &str = "scene-id";
pub const IMAGE_KIND: &str = "image-id";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DragPayload {
    Scene(SceneId),
    Image(ImageId),
}

impl DragPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            DragPayload::Scene(_) => SCENE_KIND,
            DragPayload::Image(_) => IMAGE_KIND,
        }
    }

    pub fn to_transfer(&self) -> (&'static str, String) {
        let value = match self {
            DragPayload::Scene(id) => id.to_string(),
            DragPayload::Image(id) => id.to_string(),
        };
        (self.kind(), value)
    }

    /// Unknown kinds and empty values are not payloads.
    pub fn from_transfer(kind: &str, value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        match kind {
            SCENE_KIND => Some(DragPayload::Scene(SceneId::from(value))),
            IMAGE_KIND => Some(DragPayload::Image(ImageId::from(value))),
            _ => None,
        }
    }
}

/// Regions that react to drops.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    /// Scene block in the draft editor: reorders.
    DraftScene(SceneId),
    /// Card on the corkboard: reorders, and takes images.
    CorkboardCard(SceneId),
    /// Attached-images strip under a draft scene.
    SceneImages(SceneId),
    /// Attached-images panel of the character sheet.
    CharacterImages(CharacterId),
}

impl DropTarget {
    pub fn accepts(&self, payload: &DragPayload) -> bool {
        match (self, payload) {
            (DropTarget::DraftScene(_), DragPayload::Scene(_)) => true,
            (DropTarget::CorkboardCard(_), _) => true,
            (DropTarget::SceneImages(_), DragPayload::Image(_)) => true,
            (DropTarget::CharacterImages(_), DragPayload::Image(_)) => true,
            _ => false,
        }
    }

    /// Turns an accepted drop into the edit it stands for.
    pub fn command_for(&self, payload: &DragPayload) -> Option<StoryCommand> {
        if !self.accepts(payload) {
            return None;
        }
        match (self, payload) {
            (
                DropTarget::DraftScene(target) | DropTarget::CorkboardCard(target),
                DragPayload::Scene(dragged),
            ) => (dragged != target).then(|| StoryCommand::ReorderScene {
                moved: dragged.clone(),
                before: target.clone(),
            }),
            (
                DropTarget::CorkboardCard(scene) | DropTarget::SceneImages(scene),
                DragPayload::Image(image_id),
            ) => Some(StoryCommand::AttachImage {
                owner: ImageOwner::Scene(scene.clone()),
                image_id: image_id.clone(),
            }),
            (DropTarget::CharacterImages(character), DragPayload::Image(image_id)) => {
                Some(StoryCommand::AttachImage {
                    owner: ImageOwner::Character(character.clone()),
                    image_id: image_id.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Holds the payload of the gesture in flight. Scoped to one drag.
#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    payload: Option<DragPayload>,
    hovered: Option<DropTarget>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, payload: DragPayload) {
        self.payload = Some(payload);
        self.hovered = None;
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        self.payload.as_ref()
    }

    /// Visual acceptance only. Returns whether `target` would take the drop.
    pub fn over(&mut self, target: DropTarget) -> bool {
        let accepted = self
            .payload
            .as_ref()
            .is_some_and(|payload| target.accepts(payload));
        self.hovered = accepted.then_some(target);
        accepted
    }

    pub fn hovered(&self) -> Option<&DropTarget> {
        self.hovered.as_ref()
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    /// Ends the gesture on `target`. A drop with no payload in flight is ignored.
    pub fn drop_on(&mut self, target: &DropTarget) -> Option<StoryCommand> {
        let payload = self.payload.take()?;
        self.hovered = None;
        target.command_for(&payload)
    }

    /// Gesture cancelled or finished elsewhere.
    pub fn end(&mut self) {
        self.payload = None;
        self.hovered = None;
    }
}
