use store::{MemoryStore, ProjectStore};
use story::{ImageOwner, SceneId};
use workspace::*;

fn titles<S: store::KeyValueStore>(ws: &Workspace<'_, S>) -> Vec<String> {
    ws.project().scenes.iter().map(|s| s.title.clone()).collect()
}

fn seeded(store: &ProjectStore<MemoryStore>) -> (Workspace<'_, MemoryStore>, Vec<SceneId>) {
    let mut ws = Dashboard::new(store).create_project(Some("Drag")).unwrap();
    let mut ids = Vec::new();
    for title in ["S1", "S2", "S3", "S4"] {
        let id = ws.add_scene().unwrap();
        ws.update_scene(&id, story::ScenePatch::title(title)).unwrap();
        ids.push(id);
    }
    (ws, ids)
}

fn drag_scene<S: store::KeyValueStore>(
    ws: &mut Workspace<'_, S>,
    from: &SceneId,
    target: DropTarget,
) -> bool {
    ws.drag_start(DragPayload::Scene(from.clone()));
    assert!(ws.drag_over(target.clone()));
    ws.drop_on(&target).unwrap()
}

#[test]
fn draft_and_corkboard_reorder_identically() {
    let draft_store = ProjectStore::new(MemoryStore::new());
    let cork_store = ProjectStore::new(MemoryStore::new());
    let (mut draft, d) = seeded(&draft_store);
    let (mut cork, c) = seeded(&cork_store);

    let gestures = [(0, 2), (3, 0), (1, 3), (2, 1)];
    for (from, to) in gestures {
        drag_scene(&mut draft, &d[from], DropTarget::DraftScene(d[to].clone()));
        drag_scene(&mut cork, &c[from], DropTarget::CorkboardCard(c[to].clone()));
        assert_eq!(titles(&draft), titles(&cork));
    }
}

#[test]
fn dropping_scene_on_itself_keeps_order() {
    let store = ProjectStore::new(MemoryStore::new());
    let (mut ws, ids) = seeded(&store);
    assert!(!drag_scene(&mut ws, &ids[1], DropTarget::DraftScene(ids[1].clone())));
    assert_eq!(titles(&ws), ["S1", "S2", "S3", "S4"]);
}

#[test]
fn reorder_into_current_slot_reports_unchanged() {
    let store = ProjectStore::new(MemoryStore::new());
    let (mut ws, ids) = seeded(&store);
    assert!(!drag_scene(&mut ws, &ids[0], DropTarget::CorkboardCard(ids[1].clone())));
    assert_eq!(titles(&ws), ["S1", "S2", "S3", "S4"]);

    assert!(drag_scene(&mut ws, &ids[1], DropTarget::CorkboardCard(ids[0].clone())));
    assert_eq!(titles(&ws), ["S2", "S1", "S3", "S4"]);
}

#[test]
fn attach_change_is_judged_per_owner() {
    let store = ProjectStore::new(MemoryStore::new());
    let (mut ws, ids) = seeded(&store);
    let image = ws
        .add_images(vec![story::Image::new("pier.png", "data:image/png;base64,AA==")])
        .unwrap()
        .remove(0);

    ws.drag_start(DragPayload::Image(image.clone()));
    assert!(ws.drop_on(&DropTarget::SceneImages(ids[2].clone())).unwrap());

    ws.drag_start(DragPayload::Image(image.clone()));
    assert!(!ws.drop_on(&DropTarget::SceneImages(ids[2].clone())).unwrap());

    ws.drag_start(DragPayload::Image(image.clone()));
    assert!(ws.drop_on(&DropTarget::SceneImages(ids[3].clone())).unwrap());

    ws.drag_start(DragPayload::Image(image));
    assert!(!ws
        .drop_on(&DropTarget::SceneImages(SceneId::from("gone")))
        .unwrap());
}

#[test]
fn drop_without_drag_is_ignored() {
    let store = ProjectStore::new(MemoryStore::new());
    let (mut ws, ids) = seeded(&store);
    let before = ws.project().clone();
    assert!(!ws.drop_on(&DropTarget::DraftScene(ids[0].clone())).unwrap());
    assert_eq!(ws.project(), &before);
}

#[test]
fn cancelled_drag_does_not_leak_into_next_drop() {
    let store = ProjectStore::new(MemoryStore::new());
    let (mut ws, ids) = seeded(&store);
    ws.drag_start(DragPayload::Scene(ids[3].clone()));
    ws.drag_end();
    assert!(!ws.drop_on(&DropTarget::DraftScene(ids[0].clone())).unwrap());
    assert_eq!(titles(&ws), ["S1", "S2", "S3", "S4"]);
}

#[test]
fn image_drop_attaches_to_scene_and_character() {
    let store = ProjectStore::new(MemoryStore::new());
    let (mut ws, ids) = seeded(&store);
    let image = ws
        .add_images(vec![story::Image::new("gull.png", "data:image/png;base64,AA==")])
        .unwrap()
        .remove(0);
    let character = ws.add_character().unwrap();

    ws.drag_start(DragPayload::Image(image.clone()));
    assert!(ws.drop_on(&DropTarget::SceneImages(ids[0].clone())).unwrap());

    ws.drag_start(DragPayload::Image(image.clone()));
    assert!(ws.drop_on(&DropTarget::CorkboardCard(ids[1].clone())).unwrap());

    ws.drag_start(DragPayload::Image(image.clone()));
    assert!(ws
        .drop_on(&DropTarget::CharacterImages(character.clone()))
        .unwrap());

    // second drop of the same image is a no-op
    ws.drag_start(DragPayload::Image(image.clone()));
    assert!(!ws
        .drop_on(&DropTarget::CharacterImages(character.clone()))
        .unwrap());

    assert_eq!(ws.project().scenes[0].image_ids, vec![image.clone()]);
    assert_eq!(ws.project().scenes[1].image_ids, vec![image.clone()]);
    assert_eq!(
        ws.attached_images(&ImageOwner::Character(character))
            .len(),
        1
    );
}

#[test]
fn scene_payload_on_image_panel_is_ignored() {
    let store = ProjectStore::new(MemoryStore::new());
    let (mut ws, ids) = seeded(&store);
    let character = ws.add_character().unwrap();
    let before = ws.project().clone();

    ws.drag_start(DragPayload::Scene(ids[0].clone()));
    assert!(!ws.drag_over(DropTarget::CharacterImages(character.clone())));
    assert!(!ws.drop_on(&DropTarget::CharacterImages(character)).unwrap());
    assert_eq!(ws.project(), &before);
}

#[test]
fn wire_payloads_resolve_by_kind() {
    let (kind, value) = DragPayload::Scene(SceneId::from("s9")).to_transfer();
    assert_eq!(kind, dnd::SCENE_KIND);
    assert_eq!(
        DragPayload::from_transfer(kind, &value),
        Some(DragPayload::Scene(SceneId::from("s9")))
    );
}
