use std::collections::HashSet;
use story::*;

/// Small deterministic generator so the op mix is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }
}

#[test]
fn scene_sequence_holds_exactly_the_survivors() {
    for seed in 0..20u64 {
        let mut rng = Lcg(seed);
        let mut project = Project::new("Fuzz");
        let mut alive: HashSet<SceneId> = HashSet::new();

        for _ in 0..200 {
            let ids: Vec<SceneId> = project.scenes.iter().map(|s| s.id.clone()).collect();
            match rng.next(3) {
                0 => {
                    let scene = Scene::new();
                    alive.insert(scene.id.clone());
                    project = add_scene(&project, scene).unwrap();
                }
                1 if !ids.is_empty() => {
                    let id = &ids[rng.next(ids.len())];
                    alive.remove(id);
                    project = remove_scene(&project, id);
                }
                _ if ids.len() > 1 => {
                    let moved = &ids[rng.next(ids.len())];
                    let before = &ids[rng.next(ids.len())];
                    project = reorder_scene(&project, moved, before);
                }
                _ => {}
            }

            let seen: HashSet<SceneId> = project.scenes.iter().map(|s| s.id.clone()).collect();
            assert_eq!(seen.len(), project.scenes.len(), "duplicate scene ids");
            assert_eq!(seen, alive);
        }
    }
}

#[test]
fn reorder_round_trip_restores_pair_order() {
    let mut project = Project::new("Pairs");
    let mut ids = Vec::new();
    for title in ["S1", "S2", "S3"] {
        let scene = Scene::titled(title);
        ids.push(scene.id.clone());
        project = apply_command(&project, StoryCommand::AddScene { scene }).unwrap();
    }

    let project = apply_command(
        &project,
        StoryCommand::ReorderScene {
            moved: ids[0].clone(),
            before: ids[2].clone(),
        },
    )
    .unwrap();
    let order: Vec<_> = project.scenes.iter().map(|s| s.title.clone()).collect();
    assert_eq!(order, ["S2", "S1", "S3"]);

    let project = apply_command(
        &project,
        StoryCommand::ReorderScene {
            moved: ids[0].clone(),
            before: ids[1].clone(),
        },
    )
    .unwrap();
    let order: Vec<_> = project.scenes.iter().map(|s| s.title.clone()).collect();
    assert_eq!(order, ["S1", "S2", "S3"]);
}

#[test]
fn attaching_to_character_twice_matches_once() {
    let character = Character::named("Ilse");
    let owner = ImageOwner::Character(character.id.clone());
    let image = Image::new("coat.jpg", "data:image/jpeg;base64,AA==");
    let image_id = image.id.clone();

    let project = add_character(&Project::new("Cast"), character).unwrap();
    let project = add_images(&project, vec![image]).unwrap();
    let command = StoryCommand::AttachImage {
        owner,
        image_id: image_id.clone(),
    };
    let once = apply_command(&project, command.clone()).unwrap();
    let twice = apply_command(&once, command).unwrap();

    assert_eq!(once.characters[0].image_ids, twice.characters[0].image_ids);
    assert_eq!(twice.characters[0].image_ids, vec![image_id]);
}
