use store::KeyValueStore;
use story::{time_ago_since, Character, ImageOwner, Project, Timestamp};
use workspace::{ProjectCard, SceneCard, Workspace};

pub fn dashboard(cards: &[ProjectCard]) {
    if cards.is_empty() {
        println!("No projects yet. Create one with `story-maker new <name>`.");
        return;
    }
    for card in cards {
        println!("{}  {}  ({})", card.id, card.name, card.updated);
    }
}

pub fn project<S: KeyValueStore>(ws: &Workspace<'_, S>, now: Timestamp) {
    let project = ws.project();
    let stats = project.stats();
    println!("{}  ({})", project.name, project.id);
    println!(
        "Updated {} | {} scenes | {} words | {} characters",
        time_ago_since(project.updated_at, now),
        stats.scenes,
        stats.words,
        stats.characters
    );

    println!();
    println!("Scenes");
    if project.scenes.is_empty() {
        println!("  (none)");
    }
    for (idx, card) in ws.scene_cards().iter().enumerate() {
        let images = image_names(ws, &ImageOwner::Scene(card.id.clone()));
        println!(
            "  {:>2}. {}  {}  {} words{}",
            idx + 1,
            card.id,
            card.title,
            card.words,
            images
        );
    }

    println!();
    println!("Characters");
    if project.characters.is_empty() {
        println!("  (none)");
    }
    for character in &project.characters {
        let images = image_names(ws, &ImageOwner::Character(character.id.clone()));
        println!("  {}  {}{}", character.id, character.display_name(), images);
    }

    research(project);
}

fn research(project: &Project) {
    let research = &project.research;
    println!();
    println!(
        "Research ({} notes, {} links, {} images)",
        research.notes.len(),
        research.links.len(),
        research.images.len()
    );
    for note in &research.notes {
        println!("  note   {}  {}", note.id, first_line(&note.text));
    }
    for link in &research.links {
        println!("  link   {}  {}", link.id, link.url);
    }
    for image in &research.images {
        println!("  image  {}  {}", image.id, image.name);
    }
}

pub fn character<S: KeyValueStore>(ws: &Workspace<'_, S>, character: &Character) {
    println!("{}  ({})", character.display_name(), character.id);
    for (label, value) in [
        ("Age", &character.age),
        ("Appearance", &character.appearance),
        ("Flaws", &character.flaws),
        ("Goals", &character.goals),
        ("Arc", &character.arc),
    ] {
        if !value.is_empty() {
            println!("  {label}: {value}");
        }
    }
    let images = ws.attached_images(&ImageOwner::Character(character.id.clone()));
    if !images.is_empty() {
        println!("  Attached images:");
        for image in images {
            println!("    {}  {}", image.id, image.name);
        }
    }
}

pub fn scene_cards(cards: &[SceneCard]) {
    if cards.is_empty() {
        println!("No scenes yet.");
    }
    for card in cards {
        println!("{}  {}  ({} words)", card.id, card.title, card.words);
    }
}

pub fn scene_text<S: KeyValueStore>(ws: &Workspace<'_, S>) {
    for scene in &ws.project().scenes {
        println!("## {}", scene.display_title());
        println!();
        println!("{}", scene.text.plain_text().trim_end());
        println!();
    }
}

fn image_names<S: KeyValueStore>(ws: &Workspace<'_, S>, owner: &ImageOwner) -> String {
    let names: Vec<&str> = ws
        .attached_images(owner)
        .into_iter()
        .map(|i| i.name.as_str())
        .collect();
    if names.is_empty() {
        String::new()
    } else {
        format!("  [{}]", names.join(", "))
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
