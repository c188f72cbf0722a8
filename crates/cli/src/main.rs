use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use store::{KeyValueStore, ProjectStore, SqliteStore, StoreConfig};
use story::{
    now_millis, CharacterId, CharacterPatch, ImageId, LinkId, NoteId, ProjectId, SceneId,
    ScenePatch, SceneText,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use workspace::{Dashboard, DragPayload, DropTarget, OpenOutcome, Workspace};

mod render;

#[derive(Parser)]
#[command(name = "story-maker")]
#[command(about = "Story Maker - plan scenes, characters and research from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project database (defaults to $STORY_MAKER_DB, then the user data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects, most recently updated first
    List,

    /// Create a new project
    New {
        /// Project name
        name: Option<String>,
    },

    /// Show a project outline
    Show {
        project: String,

        /// Print the stored document as JSON
        #[arg(long)]
        json: bool,

        /// Print scene prose in draft order
        #[arg(long)]
        text: bool,
    },

    /// Rename a project
    Rename { project: String, name: String },

    /// Delete a project
    Delete {
        project: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Work with scenes
    Scene {
        project: String,
        #[command(subcommand)]
        action: SceneAction,
    },

    /// Work with character sheets
    Character {
        project: String,
        #[command(subcommand)]
        action: CharacterAction,
    },

    /// Research notes
    Note {
        project: String,
        #[command(subcommand)]
        action: NoteAction,
    },

    /// Research links
    Link {
        project: String,
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Research images
    Image {
        project: String,
        #[command(subcommand)]
        action: ImageAction,
    },
}

#[derive(Subcommand)]
enum SceneAction {
    /// Corkboard view: scenes in draft order with word counts
    List,
    /// Append a scene
    Add {
        #[arg(long)]
        title: Option<String>,

        /// Scene prose; one paragraph per line
        #[arg(long)]
        text: Option<String>,
    },
    /// Edit a scene's title or prose
    Edit {
        scene: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Delete a scene
    Remove {
        scene: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a scene in front of another
    Move {
        scene: String,
        #[arg(long)]
        before: String,
    },
}

#[derive(Subcommand)]
enum CharacterAction {
    /// Add a character
    Add {
        #[arg(long)]
        name: Option<String>,
    },
    /// Edit character sheet fields
    Edit {
        character: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        appearance: Option<String>,
        #[arg(long)]
        flaws: Option<String>,
        #[arg(long)]
        goals: Option<String>,
        #[arg(long)]
        arc: Option<String>,
    },
    /// Show a character sheet
    Show { character: String },
    /// Delete a character
    Remove {
        character: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum NoteAction {
    Add { text: Option<String> },
    Edit { note: String, text: String },
    Remove { note: String },
}

#[derive(Subcommand)]
enum LinkAction {
    Add { url: String },
    Remove { link: String },
}

#[derive(Subcommand)]
enum ImageAction {
    /// Import image files, in order
    Import { files: Vec<PathBuf> },
    /// Attach an image to a scene or character
    Attach {
        image: String,
        #[arg(long, conflicts_with = "character", required_unless_present = "character")]
        scene: Option<String>,
        #[arg(long)]
        character: Option<String>,
    },
    /// Delete an image; attachments keep pointing at it and are skipped on display
    Remove { image: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = StoreConfig::resolve(cli.db);
    debug!(db = %config.db_path.display(), "using project database");
    let backend = SqliteStore::open_or_create(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let store = ProjectStore::new(backend);
    let mut dashboard = Dashboard::new(&store);

    match cli.command {
        Commands::List => {
            render::dashboard(&dashboard.cards(now_millis()));
            Ok(())
        }
        Commands::New { name } => {
            let ws = dashboard.create_project(name.as_deref())?;
            info!(project = %ws.project().id, "created project");
            println!("{}", ws.project().id);
            Ok(())
        }
        Commands::Delete { project, yes } => {
            let id = ProjectId::from(project);
            if !dashboard.is_listed(&id) {
                println!("No project {id}. Known projects:");
                render::dashboard(&dashboard.cards(now_millis()));
                return Ok(());
            }
            dashboard.request_delete(id.clone());
            if confirm(
                "Delete project? This removes it from local storage and cannot be undone.",
                yes,
            )? {
                dashboard.confirm_delete()?;
                println!("Deleted {id}.");
            } else {
                dashboard.cancel_delete();
            }
            Ok(())
        }
        Commands::Show {
            project,
            json,
            text,
        } => with_project(&dashboard, &project, |ws| {
            if json {
                println!("{}", serde_json::to_string_pretty(ws.project())?);
            } else if text {
                render::scene_text(ws);
            } else {
                render::project(ws, now_millis());
            }
            Ok(())
        }),
        Commands::Rename { project, name } => {
            with_project(&dashboard, &project, |ws| Ok(ws.rename(&name)?))
        }
        Commands::Scene { project, action } => {
            with_project(&dashboard, &project, |ws| scene_command(ws, action))
        }
        Commands::Character { project, action } => {
            with_project(&dashboard, &project, |ws| character_command(ws, action))
        }
        Commands::Note { project, action } => {
            with_project(&dashboard, &project, |ws| note_command(ws, action))
        }
        Commands::Link { project, action } => {
            with_project(&dashboard, &project, |ws| link_command(ws, action))
        }
        Commands::Image { project, action } => {
            let Some(mut ws) = open_or_list(&dashboard, &project) else {
                return Ok(());
            };
            image_command(&mut ws, action).await
        }
    }
}

/// Unknown projects fall back to the dashboard listing.
fn open_or_list<'s, S: KeyValueStore>(
    dashboard: &Dashboard<'s, S>,
    project: &str,
) -> Option<Workspace<'s, S>> {
    match dashboard.open(&ProjectId::from(project)) {
        OpenOutcome::Opened(ws) => Some(ws),
        OpenOutcome::Redirect => {
            println!("No project {project}. Known projects:");
            render::dashboard(&dashboard.cards(now_millis()));
            None
        }
    }
}

fn with_project<S: KeyValueStore>(
    dashboard: &Dashboard<'_, S>,
    project: &str,
    f: impl FnOnce(&mut Workspace<'_, S>) -> Result<()>,
) -> Result<()> {
    match open_or_list(dashboard, project) {
        Some(mut ws) => f(&mut ws),
        None => Ok(()),
    }
}

fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

fn scene_command<S: KeyValueStore>(ws: &mut Workspace<'_, S>, action: SceneAction) -> Result<()> {
    match action {
        SceneAction::List => render::scene_cards(&ws.scene_cards()),
        SceneAction::Add { title, text } => {
            let id = ws.add_scene()?;
            let patch = ScenePatch {
                title,
                text: text.as_deref().map(SceneText::from_plain),
                image_ids: None,
            };
            if !patch.is_empty() {
                ws.update_scene(&id, patch)?;
            }
            println!("{id}");
        }
        SceneAction::Edit { scene, title, text } => {
            let Some(mut edit) = ws.edit_scene(&SceneId::from(scene.as_str())) else {
                println!("No scene {scene}.");
                return Ok(());
            };
            if let Some(title) = title {
                edit.title = title;
            }
            if let Some(text) = text {
                edit.text = SceneText::from_plain(&text);
            }
            if !ws.commit_scene_edit(edit)? {
                println!("Nothing changed.");
            }
        }
        SceneAction::Remove { scene, yes } => {
            if !ws.request_scene_delete(&SceneId::from(scene.as_str())) {
                println!("No scene {scene}.");
                return Ok(());
            }
            let prompt = pending_prompt(ws);
            if confirm(&prompt, yes)? {
                ws.confirm_delete()?;
            } else {
                ws.cancel_delete();
            }
        }
        SceneAction::Move { scene, before } => {
            let moved = SceneId::from(scene);
            let target = DropTarget::DraftScene(SceneId::from(before));
            ws.drag_start(DragPayload::Scene(moved));
            let moved = ws.drag_over(target.clone()) && ws.drop_on(&target)?;
            ws.drag_end();
            if !moved {
                println!("Order unchanged.");
            }
        }
    }
    Ok(())
}

fn character_command<S: KeyValueStore>(
    ws: &mut Workspace<'_, S>,
    action: CharacterAction,
) -> Result<()> {
    match action {
        CharacterAction::Add { name } => {
            let id = ws.add_character()?;
            if let Some(name) = name {
                let patch = CharacterPatch {
                    name: Some(name),
                    ..CharacterPatch::default()
                };
                ws.update_character(&id, patch)?;
            }
            println!("{id}");
        }
        CharacterAction::Edit {
            character,
            name,
            age,
            appearance,
            flaws,
            goals,
            arc,
        } => {
            let id = CharacterId::from(character);
            let patch = CharacterPatch {
                name,
                age,
                appearance,
                flaws,
                goals,
                arc,
                image_ids: None,
            };
            if ws.project().character(&id).is_none() {
                println!("No character {id}.");
            } else if patch.is_empty() {
                println!("Nothing changed.");
            } else {
                ws.update_character(&id, patch)?;
            }
        }
        CharacterAction::Show { character } => {
            let id = CharacterId::from(character);
            if ws.select_character(&id) {
                if let Some(selected) = ws.selected_character().cloned() {
                    render::character(ws, &selected);
                }
            } else {
                println!("No character {id}.");
            }
        }
        CharacterAction::Remove { character, yes } => {
            if !ws.request_character_delete(&CharacterId::from(character.as_str())) {
                println!("No character {character}.");
                return Ok(());
            }
            let prompt = pending_prompt(ws);
            if confirm(&prompt, yes)? {
                ws.confirm_delete()?;
            } else {
                ws.cancel_delete();
            }
        }
    }
    Ok(())
}

fn note_command<S: KeyValueStore>(ws: &mut Workspace<'_, S>, action: NoteAction) -> Result<()> {
    match action {
        NoteAction::Add { text } => {
            let id = ws.add_note()?;
            if let Some(text) = text {
                ws.update_note(&id, &text)?;
            }
            println!("{id}");
        }
        NoteAction::Edit { note, text } => ws.update_note(&NoteId::from(note), &text)?,
        NoteAction::Remove { note } => ws.remove_note(&NoteId::from(note))?,
    }
    Ok(())
}

fn link_command<S: KeyValueStore>(ws: &mut Workspace<'_, S>, action: LinkAction) -> Result<()> {
    match action {
        LinkAction::Add { url } => match ws.add_link(&url)? {
            Some(id) => println!("{id}"),
            None => println!("Link is empty; nothing added."),
        },
        LinkAction::Remove { link } => ws.remove_link(&LinkId::from(link))?,
    }
    Ok(())
}

async fn image_command<S: KeyValueStore>(
    ws: &mut Workspace<'_, S>,
    action: ImageAction,
) -> Result<()> {
    match action {
        ImageAction::Import { files } => {
            let ids = ws.import_images(&files).await?;
            if ids.len() < files.len() {
                eprintln!(
                    "Imported {} of {} files; run with --verbose for details.",
                    ids.len(),
                    files.len()
                );
            }
            for id in ids {
                println!("{id}");
            }
        }
        ImageAction::Attach {
            image,
            scene,
            character,
        } => {
            let target = match (scene, character) {
                (Some(scene), _) => DropTarget::SceneImages(SceneId::from(scene)),
                (None, Some(character)) => {
                    DropTarget::CharacterImages(CharacterId::from(character))
                }
                (None, None) => anyhow::bail!("pass --scene or --character"),
            };
            let image = ImageId::from(image);
            if ws.project().image(&image).is_none() {
                println!("No image {image}.");
                return Ok(());
            }
            ws.drag_start(DragPayload::Image(image));
            let attached = ws.drop_on(&target)?;
            ws.drag_end();
            if !attached {
                println!("Already attached, or no such scene/character.");
            }
        }
        ImageAction::Remove { image } => ws.remove_image(&ImageId::from(image))?,
    }
    Ok(())
}

fn pending_prompt<S: KeyValueStore>(ws: &Workspace<'_, S>) -> String {
    match ws.session().pending_delete() {
        Some(request) if !request.title.is_empty() => {
            format!("{} \"{}\" cannot be restored.", request.prompt(), request.title)
        }
        Some(request) => format!("{} This cannot be undone.", request.prompt()),
        None => String::new(),
    }
}
