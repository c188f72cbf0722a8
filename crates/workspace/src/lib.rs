//! Session layer of the story tool: the dashboard, the per-project workspace
//! that funnels every edit through one persist step, and drag-and-drop between
//! research images, scenes and characters.

use thiserror::Error;

mod dashboard;
pub use dashboard::*;
pub mod dnd;
pub use dnd::{DragCoordinator, DragPayload, DropTarget};
pub mod images;
mod session;
pub use session::*;
mod workspace;
pub use workspace::*;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Story(#[from] story::StoryError),
    #[error("failed to persist project: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T, E = WorkspaceError> = std::result::Result<T, E>;
