//! Project document model for the story workspace: characters, scenes and
//! research, plus the pure commands every view uses to change them.

use thiserror::Error;

mod ids;
pub use ids::*;
mod model;
pub use model::*;
mod text;
pub use text::*;
mod commands;
pub use commands::*;
mod display;
pub use display::*;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryError {
    #[error("{kind} already exists: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("link url is empty")]
    EmptyLink,
}

impl StoryError {
    pub(crate) fn duplicate(kind: &'static str, id: &str) -> Self {
        Self::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }
}
