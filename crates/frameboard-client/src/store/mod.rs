//! Store abstraction over the diagram persistence backend.

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use frameboard_core::model::{
    Component, ComponentCreate, ComponentId, ComponentPatch, Frame, FrameId, Project, ProjectId,
};
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Server returned status {status}")]
    Http { status: u16 },
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("Store error: {0}")]
    Other(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for diagram persistence backends.
///
/// Calls block until the backend answers and are never retried; a failed
/// call is terminal for that one action. Implementations must be `Send` so
/// a background worker thread can own them.
pub trait FrameStore: Send {
    /// Check that the backend is reachable.
    fn health(&self) -> StoreResult<()>;

    /// List all projects.
    fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Fetch a single project.
    fn get_project(&self, id: ProjectId) -> StoreResult<Project>;

    /// Create a project.
    fn create_project(&self, name: &str) -> StoreResult<Project>;

    /// Rename a project.
    fn rename_project(&self, id: ProjectId, name: &str) -> StoreResult<Project>;

    /// Delete a project and everything in it.
    fn delete_project(&self, id: ProjectId) -> StoreResult<()>;

    /// List frames, optionally restricted to one project.
    ///
    /// Frame responses embed their full component lists.
    fn list_frames(&self, project: Option<ProjectId>) -> StoreResult<Vec<Frame>>;

    /// Create a frame in a project.
    fn create_frame(&self, name: &str, project: ProjectId) -> StoreResult<Frame>;

    /// Rename a frame.
    fn rename_frame(&self, id: FrameId, name: &str) -> StoreResult<Frame>;

    /// Delete a frame and its components.
    fn delete_frame(&self, id: FrameId) -> StoreResult<()>;

    /// Create a component.
    fn create_component(&self, create: &ComponentCreate) -> StoreResult<Component>;

    /// Apply a partial update to a component.
    fn update_component(&self, id: ComponentId, patch: &ComponentPatch) -> StoreResult<Component>;

    /// Delete a component.
    fn delete_component(&self, id: ComponentId) -> StoreResult<()>;
}
