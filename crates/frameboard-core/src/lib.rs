//! Frameboard Core Library
//!
//! Platform-agnostic editor state and geometry for Frameboard diagrams.

pub mod camera;
pub mod config;
pub mod connection;
pub mod editor;
pub mod input;
pub mod model;
pub mod scene;
pub mod tools;

pub use camera::Camera;
pub use config::{EditorConfig, PlacementSize};
pub use connection::{ConnectionGeometry, connection_geometry, resolve_connection};
pub use editor::{Editor, EditorEvent};
pub use input::{KeyEvent, MouseButton, PointerEvent, ScrollUnit};
pub use model::{
    Component, ComponentCreate, ComponentId, ComponentKind, ComponentPatch, Frame, FrameId,
    Project, ProjectId,
};
pub use scene::{Primitive, SceneStyle};
pub use tools::{Tool, ToolState};
