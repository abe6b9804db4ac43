//! Tool system for shape placement and connection drawing.
//!
//! The armed tool and any pending connection source live in a single
//! [`ToolState`] value; there is no out-of-band pending state to clear.

use crate::model::{ComponentId, ComponentKind};
use serde::{Deserialize, Serialize};

/// Tools available in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    Circle,
    Triangle,
    Rectangle,
    Connection,
}

impl Tool {
    /// The component kind this tool places, if it is a shape tool.
    pub fn shape_kind(&self) -> Option<ComponentKind> {
        match self {
            Tool::Circle => Some(ComponentKind::Circle),
            Tool::Triangle => Some(ComponentKind::Triangle),
            Tool::Rectangle => Some(ComponentKind::Rectangle),
            Tool::Connection => None,
        }
    }
}

/// Interaction state of the armed tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolState {
    /// No tool armed; clicks select and drag.
    #[default]
    Idle,
    /// A shape tool is armed; the next canvas click places this kind.
    Placing(ComponentKind),
    /// Connection tool armed, waiting for a source shape.
    AwaitingSource,
    /// Connection source chosen, waiting for a target shape.
    AwaitingTarget(ComponentId),
}

impl ToolState {
    /// The tool this state belongs to, if any.
    pub fn tool(&self) -> Option<Tool> {
        match self {
            ToolState::Idle => None,
            ToolState::Placing(ComponentKind::Circle) => Some(Tool::Circle),
            ToolState::Placing(ComponentKind::Triangle) => Some(Tool::Triangle),
            ToolState::Placing(ComponentKind::Rectangle) => Some(Tool::Rectangle),
            ToolState::Placing(ComponentKind::Connection)
            | ToolState::AwaitingSource
            | ToolState::AwaitingTarget(_) => Some(Tool::Connection),
        }
    }

    /// Whether no tool is armed.
    pub fn is_idle(&self) -> bool {
        matches!(self, ToolState::Idle)
    }

    /// Whether the connection tool is armed.
    pub fn is_connecting(&self) -> bool {
        matches!(self, ToolState::AwaitingSource | ToolState::AwaitingTarget(_))
    }

    /// Pending connection source, if one is chosen.
    pub fn pending_source(&self) -> Option<ComponentId> {
        match self {
            ToolState::AwaitingTarget(id) => Some(*id),
            _ => None,
        }
    }

    /// Toolbar click: arm the tool, or disarm when it is already armed.
    ///
    /// Switching from connection mode drops any pending source.
    pub fn toggle(&mut self, tool: Tool) {
        if self.tool() == Some(tool) {
            *self = ToolState::Idle;
            return;
        }
        *self = match tool.shape_kind() {
            Some(kind) => ToolState::Placing(kind),
            None => ToolState::AwaitingSource,
        };
    }

    /// Escape: drop the armed tool and any pending source.
    pub fn cancel(&mut self) {
        *self = ToolState::Idle;
    }

    /// Click on empty canvas. Returns the kind to place, if any.
    ///
    /// Placing a shape disarms the tool. In connection mode an empty-canvas
    /// click only drops the pending source; the tool stays armed.
    pub fn canvas_click(&mut self) -> Option<ComponentKind> {
        match *self {
            ToolState::Placing(kind) => {
                *self = ToolState::Idle;
                Some(kind)
            }
            ToolState::AwaitingTarget(_) => {
                *self = ToolState::AwaitingSource;
                None
            }
            _ => None,
        }
    }

    /// Click on a shape while the connection tool is armed.
    ///
    /// The first click records the source. A second click on the same shape
    /// cancels back to awaiting a source; a different shape completes the
    /// pair and re-arms for the next connection.
    pub fn shape_click(&mut self, id: ComponentId) -> Option<(ComponentId, ComponentId)> {
        match *self {
            ToolState::AwaitingSource => {
                *self = ToolState::AwaitingTarget(id);
                None
            }
            ToolState::AwaitingTarget(source) if source == id => {
                *self = ToolState::AwaitingSource;
                None
            }
            ToolState::AwaitingTarget(source) => {
                *self = ToolState::AwaitingSource;
                Some((source, id))
            }
            _ => None,
        }
    }
}
