//! Editor controller for one mounted frame view.
//!
//! A single [`Editor`] owns the camera, tool state, selection, and any
//! in-progress pointer gesture. Every click routes to exactly one of the
//! shape-level or canvas-level paths, decided by a front-to-back hit test.
//! Mutating intents come back as [`EditorEvent`]s; the editor completes its
//! local transition without waiting on what the host does with them.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::input::{KeyEvent, MouseButton, PointerEvent, ScrollUnit};
use crate::model::{Component, ComponentCreate, ComponentId, ComponentPatch, Frame};
use crate::tools::{Tool, ToolState};
use kurbo::{Point, Rect, Vec2};

/// Typed events emitted by the editor toward its host.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Request creation of a component.
    Create(ComponentCreate),
    /// Request a partial update of a component.
    Update {
        id: ComponentId,
        patch: ComponentPatch,
    },
    /// The selected component changed.
    SelectionChanged(Option<ComponentId>),
    /// A context menu was requested for a component at a screen position.
    ContextMenu { id: ComponentId, screen: Point },
}

/// In-progress pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    None,
    /// Dragging a shape. The grab offset keeps the pointer anchored to the
    /// same spot on the shape at any zoom level.
    MoveShape {
        id: ComponentId,
        grab_offset: Vec2,
        moved: bool,
    },
    /// Panning the camera.
    Pan { last: Point },
}

/// Runtime editor state for one frame view (not persisted).
#[derive(Debug, Clone)]
pub struct Editor {
    pub camera: Camera,
    pub config: EditorConfig,
    tool: ToolState,
    selection: Option<ComponentId>,
    gesture: Gesture,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            camera: Camera::new(),
            config: EditorConfig::default(),
            tool: ToolState::Idle,
            selection: None,
            gesture: Gesture::None,
        }
    }
}

impl Editor {
    /// Create an editor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor with the given configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current tool state.
    pub fn tool_state(&self) -> ToolState {
        self.tool
    }

    /// Toolbar click: arm the tool, or disarm when it is already armed.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool.toggle(tool);
    }

    /// Currently selected component, if any.
    pub fn selection(&self) -> Option<ComponentId> {
        self.selection
    }

    /// Dispatch a pointer event to the matching handler.
    pub fn handle_pointer_event(
        &mut self,
        event: &PointerEvent,
        viewport: Rect,
        frame: &Frame,
    ) -> Vec<EditorEvent> {
        match *event {
            PointerEvent::Down { position, button } => {
                self.pointer_down(position, button, viewport, frame)
            }
            PointerEvent::Up { position } => self.pointer_up(position, viewport, frame),
            PointerEvent::Move { position } => self.pointer_move(position, viewport, frame),
            PointerEvent::Scroll { delta_y, unit } => {
                self.wheel(delta_y, unit);
                Vec::new()
            }
        }
    }

    /// Dispatch a key event. Escape cancels the armed tool and any gesture.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        if let KeyEvent::Pressed(key) = event {
            if key == "Escape" {
                self.cancel();
            }
        }
    }

    /// Cancel the armed tool, pending connection source, and gesture.
    pub fn cancel(&mut self) {
        self.tool.cancel();
        self.gesture = Gesture::None;
    }

    /// Handle a pointer press.
    pub fn pointer_down(
        &mut self,
        screen: Point,
        button: MouseButton,
        viewport: Rect,
        frame: &Frame,
    ) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        let world = self.camera.screen_to_world(screen, viewport);
        // Topmost shape wins; connections are transparent to clicks.
        let hit = frame.components.iter().rev().find(|c| c.hit_test(world));

        match button {
            MouseButton::Right => {
                if let Some(component) = hit {
                    events.push(EditorEvent::ContextMenu {
                        id: component.id,
                        screen,
                    });
                }
            }
            MouseButton::Left => match hit {
                Some(component) => self.shape_pressed(component, world, frame, &mut events),
                None => self.canvas_pressed(world, screen, frame, &mut events),
            },
            MouseButton::Middle => {
                self.gesture = Gesture::Pan { last: screen };
            }
        }
        events
    }

    fn shape_pressed(
        &mut self,
        component: &Component,
        world: Point,
        frame: &Frame,
        events: &mut Vec<EditorEvent>,
    ) {
        if self.tool.is_connecting() {
            if let Some((source_id, _)) = self.tool.shape_click(component.id) {
                match frame.component(source_id) {
                    Some(source) => {
                        events.push(EditorEvent::Create(ComponentCreate::connection_between(
                            frame.id, source, component,
                        )));
                    }
                    None => {
                        log::warn!(
                            "connection source {source_id} disappeared before the target click"
                        );
                    }
                }
            }
            return;
        }

        // Idle or placing: a shape click selects and starts a move.
        if self.selection != Some(component.id) {
            self.selection = Some(component.id);
            events.push(EditorEvent::SelectionChanged(self.selection));
        }
        self.gesture = Gesture::MoveShape {
            id: component.id,
            grab_offset: component.center() - world,
            moved: false,
        };
    }

    fn canvas_pressed(
        &mut self,
        world: Point,
        screen: Point,
        frame: &Frame,
        events: &mut Vec<EditorEvent>,
    ) {
        if !self.tool.is_idle() {
            if let Some(kind) = self.tool.canvas_click() {
                let size = self.config.placement_size.resolve(&self.camera);
                events.push(EditorEvent::Create(ComponentCreate::shape(
                    frame.id, kind, world, size,
                )));
            }
            // Tool clicks never start a pan gesture.
            return;
        }

        if self.selection.is_some() {
            self.selection = None;
            events.push(EditorEvent::SelectionChanged(None));
        }
        self.gesture = Gesture::Pan { last: screen };
    }

    /// Handle pointer movement during a gesture.
    pub fn pointer_move(
        &mut self,
        screen: Point,
        viewport: Rect,
        frame: &Frame,
    ) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        match self.gesture {
            Gesture::MoveShape {
                id, grab_offset, ..
            } => {
                if frame.component(id).is_none() {
                    // Shape deleted mid-drag.
                    self.gesture = Gesture::None;
                    return events;
                }
                let world = self.camera.screen_to_world(screen, viewport);
                self.gesture = Gesture::MoveShape {
                    id,
                    grab_offset,
                    moved: true,
                };
                events.push(EditorEvent::Update {
                    id,
                    patch: ComponentPatch::position(world + grab_offset),
                });
            }
            Gesture::Pan { last } => {
                self.camera.pan_by_screen(screen - last, viewport);
                self.gesture = Gesture::Pan { last: screen };
            }
            Gesture::None => {}
        }
        events
    }

    /// Handle pointer release, emitting the final position of a moved shape.
    pub fn pointer_up(&mut self, screen: Point, viewport: Rect, frame: &Frame) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if let Gesture::MoveShape {
            id,
            grab_offset,
            moved: true,
        } = self.gesture
        {
            if frame.component(id).is_some() {
                let world = self.camera.screen_to_world(screen, viewport);
                events.push(EditorEvent::Update {
                    id,
                    patch: ComponentPatch::position(world + grab_offset),
                });
            }
        }
        self.gesture = Gesture::None;
        events
    }

    /// Apply a wheel-zoom step.
    pub fn wheel(&mut self, delta_y: f64, unit: ScrollUnit) {
        self.camera.apply_wheel_zoom(delta_y, unit);
    }

    /// Reconcile editor state after the frame was refreshed.
    ///
    /// Selection, pending connection source, and drag targets that no
    /// longer exist are dropped.
    pub fn sync_frame(&mut self, frame: &Frame) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if let Some(id) = self.selection {
            if frame.component(id).is_none() {
                self.selection = None;
                events.push(EditorEvent::SelectionChanged(None));
            }
        }
        if let Some(id) = self.tool.pending_source() {
            if frame.component(id).is_none() {
                self.tool = ToolState::AwaitingSource;
            }
        }
        if let Gesture::MoveShape { id, .. } = self.gesture {
            if frame.component(id).is_none() {
                self.gesture = Gesture::None;
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentKind, PROP_SOURCE_ID, PROP_TARGET_ID};
    use serde_json::Value;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    fn shape(id: ComponentId, kind: ComponentKind, x: f64, y: f64, size: f64) -> Component {
        Component {
            id,
            frame_id: 9,
            name: kind.default_name(),
            kind,
            x,
            y,
            width: size,
            height: size,
            properties: serde_json::Map::new(),
        }
    }

    fn frame_with(components: Vec<Component>) -> Frame {
        Frame {
            id: 9,
            name: "frame".into(),
            project_id: 1,
            components,
        }
    }

    // Two small shapes inside the default view (world span is ±0.1).
    fn two_shapes() -> Frame {
        frame_with(vec![
            shape(1, ComponentKind::Circle, -0.05, 0.0, 0.02),
            shape(2, ComponentKind::Rectangle, 0.05, 0.0, 0.02),
        ])
    }

    fn screen_at(editor: &Editor, world: Point) -> Point {
        editor.camera.world_to_screen(world, VIEWPORT)
    }

    fn creates(events: &[EditorEvent]) -> Vec<&ComponentCreate> {
        events
            .iter()
            .filter_map(|e| match e {
                EditorEvent::Create(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_canvas_click_places_armed_shape() {
        let mut editor = Editor::new();
        let frame = frame_with(vec![]);
        editor.set_tool(Tool::Circle);

        let events = editor.pointer_down(
            Point::new(400.0, 300.0),
            MouseButton::Left,
            VIEWPORT,
            &frame,
        );
        let created = creates(&events);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].kind, ComponentKind::Circle);
        assert!(created[0].x.abs() < 1e-9);
        assert!(created[0].y.abs() < 1e-9);
        // 10% of the 0.2 view extent at default zoom.
        assert!((created[0].width - 0.02).abs() < 1e-12);
        assert!(editor.tool_state().is_idle());

        // The tool disarmed, so a second click places nothing.
        let events = editor.pointer_down(
            Point::new(200.0, 200.0),
            MouseButton::Left,
            VIEWPORT,
            &frame,
        );
        assert!(creates(&events).is_empty());
    }

    #[test]
    fn test_toggle_off_places_nothing() {
        let mut editor = Editor::new();
        let frame = frame_with(vec![]);
        editor.set_tool(Tool::Circle);
        editor.set_tool(Tool::Circle);

        let events = editor.pointer_down(
            Point::new(400.0, 300.0),
            MouseButton::Left,
            VIEWPORT,
            &frame,
        );
        assert!(creates(&events).is_empty());
    }

    #[test]
    fn test_shape_click_selects_instead_of_placing() {
        let mut editor = Editor::new();
        let frame = two_shapes();
        editor.set_tool(Tool::Circle);

        let at = screen_at(&editor, Point::new(-0.05, 0.0));
        let events = editor.pointer_down(at, MouseButton::Left, VIEWPORT, &frame);

        assert!(creates(&events).is_empty());
        assert!(events.contains(&EditorEvent::SelectionChanged(Some(1))));
        // The tool stays armed for the next canvas click.
        assert_eq!(editor.tool_state(), ToolState::Placing(ComponentKind::Circle));
    }

    #[test]
    fn test_connection_same_shape_cancels() {
        let mut editor = Editor::new();
        let frame = two_shapes();
        editor.set_tool(Tool::Connection);

        let at = screen_at(&editor, Point::new(-0.05, 0.0));
        let first = editor.pointer_down(at, MouseButton::Left, VIEWPORT, &frame);
        let second = editor.pointer_down(at, MouseButton::Left, VIEWPORT, &frame);

        assert!(first.is_empty());
        assert!(second.is_empty());
        assert_eq!(editor.tool_state(), ToolState::AwaitingSource);
    }

    #[test]
    fn test_connection_between_two_shapes() {
        let mut editor = Editor::new();
        let frame = two_shapes();
        editor.set_tool(Tool::Connection);

        let source = screen_at(&editor, Point::new(-0.05, 0.0));
        let target = screen_at(&editor, Point::new(0.05, 0.0));
        editor.pointer_down(source, MouseButton::Left, VIEWPORT, &frame);
        let events = editor.pointer_down(target, MouseButton::Left, VIEWPORT, &frame);

        let created = creates(&events);
        assert_eq!(created.len(), 1);
        let create = created[0];
        assert_eq!(create.kind, ComponentKind::Connection);
        assert_eq!(create.properties[PROP_SOURCE_ID], Value::from(1));
        assert_eq!(create.properties[PROP_TARGET_ID], Value::from(2));
        assert!(create.x.abs() < 1e-9);
        assert!((create.width - 0.1).abs() < 1e-9);
        // Re-armed for the next pair.
        assert_eq!(editor.tool_state(), ToolState::AwaitingSource);
    }

    #[test]
    fn test_connection_canvas_click_drops_source_only() {
        let mut editor = Editor::new();
        let frame = two_shapes();
        editor.set_tool(Tool::Connection);

        let source = screen_at(&editor, Point::new(-0.05, 0.0));
        editor.pointer_down(source, MouseButton::Left, VIEWPORT, &frame);
        let events = editor.pointer_down(
            Point::new(400.0, 50.0),
            MouseButton::Left,
            VIEWPORT,
            &frame,
        );

        assert!(events.is_empty());
        assert_eq!(editor.tool_state(), ToolState::AwaitingSource);

        // The flow recovers with a fresh pair.
        let target = screen_at(&editor, Point::new(0.05, 0.0));
        editor.pointer_down(source, MouseButton::Left, VIEWPORT, &frame);
        let events = editor.pointer_down(target, MouseButton::Left, VIEWPORT, &frame);
        assert_eq!(creates(&events).len(), 1);
    }

    #[test]
    fn test_escape_cancels_tool() {
        let mut editor = Editor::new();
        let frame = two_shapes();
        editor.set_tool(Tool::Connection);
        let at = screen_at(&editor, Point::new(-0.05, 0.0));
        editor.pointer_down(at, MouseButton::Left, VIEWPORT, &frame);

        editor.handle_key_event(&KeyEvent::Pressed("Escape".into()));
        assert_eq!(editor.tool_state(), ToolState::Idle);
    }

    #[test]
    fn test_drag_maps_through_viewport() {
        let mut editor = Editor::new();
        let frame = two_shapes();

        // Grab circle 1 slightly right of its center.
        let grab_world = Point::new(-0.045, 0.0);
        let down = screen_at(&editor, grab_world);
        editor.pointer_down(down, MouseButton::Left, VIEWPORT, &frame);

        // 10 px right is 10 * 0.2 / 800 = 0.0025 world units at zoom 50.
        let events = editor.pointer_move(down + Vec2::new(10.0, 0.0), VIEWPORT, &frame);
        assert_eq!(events.len(), 1);
        match &events[0] {
            EditorEvent::Update { id, patch } => {
                assert_eq!(*id, 1);
                assert!((patch.x.unwrap() + 0.0475).abs() < 1e-9);
                assert!(patch.y.unwrap().abs() < 1e-9);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_drag_scale_follows_zoom() {
        let mut editor = Editor::new();
        editor.camera.zoom = 100.0;
        let frame = frame_with(vec![shape(1, ComponentKind::Circle, 0.0, 0.0, 0.02)]);

        let down = screen_at(&editor, Point::ZERO);
        editor.pointer_down(down, MouseButton::Left, VIEWPORT, &frame);
        let events = editor.pointer_move(down + Vec2::new(10.0, 0.0), VIEWPORT, &frame);

        // Half the world delta of zoom 50: 10 * 0.1 / 800.
        match &events[0] {
            EditorEvent::Update { patch, .. } => {
                assert!((patch.x.unwrap() - 0.00125).abs() < 1e-9);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_pointer_up_emits_final_position_once_moved() {
        let mut editor = Editor::new();
        let frame = two_shapes();
        let down = screen_at(&editor, Point::new(-0.05, 0.0));

        editor.pointer_down(down, MouseButton::Left, VIEWPORT, &frame);
        let up = editor.pointer_up(down, VIEWPORT, &frame);
        assert!(up.is_empty());

        editor.pointer_down(down, MouseButton::Left, VIEWPORT, &frame);
        editor.pointer_move(down + Vec2::new(4.0, 0.0), VIEWPORT, &frame);
        let up = editor.pointer_up(down + Vec2::new(8.0, 0.0), VIEWPORT, &frame);
        assert_eq!(up.len(), 1);
    }

    #[test]
    fn test_empty_canvas_click_clears_selection_and_pans() {
        let mut editor = Editor::new();
        let frame = two_shapes();

        let at = screen_at(&editor, Point::new(-0.05, 0.0));
        editor.pointer_down(at, MouseButton::Left, VIEWPORT, &frame);
        editor.pointer_up(at, VIEWPORT, &frame);
        assert_eq!(editor.selection(), Some(1));

        let events = editor.pointer_down(
            Point::new(400.0, 50.0),
            MouseButton::Left,
            VIEWPORT,
            &frame,
        );
        assert!(events.contains(&EditorEvent::SelectionChanged(None)));

        let before = editor.camera.target;
        editor.pointer_move(Point::new(420.0, 50.0), VIEWPORT, &frame);
        assert!((editor.camera.target.x - before.x).abs() > 0.0);
    }

    #[test]
    fn test_tool_click_does_not_pan() {
        let mut editor = Editor::new();
        let frame = frame_with(vec![]);
        editor.set_tool(Tool::Rectangle);

        editor.pointer_down(Point::new(100.0, 100.0), MouseButton::Left, VIEWPORT, &frame);
        let before = editor.camera.target;
        editor.pointer_move(Point::new(200.0, 200.0), VIEWPORT, &frame);
        assert_eq!(editor.camera.target, before);
    }

    #[test]
    fn test_right_click_requests_context_menu() {
        let mut editor = Editor::new();
        let frame = two_shapes();

        let at = screen_at(&editor, Point::new(0.05, 0.0));
        let events = editor.pointer_down(at, MouseButton::Right, VIEWPORT, &frame);
        assert_eq!(
            events,
            vec![EditorEvent::ContextMenu { id: 2, screen: at }]
        );

        let empty = editor.pointer_down(
            Point::new(400.0, 50.0),
            MouseButton::Right,
            VIEWPORT,
            &frame,
        );
        assert!(empty.is_empty());
    }

    #[test]
    fn test_sync_frame_drops_dangling_state() {
        let mut editor = Editor::new();
        let frame = two_shapes();
        let at = screen_at(&editor, Point::new(-0.05, 0.0));
        editor.pointer_down(at, MouseButton::Left, VIEWPORT, &frame);
        assert_eq!(editor.selection(), Some(1));

        let refreshed = frame_with(vec![shape(2, ComponentKind::Rectangle, 0.05, 0.0, 0.02)]);
        let events = editor.sync_frame(&refreshed);
        assert_eq!(events, vec![EditorEvent::SelectionChanged(None)]);
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_drag_survives_component_deletion() {
        let mut editor = Editor::new();
        let frame = two_shapes();
        let at = screen_at(&editor, Point::new(-0.05, 0.0));
        editor.pointer_down(at, MouseButton::Left, VIEWPORT, &frame);

        let without = frame_with(vec![shape(2, ComponentKind::Rectangle, 0.05, 0.0, 0.02)]);
        let events = editor.pointer_move(at + Vec2::new(10.0, 0.0), VIEWPORT, &without);
        assert!(events.is_empty());
        let events = editor.pointer_up(at + Vec2::new(10.0, 0.0), VIEWPORT, &without);
        assert!(events.is_empty());
    }

    #[test]
    fn test_topmost_shape_wins() {
        let mut editor = Editor::new();
        // Two overlapping shapes; the later one is on top.
        let frame = frame_with(vec![
            shape(1, ComponentKind::Circle, 0.0, 0.0, 0.04),
            shape(2, ComponentKind::Circle, 0.0, 0.0, 0.04),
        ]);

        let at = screen_at(&editor, Point::ZERO);
        let events = editor.pointer_down(at, MouseButton::Left, VIEWPORT, &frame);
        assert!(events.contains(&EditorEvent::SelectionChanged(Some(2))));
    }
}
