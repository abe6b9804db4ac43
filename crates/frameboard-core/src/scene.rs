//! Display-list building for rendering a frame.
//!
//! The renderer is an external capability; this module turns a frame plus
//! camera into renderer-agnostic primitives in world coordinates. Dangling
//! connections are omitted silently so a render pass never fails because a
//! referenced component was deleted.

use crate::camera::Camera;
use crate::connection::{connection_geometry, resolve_endpoints};
use crate::model::{Component, ComponentId, ComponentKind, Frame};
use kurbo::{Point, Rect, Size};
use peniko::Color;

/// Arrowhead size as a fraction of the target anchor radius.
pub const ARROW_HEAD_RATIO: f64 = 0.4;

/// Minimum number of minor grid divisions across the view. The spacing
/// snaps to powers of ten, so the actual count stays below ten times this.
const GRID_MIN_DIVISIONS: f64 = 10.0;

/// A renderer-agnostic draw primitive.
///
/// Geometry is in world coordinates; stroke widths are screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    Polygon {
        points: Vec<Point>,
        color: Color,
    },
    Segment {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
    },
}

/// Colors and stroke widths used when building a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStyle {
    /// Fill for unselected shapes.
    pub shape_color: Color,
    /// Fill for the selected shape.
    pub selected_color: Color,
    /// Connection shaft and arrowhead color.
    pub connection_color: Color,
    /// Connection shaft width in screen pixels.
    pub connection_width: f64,
    /// Whether to emit grid lines behind the diagram.
    pub show_grid: bool,
    pub grid_minor_color: Color,
    pub grid_major_color: Color,
    /// Color for the two axis lines through the origin.
    pub axis_color: Color,
    /// Grid line width in screen pixels.
    pub grid_width: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            shape_color: Color::from_rgba8(239, 68, 68, 255), // Red
            selected_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            connection_color: Color::from_rgba8(30, 30, 30, 255),
            connection_width: 2.0,
            show_grid: true,
            grid_minor_color: Color::from_rgba8(68, 68, 68, 255),
            grid_major_color: Color::from_rgba8(136, 136, 136, 255),
            axis_color: Color::from_rgba8(185, 28, 28, 255),
            grid_width: 1.0,
        }
    }
}

/// Build the display list for one render pass: grid, then shapes, then
/// connections on top.
pub fn build_frame_scene(
    frame: &Frame,
    selection: Option<ComponentId>,
    camera: &Camera,
    style: &SceneStyle,
) -> Vec<Primitive> {
    let mut primitives = if style.show_grid {
        grid_primitives(camera, style)
    } else {
        Vec::new()
    };

    for component in &frame.components {
        if component.is_connection() {
            continue;
        }
        primitives.push(shape_primitive(
            component,
            selection == Some(component.id),
            style,
        ));
    }
    for component in &frame.components {
        if component.is_connection() {
            connection_primitives(frame, component, style, &mut primitives);
        }
    }
    primitives
}

fn shape_primitive(component: &Component, selected: bool, style: &SceneStyle) -> Primitive {
    let color = if selected {
        style.selected_color
    } else {
        style.shape_color
    };
    match component.kind {
        ComponentKind::Triangle => Primitive::Polygon {
            points: component.triangle_points().to_vec(),
            color,
        },
        ComponentKind::Rectangle => Primitive::Rect {
            rect: Rect::from_center_size(
                component.center(),
                Size::new(component.width, component.height),
            ),
            color,
        },
        // Connections are filtered out by the caller.
        ComponentKind::Circle | ComponentKind::Connection => Primitive::Circle {
            center: component.center(),
            radius: component.anchor_radius(),
            color,
        },
    }
}

fn connection_primitives(
    frame: &Frame,
    connection: &Component,
    style: &SceneStyle,
    out: &mut Vec<Primitive>,
) {
    // Dangling endpoints render nothing rather than failing the pass.
    let Some((source, target)) = resolve_endpoints(frame, connection) else {
        return;
    };
    let geom = connection_geometry(source, target);

    out.push(Primitive::Segment {
        from: geom.start,
        to: geom.end,
        width: style.connection_width,
        color: style.connection_color,
    });

    let head = (target.anchor_radius() * ARROW_HEAD_RATIO).min(geom.length() / 2.0);
    if head > 0.0 {
        out.push(Primitive::Polygon {
            points: geom.arrow_head(head).to_vec(),
            color: style.connection_color,
        });
    }
}

/// Grid lines covering the visible world rect.
///
/// Spacing snaps to the power of ten that keeps at least
/// [`GRID_MIN_DIVISIONS`] lines in view, so the density follows the zoom
/// level. Every tenth line uses the major color and the origin axes use
/// the axis color.
pub fn grid_primitives(camera: &Camera, style: &SceneStyle) -> Vec<Primitive> {
    let rect = camera.visible_world_rect();
    let extent = rect.width();
    let mut out = Vec::new();
    if !extent.is_finite() || extent <= 0.0 {
        return out;
    }

    let step = 10f64.powf((extent / GRID_MIN_DIVISIONS).log10().floor());

    let i0 = (rect.x0 / step).floor() as i64;
    let i1 = (rect.x1 / step).ceil() as i64;
    for i in i0..=i1 {
        let x = i as f64 * step;
        out.push(Primitive::Segment {
            from: Point::new(x, rect.y0),
            to: Point::new(x, rect.y1),
            width: style.grid_width,
            color: grid_line_color(i, style),
        });
    }

    let j0 = (rect.y0 / step).floor() as i64;
    let j1 = (rect.y1 / step).ceil() as i64;
    for j in j0..=j1 {
        let y = j as f64 * step;
        out.push(Primitive::Segment {
            from: Point::new(rect.x0, y),
            to: Point::new(rect.x1, y),
            width: style.grid_width,
            color: grid_line_color(j, style),
        });
    }
    out
}

fn grid_line_color(index: i64, style: &SceneStyle) -> Color {
    if index == 0 {
        style.axis_color
    } else if index % 10 == 0 {
        style.grid_major_color
    } else {
        style.grid_minor_color
    }
}
