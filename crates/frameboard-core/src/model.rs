//! Data model for projects, frames, and diagram components.
//!
//! These types mirror the backend's wire format: ids are serial integers
//! assigned by the backend, component kinds serialize lowercase, and the
//! component kind field is named `type` on the wire.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for projects (assigned by the backend).
pub type ProjectId = i64;
/// Unique identifier for frames (assigned by the backend).
pub type FrameId = i64;
/// Unique identifier for components (assigned by the backend).
pub type ComponentId = i64;

/// Property key holding a connection's source component id.
pub const PROP_SOURCE_ID: &str = "sourceId";
/// Property key holding a connection's target component id.
pub const PROP_TARGET_ID: &str = "targetId";

/// A project groups a set of frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

/// A frame is one diagram canvas belonging to a project.
///
/// Frame responses embed the full component list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub name: String,
    pub project_id: ProjectId,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Frame {
    /// Find a component by id.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }
}

/// Kind of a diagram component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Circle,
    Triangle,
    Rectangle,
    Connection,
}

impl ComponentKind {
    /// Lowercase name as used on the wire and in default names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Circle => "circle",
            ComponentKind::Triangle => "triangle",
            ComponentKind::Rectangle => "rectangle",
            ComponentKind::Connection => "connection",
        }
    }

    /// Default name for a freshly placed component, e.g. `circle-3f9a1c2e`.
    pub fn default_name(&self) -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("{}-{}", self.as_str(), &id[..8])
    }
}

/// A single diagram element inside a frame.
///
/// `x`/`y` is the component's center in world coordinates. Free-form
/// properties travel in `properties`; connections keep their endpoint ids
/// there under [`PROP_SOURCE_ID`]/[`PROP_TARGET_ID`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub frame_id: FrameId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Component {
    /// Center of the component in world coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Visual anchor radius used for trimming connections.
    pub fn anchor_radius(&self) -> f64 {
        self.width.max(self.height) / 2.0
    }

    /// Whether this component is a connection between two others.
    pub fn is_connection(&self) -> bool {
        self.kind == ComponentKind::Connection
    }

    /// Endpoint component ids for a connection, if both are present.
    pub fn connection_endpoints(&self) -> Option<(ComponentId, ComponentId)> {
        let source = self.properties.get(PROP_SOURCE_ID)?.as_i64()?;
        let target = self.properties.get(PROP_TARGET_ID)?.as_i64()?;
        Some((source, target))
    }

    /// Triangle vertices: apex at the top center, base along the bottom edge.
    pub fn triangle_points(&self) -> [Point; 3] {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        [
            Point::new(self.x, self.y + hh),
            Point::new(self.x - hw, self.y - hh),
            Point::new(self.x + hw, self.y - hh),
        ]
    }

    /// Check if a world-space point hits this component.
    ///
    /// Connections are not hit-testable; clicks pass through to the canvas.
    pub fn hit_test(&self, point: Point) -> bool {
        match self.kind {
            ComponentKind::Circle => {
                (point - self.center()).hypot() <= self.anchor_radius()
            }
            ComponentKind::Rectangle => {
                (point.x - self.x).abs() <= self.width / 2.0
                    && (point.y - self.y).abs() <= self.height / 2.0
            }
            ComponentKind::Triangle => {
                let [a, b, c] = self.triangle_points();
                point_in_triangle(point, a, b, c)
            }
            ComponentKind::Connection => false,
        }
    }
}

/// Point-in-triangle test using edge sign checks.
pub fn point_in_triangle(point: Point, a: Point, b: Point, c: Point) -> bool {
    fn sign(p1: Point, p2: Point, p3: Point) -> f64 {
        (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
    }

    let d1 = sign(point, a, b);
    let d2 = sign(point, b, c);
    let d3 = sign(point, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Payload for creating a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCreate {
    pub frame_id: FrameId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl ComponentCreate {
    /// Create request for a plain shape centered at `center`.
    pub fn shape(frame_id: FrameId, kind: ComponentKind, center: Point, size: f64) -> Self {
        Self {
            frame_id,
            name: kind.default_name(),
            kind,
            x: center.x,
            y: center.y,
            width: size,
            height: size,
            properties: Map::new(),
        }
    }

    /// Create request for a connection between two existing components.
    ///
    /// Position is the midpoint of the endpoint centers and the size records
    /// the center distance. The property map carries the endpoint ids plus
    /// the endpoint coordinates at creation time; the coordinates are
    /// advisory only and rendering always recomputes from live positions.
    pub fn connection_between(frame_id: FrameId, source: &Component, target: &Component) -> Self {
        let a = source.center();
        let b = target.center();
        let distance = (b - a).hypot();

        let mut properties = Map::new();
        properties.insert(PROP_SOURCE_ID.into(), Value::from(source.id));
        properties.insert(PROP_TARGET_ID.into(), Value::from(target.id));
        properties.insert("sourceX".into(), Value::from(a.x));
        properties.insert("sourceY".into(), Value::from(a.y));
        properties.insert("targetX".into(), Value::from(b.x));
        properties.insert("targetY".into(), Value::from(b.y));

        Self {
            frame_id,
            name: ComponentKind::Connection.default_name(),
            kind: ComponentKind::Connection,
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
            width: distance,
            height: distance,
            properties,
        }
    }
}

/// Partial update for a component. Unset fields are left unchanged and are
/// omitted from the serialized body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

impl ComponentPatch {
    /// Patch that only moves a component.
    pub fn position(center: Point) -> Self {
        Self {
            x: Some(center.x),
            y: Some(center.y),
            ..Self::default()
        }
    }

    /// True if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.properties.is_none()
    }

    /// Apply the set fields to a component, leaving the rest untouched.
    pub fn apply_to(&self, component: &mut Component) {
        if let Some(name) = &self.name {
            component.name = name.clone();
        }
        if let Some(x) = self.x {
            component.x = x;
        }
        if let Some(y) = self.y {
            component.y = y;
        }
        if let Some(width) = self.width {
            component.width = width;
        }
        if let Some(height) = self.height {
            component.height = height;
        }
        if let Some(properties) = &self.properties {
            component.properties = properties.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(id: ComponentId, kind: ComponentKind, x: f64, y: f64, w: f64, h: f64) -> Component {
        Component {
            id,
            frame_id: 1,
            name: kind.default_name(),
            kind,
            x,
            y,
            width: w,
            height: h,
            properties: Map::new(),
        }
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ComponentKind::Circle).unwrap();
        assert_eq!(json, "\"circle\"");

        let kind: ComponentKind = serde_json::from_str("\"connection\"").unwrap();
        assert_eq!(kind, ComponentKind::Connection);
    }

    #[test]
    fn test_component_wire_format() {
        let c = shape(7, ComponentKind::Triangle, 1.0, 2.0, 3.0, 3.0);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "triangle");
        assert_eq!(json["frame_id"], 1);
    }

    #[test]
    fn test_frame_tolerates_backend_bookkeeping_fields() {
        let json = r#"{
            "id": 3,
            "name": "main",
            "project_id": 1,
            "components": [],
            "created_at": "2025-01-01T00:00:00",
            "updated_at": "2025-01-02T00:00:00"
        }"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.id, 3);
        assert!(frame.components.is_empty());
    }

    #[test]
    fn test_frame_without_components_field() {
        let frame: Frame =
            serde_json::from_str(r#"{"id": 1, "name": "f", "project_id": 2}"#).unwrap();
        assert!(frame.components.is_empty());
    }

    #[test]
    fn test_circle_hit_test() {
        let c = shape(1, ComponentKind::Circle, 0.0, 0.0, 2.0, 2.0);
        assert!(c.hit_test(Point::new(0.0, 0.0)));
        assert!(c.hit_test(Point::new(0.9, 0.0)));
        assert!(!c.hit_test(Point::new(0.9, 0.9)));
    }

    #[test]
    fn test_rectangle_hit_test() {
        let c = shape(1, ComponentKind::Rectangle, 0.0, 0.0, 2.0, 1.0);
        assert!(c.hit_test(Point::new(0.9, 0.4)));
        assert!(!c.hit_test(Point::new(0.9, 0.6)));
    }

    #[test]
    fn test_triangle_hit_test() {
        let c = shape(1, ComponentKind::Triangle, 0.0, 0.0, 2.0, 2.0);
        // Center and apex are inside, box corners above the slanted edges are not.
        assert!(c.hit_test(Point::new(0.0, 0.0)));
        assert!(c.hit_test(Point::new(0.0, 0.99)));
        assert!(!c.hit_test(Point::new(0.9, 0.9)));
        assert!(!c.hit_test(Point::new(-0.9, 0.9)));
    }

    #[test]
    fn test_connection_is_not_hit_testable() {
        let c = shape(1, ComponentKind::Connection, 0.0, 0.0, 10.0, 10.0);
        assert!(!c.hit_test(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_connection_endpoints() {
        let mut c = shape(3, ComponentKind::Connection, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(c.connection_endpoints(), None);

        c.properties.insert(PROP_SOURCE_ID.into(), Value::from(1));
        assert_eq!(c.connection_endpoints(), None);

        c.properties.insert(PROP_TARGET_ID.into(), Value::from(2));
        assert_eq!(c.connection_endpoints(), Some((1, 2)));
    }

    #[test]
    fn test_connection_between_records_span() {
        let a = shape(1, ComponentKind::Circle, 0.0, 0.0, 2.0, 2.0);
        let b = shape(2, ComponentKind::Rectangle, 10.0, 0.0, 2.0, 2.0);
        let create = ComponentCreate::connection_between(5, &a, &b);

        assert_eq!(create.kind, ComponentKind::Connection);
        assert_eq!(create.frame_id, 5);
        assert!((create.x - 5.0).abs() < f64::EPSILON);
        assert!((create.y - 0.0).abs() < f64::EPSILON);
        assert!((create.width - 10.0).abs() < f64::EPSILON);
        assert_eq!(create.properties[PROP_SOURCE_ID], Value::from(1));
        assert_eq!(create.properties[PROP_TARGET_ID], Value::from(2));
        assert_eq!(create.properties["targetX"], Value::from(10.0));
    }

    #[test]
    fn test_patch_omits_unset_fields() {
        let patch = ComponentPatch::position(Point::new(1.5, -2.0));
        let json = serde_json::to_value(&patch).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["x"], Value::from(1.5));
        assert_eq!(obj["y"], Value::from(-2.0));
    }

    #[test]
    fn test_default_name_uses_kind_prefix() {
        let name = ComponentKind::Rectangle.default_name();
        assert!(name.starts_with("rectangle-"));
        assert_eq!(name.len(), "rectangle-".len() + 8);
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut c = shape(1, ComponentKind::Circle, 0.0, 0.0, 2.0, 2.0);
        let patch = ComponentPatch {
            x: Some(3.0),
            y: Some(-1.0),
            ..ComponentPatch::default()
        };
        patch.apply_to(&mut c);

        assert!((c.x - 3.0).abs() < f64::EPSILON);
        assert!((c.y + 1.0).abs() < f64::EPSILON);
        assert!((c.width - 2.0).abs() < f64::EPSILON);
        assert!(c.name.starts_with("circle-"));
    }
}
