//! Connection geometry between component anchors.
//!
//! A connection is drawn from the edge of its source component to the edge
//! of its target component, with an arrowhead at the target end. Endpoints
//! are resolved against live component positions on every pass; coordinates
//! cached in the connection's properties are never read here.

use crate::model::{Component, Frame};
use kurbo::{Affine, Point, Vec2};

/// Geometry of a rendered connection, trimmed to the endpoint anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionGeometry {
    /// Shaft start, on the source anchor circle.
    pub start: Point,
    /// Shaft end, on the target anchor circle. The arrowhead tip sits here.
    pub end: Point,
    /// Direction from source center to target center, in radians.
    pub angle: f64,
}

impl ConnectionGeometry {
    /// Length of the trimmed shaft.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Transform placing the arrowhead: translate to the end point, rotated
    /// by the connection angle.
    pub fn arrow_transform(&self) -> Affine {
        Affine::translate(self.end.to_vec2()) * Affine::rotate(self.angle)
    }

    /// Arrowhead triangle with its apex at the end point.
    ///
    /// The base sits `size` behind the tip with a half-width of `size / 2`,
    /// pointing from source toward target.
    pub fn arrow_head(&self, size: f64) -> [Point; 3] {
        let dir = Vec2::new(self.angle.cos(), self.angle.sin());
        let perp = Vec2::new(-dir.y, dir.x);
        let back = self.end - dir * size;
        [
            self.end,
            back + perp * (size * 0.5),
            back - perp * (size * 0.5),
        ]
    }
}

/// Compute the trimmed geometry between two components.
///
/// Identical centers yield an angle of 0 and finite endpoints rather than
/// NaN.
pub fn connection_geometry(source: &Component, target: &Component) -> ConnectionGeometry {
    let a = source.center();
    let b = target.center();
    let delta = b - a;
    let len = delta.hypot();
    let dir = if len < f64::EPSILON {
        Vec2::new(1.0, 0.0)
    } else {
        delta / len
    };

    ConnectionGeometry {
        start: a + dir * source.anchor_radius(),
        end: b - dir * target.anchor_radius(),
        angle: dir.y.atan2(dir.x),
    }
}

/// Resolve a connection's endpoints against the frame's live components.
///
/// Returns `None` when either endpoint id is missing from the properties,
/// refers to a component that no longer exists, or refers to another
/// connection. Dangling connections are skipped by callers, never an error.
pub fn resolve_endpoints<'a>(
    frame: &'a Frame,
    connection: &Component,
) -> Option<(&'a Component, &'a Component)> {
    let (source_id, target_id) = connection.connection_endpoints()?;
    let source = frame.component(source_id)?;
    let target = frame.component(target_id)?;
    if source.is_connection() || target.is_connection() {
        return None;
    }
    Some((source, target))
}

/// Live geometry for a connection component, if both endpoints resolve.
pub fn resolve_connection(frame: &Frame, connection: &Component) -> Option<ConnectionGeometry> {
    let (source, target) = resolve_endpoints(frame, connection)?;
    Some(connection_geometry(source, target))
}
