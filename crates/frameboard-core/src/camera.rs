//! Camera module for the orthographic pan/zoom view.
//!
//! The projection is symmetric: both axes are normalized to a fixed
//! [`BASE_HALF_EXTENT`] before zoom, so the visible world region is always
//! a square regardless of viewport aspect ratio.

use crate::input::ScrollUnit;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Projection half extent per axis in world units, before zoom.
pub const BASE_HALF_EXTENT: f64 = 5.0;

/// Default zoom level for a freshly opened frame.
pub const DEFAULT_ZOOM: f64 = 50.0;
/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 10.0;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 500.0;

/// Zoom step per scroll unit for coarse (mouse wheel notch) input.
pub const COARSE_ZOOM_FACTOR: f64 = 0.15;
/// Zoom step per scroll unit for fine (trackpad pixel) input.
pub const FINE_ZOOM_FACTOR: f64 = 0.05;
/// Pixel-unit deltas below this magnitude are treated as fine input.
pub const FINE_SCROLL_THRESHOLD: f64 = 50.0;

/// Camera manages the view transform for a frame canvas.
///
/// It converts between screen coordinates (pixels, Y down) and world
/// coordinates (Y up) and applies wheel zoom and drag panning. Camera state
/// is per mounted view and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// World point at the center of the view (pan target).
    pub target: Point,
    /// Current zoom level.
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Point::ZERO,
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible half extent per axis in world units.
    pub fn view_half_extent(&self) -> f64 {
        BASE_HALF_EXTENT / self.zoom
    }

    /// Visible extent per axis in world units.
    pub fn view_extent(&self) -> f64 {
        2.0 * self.view_half_extent()
    }

    /// World-space rectangle currently in view.
    pub fn visible_world_rect(&self) -> Rect {
        let extent = self.view_extent();
        Rect::from_center_size(self.target, Size::new(extent, extent))
    }

    /// Convert a screen point to world coordinates.
    ///
    /// A degenerate viewport (zero width or height) maps everything to the
    /// pan target rather than dividing by zero.
    pub fn screen_to_world(&self, screen: Point, viewport: Rect) -> Point {
        let (w, h) = (viewport.width(), viewport.height());
        if w <= 0.0 || h <= 0.0 {
            return self.target;
        }
        // Normalize to [-1, 1] with Y flipped (screen Y grows downward).
        let ndc_x = (screen.x - viewport.x0) / w * 2.0 - 1.0;
        let ndc_y = -((screen.y - viewport.y0) / h * 2.0 - 1.0);
        let half = self.view_half_extent();
        Point::new(self.target.x + ndc_x * half, self.target.y + ndc_y * half)
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world: Point, viewport: Rect) -> Point {
        let (w, h) = (viewport.width(), viewport.height());
        if w <= 0.0 || h <= 0.0 {
            return viewport.origin();
        }
        let half = self.view_half_extent();
        let ndc_x = (world.x - self.target.x) / half;
        let ndc_y = (world.y - self.target.y) / half;
        Point::new(
            viewport.x0 + (ndc_x + 1.0) / 2.0 * w,
            viewport.y0 + (1.0 - ndc_y) / 2.0 * h,
        )
    }

    /// Convert a screen-pixel delta to a world-space delta.
    pub fn screen_delta_to_world(&self, delta: Vec2, viewport: Rect) -> Vec2 {
        let (w, h) = (viewport.width(), viewport.height());
        if w <= 0.0 || h <= 0.0 {
            return Vec2::ZERO;
        }
        let extent = self.view_extent();
        Vec2::new(delta.x * extent / w, -delta.y * extent / h)
    }

    /// Apply a wheel-zoom step, clamping the result.
    ///
    /// Fine pointer devices (pixel deltas under [`FINE_SCROLL_THRESHOLD`])
    /// get a smaller factor so trackpads do not zoom too fast.
    pub fn apply_wheel_zoom(&mut self, delta_y: f64, unit: ScrollUnit) {
        let factor = if unit == ScrollUnit::Pixel && delta_y.abs() < FINE_SCROLL_THRESHOLD {
            FINE_ZOOM_FACTOR
        } else {
            COARSE_ZOOM_FACTOR
        };
        self.zoom = (self.zoom - delta_y * factor).clamp(self.min_zoom, self.max_zoom);
    }

    /// Pan so the content follows a pointer drag by `delta` screen pixels.
    pub fn pan_by_screen(&mut self, delta: Vec2, viewport: Rect) {
        self.target -= self.screen_delta_to_world(delta, viewport);
    }

    /// Reset the camera to the default position and zoom.
    pub fn reset(&mut self) {
        self.target = Point::ZERO;
        self.zoom = DEFAULT_ZOOM;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.target, Point::ZERO);
        assert!((camera.zoom - DEFAULT_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_viewport_center_maps_to_target() {
        let mut camera = Camera::new();
        camera.target = Point::new(3.0, -4.0);
        let world = camera.screen_to_world(Point::new(400.0, 300.0), viewport());
        assert!((world.x - 3.0).abs() < 1e-12);
        assert!((world.y + 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_screen_corners() {
        let camera = Camera::new();
        // Default zoom 50 gives a half extent of 0.1 world units.
        let top_left = camera.screen_to_world(Point::new(0.0, 0.0), viewport());
        assert!((top_left.x + 0.1).abs() < 1e-12);
        assert!((top_left.y - 0.1).abs() < 1e-12);

        let bottom_right = camera.screen_to_world(Point::new(800.0, 600.0), viewport());
        assert!((bottom_right.x - 0.1).abs() < 1e-12);
        assert!((bottom_right.y + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.target = Point::new(0.3, -0.2);
        camera.zoom = 137.0;

        let original = Point::new(123.0, 456.0);
        let world = camera.screen_to_world(original, viewport());
        let back = camera.world_to_screen(world, viewport());

        assert!((back.x - original.x).abs() < 1e-9);
        assert!((back.y - original.y).abs() < 1e-9);
    }

    #[test]
    fn test_zero_viewport_returns_target() {
        let mut camera = Camera::new();
        camera.target = Point::new(7.0, 8.0);
        let degenerate = Rect::new(0.0, 0.0, 0.0, 600.0);
        let world = camera.screen_to_world(Point::new(100.0, 100.0), degenerate);
        assert_eq!(world, camera.target);
    }

    #[test]
    fn test_wheel_zoom_stays_clamped() {
        for delta in [-100000.0, -360.0, -1.0, 0.0, 1.0, 360.0, 100000.0] {
            for unit in [ScrollUnit::Line, ScrollUnit::Pixel] {
                let mut camera = Camera::new();
                camera.apply_wheel_zoom(delta, unit);
                assert!(camera.zoom >= MIN_ZOOM, "zoom {} below min", camera.zoom);
                assert!(camera.zoom <= MAX_ZOOM, "zoom {} above max", camera.zoom);
            }
        }
    }

    #[test]
    fn test_fine_and_coarse_zoom_factors() {
        let mut camera = Camera::new();
        camera.apply_wheel_zoom(10.0, ScrollUnit::Pixel);
        assert!((camera.zoom - 49.5).abs() < 1e-12);

        let mut camera = Camera::new();
        camera.apply_wheel_zoom(1.0, ScrollUnit::Line);
        assert!((camera.zoom - 49.85).abs() < 1e-12);

        // Large pixel deltas are wheel notches reported in pixels.
        let mut camera = Camera::new();
        camera.apply_wheel_zoom(120.0, ScrollUnit::Pixel);
        assert!((camera.zoom - 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_pan_keeps_point_under_pointer() {
        let mut camera = Camera::new();
        camera.zoom = 80.0;
        let screen = Point::new(200.0, 150.0);
        let drag = Vec2::new(35.0, -12.0);

        let before = camera.screen_to_world(screen, viewport());
        camera.pan_by_screen(drag, viewport());
        let after = camera.screen_to_world(screen + drag, viewport());

        assert!((after.x - before.x).abs() < 1e-12);
        assert!((after.y - before.y).abs() < 1e-12);
    }

    #[test]
    fn test_pan_direction() {
        let mut camera = Camera::new();
        camera.pan_by_screen(Vec2::new(40.0, 0.0), viewport());
        assert!(camera.target.x < 0.0);

        let mut camera = Camera::new();
        camera.pan_by_screen(Vec2::new(0.0, 40.0), viewport());
        assert!(camera.target.y > 0.0);
    }

    #[test]
    fn test_visible_world_rect() {
        let camera = Camera::new();
        let rect = camera.visible_world_rect();
        assert!((rect.width() - 0.2).abs() < 1e-12);
        assert_eq!(rect.center(), Point::ZERO);
    }

    #[test]
    fn test_reset() {
        let mut camera = Camera::new();
        camera.target = Point::new(1.0, 1.0);
        camera.zoom = 300.0;
        camera.reset();
        assert_eq!(camera.target, Point::ZERO);
        assert!((camera.zoom - DEFAULT_ZOOM).abs() < f64::EPSILON);
    }
}
