use crate::geometry::Point;

pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 2.0;
pub const DEFAULT_PAN_X: f32 = 40.0;
pub const DEFAULT_PAN_Y: f32 = 20.0;
pub const DEFAULT_ZOOM: f32 = 0.9;
/// Multiplicative zoom change per wheel delta unit.
const WHEEL_RATE: f32 = 0.001;

/// Pan/zoom transform between screen and model space. Owned by the document,
/// never by the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: DEFAULT_PAN_X,
            pan_y: DEFAULT_PAN_Y,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    pub fn to_model(&self, x: f32, y: f32) -> Point {
        Point::new((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.pan_x, p.y * self.zoom + self.pan_y)
    }

    pub fn set_pan(&mut self, x: f32, y: f32) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Sets zoom directly, clamped. Returns whether zoom changed.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let next = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let changed = next != self.zoom;
        self.zoom = next;
        changed
    }

    /// Multiplies zoom by `factor`, clamped. Returns whether zoom changed.
    pub fn zoom_by(&mut self, factor: f32) -> bool {
        if !factor.is_finite() {
            return false;
        }
        let next = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let changed = next != self.zoom;
        self.zoom = next;
        changed
    }

    /// Wheel zoom: multiplicative, scaled by the delta magnitude. Positive
    /// deltas (scrolling down) zoom out. Pan is never touched here.
    pub fn wheel(&mut self, delta: f32) -> bool {
        self.zoom_by(1.0 - delta * WHEEL_RATE)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
