use unicode_width::UnicodeWidthStr;

use crate::model::Node;

pub const NODE_WIDTH: f32 = 164.0;
pub const NODE_HEIGHT: f32 = 52.0;

/// Fraction of the node extent that edge anchors are pushed out from the
/// center, per axis.
const ANCHOR_INSET: f32 = 0.55;
/// Perpendicular offset of the control point from the chord midpoint.
const CURVE_BOW: f32 = 30.0;
const LABEL_CHAR_WIDTH: f32 = 6.4;
const LABEL_PADDING: f32 = 12.0;
const LABEL_HEIGHT: f32 = 18.0;
const CURVE_SAMPLES: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Anchors and the single quadratic control point for one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    pub start: Point,
    pub end: Point,
    pub control: Point,
}

pub fn node_center(node: &Node) -> Point {
    Point::new(node.x + NODE_WIDTH / 2.0, node.y + NODE_HEIGHT / 2.0)
}

pub fn node_bounds(node: &Node) -> Rect {
    Rect {
        x: node.x,
        y: node.y,
        width: NODE_WIDTH,
        height: NODE_HEIGHT,
    }
}

/// Curve between two nodes. Anchors sit on the center-to-center line, offset
/// from each center by ANCHOR_INSET of the node extent so the stroke ends
/// near the boundary; the control point bows the curve perpendicular to the
/// chord. Coincident centers fall back to the unit x direction rather than
/// dividing by zero.
pub fn edge_geometry(from: &Node, to: &Node) -> EdgeGeometry {
    let f = node_center(from);
    let t = node_center(to);
    let dx = t.x - f.x;
    let dy = t.y - f.y;
    let len = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if len == 0.0 {
        (1.0, 0.0)
    } else {
        (dx / len, dy / len)
    };

    let start = Point::new(
        f.x + ux * NODE_WIDTH * ANCHOR_INSET,
        f.y + uy * NODE_HEIGHT * ANCHOR_INSET,
    );
    let end = Point::new(
        t.x - ux * NODE_WIDTH * ANCHOR_INSET,
        t.y - uy * NODE_HEIGHT * ANCHOR_INSET,
    );
    let control = Point::new(
        (start.x + end.x) / 2.0 - uy * CURVE_BOW,
        (start.y + end.y) / 2.0 + ux * CURVE_BOW,
    );
    EdgeGeometry {
        start,
        end,
        control,
    }
}

pub fn point_on_curve(g: &EdgeGeometry, t: f32) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * g.start.x + 2.0 * u * t * g.control.x + t * t * g.end.x,
        u * u * g.start.y + 2.0 * u * t * g.control.y + t * t * g.end.y,
    )
}

/// Label anchor for an edge: the quadratic blend at t = 0.5,
/// (start + 2 control + end) / 4.
pub fn curve_midpoint(g: &EdgeGeometry) -> Point {
    Point::new(
        (g.start.x + 2.0 * g.control.x + g.end.x) / 4.0,
        (g.start.y + 2.0 * g.control.y + g.end.y) / 4.0,
    )
}

/// Box for an edge label centered on `anchor`. Width grows linearly with the
/// label's display columns, not with measured glyph metrics.
pub fn label_box(anchor: Point, text: &str) -> Rect {
    let columns = UnicodeWidthStr::width(text) as f32;
    let width = columns * LABEL_CHAR_WIDTH + LABEL_PADDING;
    Rect {
        x: anchor.x - width / 2.0,
        y: anchor.y - LABEL_HEIGHT / 2.0,
        width,
        height: LABEL_HEIGHT,
    }
}

/// Shortest sampled distance from `p` to the curve.
pub fn distance_to_curve(g: &EdgeGeometry, p: Point) -> f32 {
    (0..=CURVE_SAMPLES)
        .map(|i| {
            let t = i as f32 / CURVE_SAMPLES as f32;
            let q = point_on_curve(g, t);
            let dx = q.x - p.x;
            let dy = q.y - p.y;
            (dx * dx + dy * dy).sqrt()
        })
        .fold(f32::INFINITY, f32::min)
}
