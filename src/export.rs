use thiserror::Error;

use crate::geometry::{self, Point};
use crate::model::{Graph, Node, NodeShape};

/// Blank border around the diagram's bounding box.
pub const PADDING: f32 = 40.0;

const NODE_TEXT_SIZE: f32 = 11.5;
const LABEL_TEXT_SIZE: f32 = 10.0;
const LABEL_CORNER_RADIUS: f32 = 9.0;
const SQUARE_CORNER_RADIUS: f32 = 6.0;
const DIAMOND_OVERHANG: f32 = 4.0;
const TRUNCATE_OVER: usize = 20;
const TRUNCATED_LEN: usize = 18;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("diagram has no nodes")]
    EmptyDiagram,
    #[error("scale must be a positive finite number")]
    InvalidScale,
    #[error(transparent)]
    Svg(#[from] resvg::usvg::Error),
    #[error("could not allocate a {width}x{height} pixel buffer")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}

/// One drawing instruction, already in output coordinates. Text positions
/// name the center of the run; renderers anchor the middle there.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        corner_radius: f32,
    },
    Polygon {
        points: Vec<Point>,
    },
    Curve {
        start: Point,
        control: Point,
        end: Point,
    },
    Text {
        x: f32,
        y: f32,
        content: String,
        size: f32,
    },
}

/// A finished drawing: canvas size plus primitives in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDescription {
    pub width: f32,
    pub height: f32,
    pub primitives: Vec<Primitive>,
}

/// Projects the graph to primitives in its own coordinate frame, shifted so
/// the content starts at the padding offset. The viewport plays no part:
/// exports look the same however far the editor is panned or zoomed.
pub fn project(graph: &Graph) -> Result<VectorDescription, ExportError> {
    if graph.is_empty() {
        return Err(ExportError::EmptyDiagram);
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for node in graph.nodes() {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x + geometry::NODE_WIDTH);
        max_y = max_y.max(node.y + geometry::NODE_HEIGHT);
    }
    let dx = PADDING - min_x;
    let dy = PADDING - min_y;

    // Edges go first so nodes paint over the anchors.
    let mut primitives = Vec::new();
    for edge in graph.edges() {
        let (Some(from), Some(to)) = (graph.node(&edge.from), graph.node(&edge.to)) else {
            continue;
        };
        let g = geometry::edge_geometry(from, to);
        primitives.push(Primitive::Curve {
            start: shift(g.start, dx, dy),
            control: shift(g.control, dx, dy),
            end: shift(g.end, dx, dy),
        });
        if !edge.label.is_empty() {
            let anchor = shift(geometry::curve_midpoint(&g), dx, dy);
            let pill = geometry::label_box(anchor, &edge.label);
            primitives.push(Primitive::Rect {
                x: pill.x,
                y: pill.y,
                width: pill.width,
                height: pill.height,
                corner_radius: LABEL_CORNER_RADIUS,
            });
            primitives.push(Primitive::Text {
                x: anchor.x,
                y: anchor.y,
                content: edge.label.clone(),
                size: LABEL_TEXT_SIZE,
            });
        }
    }
    for node in graph.nodes() {
        primitives.push(outline(node, dx, dy));
        let center = geometry::node_center(node);
        primitives.push(Primitive::Text {
            x: center.x + dx,
            y: center.y + dy,
            content: display_label(&node.label),
            size: NODE_TEXT_SIZE,
        });
    }

    Ok(VectorDescription {
        width: (max_x - min_x) + 2.0 * PADDING,
        height: (max_y - min_y) + 2.0 * PADDING,
        primitives,
    })
}

fn shift(p: Point, dx: f32, dy: f32) -> Point {
    Point::new(p.x + dx, p.y + dy)
}

fn outline(node: &Node, dx: f32, dy: f32) -> Primitive {
    let b = geometry::node_bounds(node);
    let x = b.x + dx;
    let y = b.y + dy;
    match node.shape {
        // The diamond pokes out past the box so its points read as sharp.
        NodeShape::Diamond => {
            let cx = x + b.width / 2.0;
            let cy = y + b.height / 2.0;
            Primitive::Polygon {
                points: vec![
                    Point::new(cx, y - DIAMOND_OVERHANG),
                    Point::new(x + b.width + DIAMOND_OVERHANG, cy),
                    Point::new(cx, y + b.height + DIAMOND_OVERHANG),
                    Point::new(x - DIAMOND_OVERHANG, cy),
                ],
            }
        }
        NodeShape::Round | NodeShape::Stadium => Primitive::Rect {
            x,
            y,
            width: b.width,
            height: b.height,
            corner_radius: b.height / 2.0,
        },
        NodeShape::Rect | NodeShape::Subroutine | NodeShape::Flag => Primitive::Rect {
            x,
            y,
            width: b.width,
            height: b.height,
            corner_radius: SQUARE_CORNER_RADIUS,
        },
    }
}

/// Long labels are cut so the text stays inside the fixed node box.
fn display_label(label: &str) -> String {
    if label.chars().count() > TRUNCATE_OVER {
        let head: String = label.chars().take(TRUNCATED_LEN).collect();
        format!("{head}…")
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_graph_is_an_error() {
        let err = project(&Graph::new()).unwrap_err();
        assert!(matches!(err, ExportError::EmptyDiagram));
    }

    #[test]
    fn single_node_gets_padding_on_all_sides() {
        let mut graph = Graph::new();
        graph.add_node("Start", NodeShape::Rect, 60.0, 60.0);
        let desc = project(&graph).unwrap();
        assert_eq!(desc.width, geometry::NODE_WIDTH + 80.0);
        assert_eq!(desc.height, geometry::NODE_HEIGHT + 80.0);
        assert_eq!(
            desc.primitives[0],
            Primitive::Rect {
                x: 40.0,
                y: 40.0,
                width: geometry::NODE_WIDTH,
                height: geometry::NODE_HEIGHT,
                corner_radius: 6.0,
            }
        );
        assert_eq!(
            desc.primitives[1],
            Primitive::Text {
                x: 122.0,
                y: 66.0,
                content: "Start".to_string(),
                size: 11.5,
            }
        );
    }

    #[test]
    fn negative_positions_are_normalized() {
        let mut graph = Graph::new();
        graph.add_node("Far", NodeShape::Rect, -100.0, -50.0);
        let desc = project(&graph).unwrap();
        match &desc.primitives[0] {
            Primitive::Rect { x, y, .. } => {
                assert_eq!(*x, 40.0);
                assert_eq!(*y, 40.0);
            }
            other => panic!("expected a rect, got {other:?}"),
        }
    }

    #[test]
    fn edges_are_drawn_before_nodes() {
        let mut graph = crate::parser::parse("A --> B\n");
        crate::layout::assign_positions(&mut graph);
        let desc = project(&graph).unwrap();
        assert!(matches!(desc.primitives[0], Primitive::Curve { .. }));
        assert!(matches!(
            desc.primitives.last().unwrap(),
            Primitive::Text { .. }
        ));
    }

    #[test]
    fn labeled_edge_emits_pill_and_text() {
        let mut graph = crate::parser::parse("A -->|yes| B\n");
        crate::layout::assign_positions(&mut graph);
        let desc = project(&graph).unwrap();
        let pill = &desc.primitives[1];
        match pill {
            Primitive::Rect { corner_radius, .. } => assert_eq!(*corner_radius, 9.0),
            other => panic!("expected the label pill, got {other:?}"),
        }
        match &desc.primitives[2] {
            Primitive::Text { content, size, .. } => {
                assert_eq!(content, "yes");
                assert_eq!(*size, 10.0);
            }
            other => panic!("expected the label text, got {other:?}"),
        }
    }

    #[test]
    fn diamond_projects_as_polygon_with_overhang() {
        let mut graph = Graph::new();
        graph.add_node("ok?", NodeShape::Diamond, 0.0, 0.0);
        let desc = project(&graph).unwrap();
        match &desc.primitives[0] {
            Primitive::Polygon { points } => {
                assert_eq!(points.len(), 4);
                assert_eq!(points[0], Point::new(40.0 + 82.0, 40.0 - 4.0));
                assert_eq!(points[3], Point::new(40.0 - 4.0, 40.0 + 26.0));
            }
            other => panic!("expected a polygon, got {other:?}"),
        }
    }

    #[test]
    fn stadium_corner_radius_is_half_the_height() {
        let mut graph = Graph::new();
        graph.add_node("Begin", NodeShape::Stadium, 0.0, 0.0);
        let desc = project(&graph).unwrap();
        match &desc.primitives[0] {
            Primitive::Rect { corner_radius, .. } => {
                assert_eq!(*corner_radius, geometry::NODE_HEIGHT / 2.0);
            }
            other => panic!("expected a rect, got {other:?}"),
        }
    }

    #[test]
    fn long_node_label_is_truncated_with_an_ellipsis() {
        let mut graph = Graph::new();
        graph.add_node("abcdefghijklmnopqrstuvwxyz", NodeShape::Rect, 0.0, 0.0);
        let desc = project(&graph).unwrap();
        match &desc.primitives[1] {
            Primitive::Text { content, .. } => {
                assert_eq!(content, "abcdefghijklmnopqr…");
            }
            other => panic!("expected the node text, got {other:?}"),
        }
    }

    #[test]
    fn twenty_char_label_is_kept_whole() {
        let mut graph = Graph::new();
        graph.add_node("abcdefghijklmnopqrst", NodeShape::Rect, 0.0, 0.0);
        let desc = project(&graph).unwrap();
        match &desc.primitives[1] {
            Primitive::Text { content, .. } => assert_eq!(content, "abcdefghijklmnopqrst"),
            other => panic!("expected the node text, got {other:?}"),
        }
    }

    #[test]
    fn bounding_box_covers_all_nodes() {
        let mut graph = Graph::new();
        graph.add_node("One", NodeShape::Rect, 500.0, 300.0);
        graph.add_node("Two", NodeShape::Rect, 100.0, 700.0);
        let desc = project(&graph).unwrap();
        assert_eq!(desc.width, (664.0 - 100.0) + 80.0);
        assert_eq!(desc.height, (752.0 - 300.0) + 80.0);
    }
}
