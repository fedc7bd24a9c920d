use tracing::debug;

use crate::geometry::{self, Point};
use crate::layout;
use crate::model::{Graph, NodeShape};
use crate::parser;
use crate::viewport::Viewport;

/// Radius of the connect handle drawn on the selected node's right edge.
pub const HANDLE_RADIUS: f32 = 7.0;
/// Pick radius for the handle, slightly larger than drawn.
const HANDLE_HIT_RADIUS: f32 = 9.0;
/// Pick tolerance around an edge curve, half of the fat hit stroke.
const EDGE_HIT_TOLERANCE: f32 = 7.0;

/// Raw input consumed by the controller, one event at a time. Pointer
/// coordinates are screen space; the viewport maps them into model space.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    DoubleClick { x: f32, y: f32 },
    Wheel { delta: f32 },
    PinchStart,
    PinchMove { factor: f32 },
    PinchEnd,
    Delete,
    SubmitLabel { text: String },
    CancelLabel,
}

/// What an event did: nothing, a view-only change, or a graph mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Ignored,
    Redraw,
    GraphChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    None,
    Node(String),
    Edge(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Node(String),
    Edge(usize),
}

#[derive(Debug, Clone)]
enum Mode {
    Idle,
    DraggingNode {
        id: String,
        grab_dx: f32,
        grab_dy: f32,
    },
    Panning {
        origin_x: f32,
        origin_y: f32,
        pan_x: f32,
        pan_y: f32,
    },
    Connecting {
        from: String,
    },
    EditingLabel {
        target: EditTarget,
        original: String,
    },
}

#[derive(Debug)]
enum Hit {
    Handle(String),
    Node(String),
    Edge(usize),
    Canvas,
}

/// One open diagram: the graph, its viewport, and transient gesture state.
/// There is exactly one writer; events are applied in arrival order.
#[derive(Debug, Clone)]
pub struct Document {
    graph: Graph,
    viewport: Viewport,
    mode: Mode,
    selection: Selection,
    /// Last pointer position, model space. Feeds the rubber-band line.
    pointer: Point,
}

impl Document {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            viewport: Viewport::default(),
            mode: Mode::Idle,
            selection: Selection::None,
            pointer: Point::new(0.0, 0.0),
        }
    }

    /// Parses the text and lays out the result.
    pub fn from_text(text: &str) -> Self {
        let mut graph = parser::parse(text);
        layout::assign_positions(&mut graph);
        Self::new(graph)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Target and text captured when label editing began.
    pub fn editing(&self) -> Option<(&EditTarget, &str)> {
        match &self.mode {
            Mode::EditingLabel { target, original } => Some((target, original.as_str())),
            _ => None,
        }
    }

    /// Source center and pointer position while a connection is pending.
    pub fn rubber_band(&self) -> Option<(Point, Point)> {
        match &self.mode {
            Mode::Connecting { from } => {
                let node = self.graph.node(from)?;
                Some((geometry::node_center(node), self.pointer))
            }
            _ => None,
        }
    }

    pub fn set_pan(&mut self, x: f32, y: f32) {
        self.viewport.set_pan(x, y);
    }

    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        self.viewport.set_zoom(zoom)
    }

    pub fn zoom_by(&mut self, factor: f32) -> bool {
        self.viewport.zoom_by(factor)
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Inserts a node at the given model position and selects it.
    pub fn add_node(&mut self, label: &str, shape: NodeShape, x: f32, y: f32) -> String {
        let id = self.graph.add_node(label, shape, x, y);
        self.selection = Selection::Node(id.clone());
        id
    }

    /// Reshapes the currently selected node.
    pub fn set_selected_shape(&mut self, shape: NodeShape) -> EventOutcome {
        match &self.selection {
            Selection::Node(id) => {
                let id = id.clone();
                self.graph.set_shape(&id, shape);
                EventOutcome::GraphChanged
            }
            _ => EventOutcome::Ignored,
        }
    }

    /// Opens the label editor for the current selection. This is the only
    /// route to editing an edge whose label is empty, since such an edge has
    /// no label box to double-click.
    pub fn begin_label_edit(&mut self) -> EventOutcome {
        if matches!(self.mode, Mode::EditingLabel { .. }) {
            return EventOutcome::Ignored;
        }
        let captured = match &self.selection {
            Selection::Node(id) => self
                .graph
                .node(id)
                .map(|n| (EditTarget::Node(id.clone()), n.label.clone())),
            Selection::Edge(index) => self
                .graph
                .edges()
                .get(*index)
                .map(|e| (EditTarget::Edge(*index), e.label.clone())),
            Selection::None => None,
        };
        match captured {
            Some((target, original)) => {
                self.mode = Mode::EditingLabel { target, original };
                EventOutcome::Redraw
            }
            None => EventOutcome::Ignored,
        }
    }

    /// Deletes the current selection and returns to idle.
    pub fn delete_selected(&mut self) -> EventOutcome {
        match std::mem::replace(&mut self.selection, Selection::None) {
            Selection::Node(id) => {
                self.graph.delete_node(&id);
                self.mode = Mode::Idle;
                debug!("deleted node {id}");
                EventOutcome::GraphChanged
            }
            Selection::Edge(index) => {
                let before = self.graph.edges().len();
                self.graph.delete_edge(index);
                self.mode = Mode::Idle;
                if self.graph.edges().len() == before {
                    EventOutcome::Ignored
                } else {
                    debug!("deleted edge {index}");
                    EventOutcome::GraphChanged
                }
            }
            Selection::None => EventOutcome::Ignored,
        }
    }

    /// Applies one input event against the current state. Events that match
    /// no transition in the current state are ignored, never an error.
    pub fn handle(&mut self, event: InputEvent) -> EventOutcome {
        // Label editing is a blocking sub-dialog: only submit or cancel get
        // through while it is open.
        if let Mode::EditingLabel { target, .. } = &self.mode {
            let target = target.clone();
            return match event {
                InputEvent::SubmitLabel { text } => {
                    self.mode = Mode::Idle;
                    match target {
                        EditTarget::Node(id) => self.graph.rename_node(&id, &text),
                        EditTarget::Edge(index) => self.graph.set_edge_label(index, &text),
                    }
                    debug!("label edit committed");
                    EventOutcome::GraphChanged
                }
                InputEvent::CancelLabel => {
                    self.mode = Mode::Idle;
                    EventOutcome::Redraw
                }
                _ => EventOutcome::Ignored,
            };
        }

        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(x, y),
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::DoubleClick { x, y } => self.double_click(x, y),
            InputEvent::Wheel { delta } => {
                if self.viewport.wheel(delta) {
                    EventOutcome::Redraw
                } else {
                    EventOutcome::Ignored
                }
            }
            InputEvent::PinchMove { factor } => {
                if self.viewport.zoom_by(factor) {
                    EventOutcome::Redraw
                } else {
                    EventOutcome::Ignored
                }
            }
            InputEvent::PinchStart | InputEvent::PinchEnd => EventOutcome::Ignored,
            InputEvent::Delete => self.delete_selected(),
            InputEvent::SubmitLabel { .. } | InputEvent::CancelLabel => EventOutcome::Ignored,
        }
    }

    fn pointer_down(&mut self, x: f32, y: f32) -> EventOutcome {
        let at = self.viewport.to_model(x, y);
        self.pointer = at;

        if let Mode::Connecting { from } = &self.mode {
            let from = from.clone();
            return self.resolve_connection(&from, at);
        }
        if !matches!(self.mode, Mode::Idle) {
            return EventOutcome::Ignored;
        }

        match self.hit_test(at) {
            Hit::Handle(id) => {
                self.mode = Mode::Connecting { from: id };
                EventOutcome::Redraw
            }
            Hit::Node(id) => {
                let (nx, ny) = match self.graph.node(&id) {
                    Some(n) => (n.x, n.y),
                    None => return EventOutcome::Ignored,
                };
                self.selection = Selection::Node(id.clone());
                self.mode = Mode::DraggingNode {
                    id,
                    grab_dx: at.x - nx,
                    grab_dy: at.y - ny,
                };
                EventOutcome::Redraw
            }
            Hit::Edge(index) => {
                self.selection = Selection::Edge(index);
                EventOutcome::Redraw
            }
            Hit::Canvas => {
                self.selection = Selection::None;
                self.mode = Mode::Panning {
                    origin_x: x,
                    origin_y: y,
                    pan_x: self.viewport.pan_x,
                    pan_y: self.viewport.pan_y,
                };
                EventOutcome::Redraw
            }
        }
    }

    /// A press while connecting: a different node commits the edge, a handle
    /// restarts the connection from its node, anything else cancels.
    fn resolve_connection(&mut self, from: &str, at: Point) -> EventOutcome {
        match self.hit_test(at) {
            Hit::Handle(id) => {
                self.mode = Mode::Connecting { from: id };
                EventOutcome::Redraw
            }
            Hit::Node(to) if to != from => {
                self.mode = Mode::Idle;
                self.graph.add_edge(from, &to, "");
                debug!("connected {from} -> {to}");
                EventOutcome::GraphChanged
            }
            _ => {
                self.mode = Mode::Idle;
                EventOutcome::Redraw
            }
        }
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> EventOutcome {
        let at = self.viewport.to_model(x, y);
        self.pointer = at;
        match &self.mode {
            Mode::DraggingNode {
                id,
                grab_dx,
                grab_dy,
            } => {
                let id = id.clone();
                let (dx, dy) = (*grab_dx, *grab_dy);
                self.graph.move_node(&id, at.x - dx, at.y - dy);
                EventOutcome::GraphChanged
            }
            Mode::Panning {
                origin_x,
                origin_y,
                pan_x,
                pan_y,
            } => {
                // Pan follows the raw screen delta; zoom never scales it.
                let new_x = pan_x + (x - origin_x);
                let new_y = pan_y + (y - origin_y);
                self.viewport.set_pan(new_x, new_y);
                EventOutcome::Redraw
            }
            Mode::Connecting { .. } => EventOutcome::Redraw,
            _ => EventOutcome::Ignored,
        }
    }

    fn pointer_up(&mut self) -> EventOutcome {
        match self.mode {
            Mode::DraggingNode { .. } | Mode::Panning { .. } => {
                self.mode = Mode::Idle;
                EventOutcome::Redraw
            }
            _ => EventOutcome::Ignored,
        }
    }

    fn double_click(&mut self, x: f32, y: f32) -> EventOutcome {
        if !matches!(self.mode, Mode::Idle) {
            return EventOutcome::Ignored;
        }
        let at = self.viewport.to_model(x, y);
        match self.hit_test(at) {
            Hit::Handle(id) | Hit::Node(id) => {
                let original = match self.graph.node(&id) {
                    Some(n) => n.label.clone(),
                    None => return EventOutcome::Ignored,
                };
                self.mode = Mode::EditingLabel {
                    target: EditTarget::Node(id),
                    original,
                };
                EventOutcome::Redraw
            }
            Hit::Edge(index) => {
                let Some((g, edge)) = self.edge_parts(index) else {
                    return EventOutcome::Ignored;
                };
                // Only the label box opens the edge editor, and only a
                // non-empty label has one.
                let anchor = geometry::curve_midpoint(&g);
                if edge.label.is_empty() || !geometry::label_box(anchor, &edge.label).contains(at)
                {
                    return EventOutcome::Ignored;
                }
                let original = edge.label.clone();
                self.mode = Mode::EditingLabel {
                    target: EditTarget::Edge(index),
                    original,
                };
                EventOutcome::Redraw
            }
            Hit::Canvas => EventOutcome::Ignored,
        }
    }

    /// Model-space picking: the selected node's connect handle first, then
    /// node bodies (topmost drawn wins), then edge curves and label boxes.
    fn hit_test(&self, at: Point) -> Hit {
        if let Selection::Node(id) = &self.selection {
            if let Some(node) = self.graph.node(id) {
                let b = geometry::node_bounds(node);
                let dx = at.x - (b.x + b.width);
                let dy = at.y - (b.y + b.height / 2.0);
                if (dx * dx + dy * dy).sqrt() <= HANDLE_HIT_RADIUS {
                    return Hit::Handle(id.clone());
                }
            }
        }
        for node in self.graph.nodes().iter().rev() {
            if geometry::node_bounds(node).contains(at) {
                return Hit::Node(node.id.clone());
            }
        }
        for index in (0..self.graph.edges().len()).rev() {
            if let Some((g, edge)) = self.edge_parts(index) {
                if geometry::distance_to_curve(&g, at) <= EDGE_HIT_TOLERANCE {
                    return Hit::Edge(index);
                }
                if !edge.label.is_empty()
                    && geometry::label_box(geometry::curve_midpoint(&g), &edge.label).contains(at)
                {
                    return Hit::Edge(index);
                }
            }
        }
        Hit::Canvas
    }

    fn edge_parts(&self, index: usize) -> Option<(geometry::EdgeGeometry, &crate::model::Edge)> {
        let edge = self.graph.edges().get(index)?;
        let from = self.graph.node(&edge.from)?;
        let to = self.graph.node(&edge.to)?;
        Some((geometry::edge_geometry(from, to), edge))
    }
}
