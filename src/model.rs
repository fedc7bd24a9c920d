/// Shape drawn for a node, chosen by the DSL delimiter that declared it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Rect,
    Round,
    Stadium,
    Subroutine,
    Diamond,
    Flag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    /// Top-left corner of the node's fixed-size box, model space.
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// Diagram content: insertion-ordered nodes plus an ordered edge list.
///
/// Every edge endpoint references an existing node id. Mutations that would
/// break that invariant degrade to no-ops, and removing a node cascades to
/// every edge touching it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Appends a node under a freshly generated id and returns that id.
    pub fn add_node(&mut self, label: &str, shape: NodeShape, x: f32, y: f32) -> String {
        let mut n = self.nodes.len() + 1;
        let mut id = format!("N{n}");
        while self.node(&id).is_some() {
            n += 1;
            id = format!("N{n}");
        }
        self.nodes.push(Node {
            id: id.clone(),
            label: label.to_string(),
            shape,
            x,
            y,
        });
        id
    }

    /// Registers `id` if absent; an existing node keeps its label and shape.
    pub fn ensure_node(&mut self, id: &str, label: &str, shape: NodeShape) {
        if self.node(id).is_none() {
            self.nodes.push(Node {
                id: id.to_string(),
                label: label.to_string(),
                shape,
                x: 0.0,
                y: 0.0,
            });
        }
    }

    /// Registers `id`, or updates the existing node's label and shape in place.
    pub fn define_node(&mut self, id: &str, label: &str, shape: NodeShape) {
        match self.node_mut(id) {
            Some(node) => {
                node.label = label.to_string();
                node.shape = shape;
            }
            None => self.ensure_node(id, label, shape),
        }
    }

    pub fn rename_node(&mut self, id: &str, label: &str) {
        if let Some(node) = self.node_mut(id) {
            node.label = label.to_string();
        }
    }

    pub fn set_shape(&mut self, id: &str, shape: NodeShape) {
        if let Some(node) = self.node_mut(id) {
            node.shape = shape;
        }
    }

    pub fn move_node(&mut self, id: &str, x: f32, y: f32) {
        if let Some(node) = self.node_mut(id) {
            node.x = x;
            node.y = y;
        }
    }

    /// Removes the node and every edge referencing it; surviving edges keep
    /// their order. Unknown ids are a no-op.
    pub fn delete_node(&mut self, id: &str) {
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.from != id && e.to != id);
    }

    /// Appends an edge. Self-loops and unknown endpoints are refused;
    /// duplicate edges between the same ordered pair are allowed.
    pub fn add_edge(&mut self, from: &str, to: &str, label: &str) {
        if from == to {
            return;
        }
        self.push_edge(from, to, label);
    }

    /// Edge append without the self-loop rule; endpoints must still exist.
    pub(crate) fn push_edge(&mut self, from: &str, to: &str, label: &str) {
        if self.node(from).is_none() || self.node(to).is_none() {
            return;
        }
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            label: label.to_string(),
        });
    }

    pub fn delete_edge(&mut self, index: usize) {
        if index < self.edges.len() {
            self.edges.remove(index);
        }
    }

    pub fn set_edge_label(&mut self, index: usize, label: &str) {
        if let Some(edge) = self.edges.get_mut(index) {
            edge.label = label.to_string();
        }
    }
}
