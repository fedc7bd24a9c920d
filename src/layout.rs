use std::collections::{HashMap, VecDeque};

use crate::geometry::{NODE_HEIGHT, NODE_WIDTH};
use crate::model::Graph;

/// Horizontal gap between level-mates; column pitch is NODE_WIDTH + GUTTER_X.
const GUTTER_X: f32 = 76.0;
/// Vertical gap between levels; row pitch is NODE_HEIGHT + GUTTER_Y.
const GUTTER_Y: f32 = 68.0;
const MARGIN: f32 = 60.0;

/// Assigns a grid position to every node: BFS levels top to bottom, node
/// insertion order left to right within a level. Runs once after parsing.
pub fn assign_positions(graph: &mut Graph) {
    if graph.is_empty() {
        return;
    }
    let levels = bfs_levels(graph);
    let mut used: HashMap<usize, usize> = HashMap::new();
    let placements: Vec<(String, f32, f32)> = graph
        .nodes()
        .iter()
        .map(|n| {
            let level = levels[&n.id];
            let slot = used.entry(level).or_insert(0);
            let x = *slot as f32 * (NODE_WIDTH + GUTTER_X) + MARGIN;
            let y = level as f32 * (NODE_HEIGHT + GUTTER_Y) + MARGIN;
            *slot += 1;
            (n.id.clone(), x, y)
        })
        .collect();
    for (id, x, y) in placements {
        graph.move_node(&id, x, y);
    }
}

/// BFS depth per node, rooted at the first node in insertion order. The
/// levels map doubles as the visited set, so cycles terminate and a node
/// with several parents keeps its first-assigned level.
fn bfs_levels(graph: &Graph) -> HashMap<String, usize> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges() {
        adjacency
            .entry(edge.from.as_str())
            .or_default()
            .push(edge.to.as_str());
    }

    let mut levels: HashMap<String, usize> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    if let Some(root) = graph.nodes().first() {
        levels.insert(root.id.clone(), 0);
        queue.push_back(root.id.as_str());
    }
    while let Some(current) = queue.pop_front() {
        let level = levels[current];
        for &next in adjacency.get(current).into_iter().flatten() {
            if !levels.contains_key(next) {
                levels.insert(next.to_string(), level + 1);
                queue.push_back(next);
            }
        }
    }

    // Nodes the BFS never reached land on the top level.
    for node in graph.nodes() {
        levels.entry(node.id.clone()).or_insert(0);
    }
    levels
}
