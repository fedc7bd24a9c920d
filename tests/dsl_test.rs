use pretty_assertions::assert_eq;

use inkflow::geometry::{NODE_HEIGHT, NODE_WIDTH};
use inkflow::model::{Graph, NodeShape};
use inkflow::{layout, parser};

fn parsed(input: &str) -> Graph {
    let mut graph = parser::parse(input);
    layout::assign_positions(&mut graph);
    graph
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn two_step_flow_builds_the_expected_graph() {
    let input = "\
flowchart TD
  A[Start] -->|go| B(End)
";
    let graph = parsed(input);

    assert_eq!(graph.nodes().len(), 2);
    let a = graph.node("A").unwrap();
    assert_eq!(a.label, "Start");
    assert_eq!(a.shape, NodeShape::Rect);
    let b = graph.node("B").unwrap();
    assert_eq!(b.label, "End");
    assert_eq!(b.shape, NodeShape::Round);

    assert_eq!(graph.edges().len(), 1);
    let edge = &graph.edges()[0];
    assert_eq!(edge.from, "A");
    assert_eq!(edge.to, "B");
    assert_eq!(edge.label, "go");
}

#[test]
fn bare_endpoints_use_the_id_as_label() {
    let graph = parsed("start --> finish\n");
    assert_eq!(graph.node("start").unwrap().label, "start");
    assert_eq!(graph.node("finish").unwrap().label, "finish");
}

#[test]
fn every_shape_delimiter_is_recognized() {
    let input = "\
a[one] --> b(two)
b --> c([three])
c --> d((four))
d --> e{five}
e --> f[[six]]
f --> g>seven]
";
    let graph = parsed(input);
    let shapes: Vec<NodeShape> = ["a", "b", "c", "d", "e", "f", "g"]
        .iter()
        .map(|id| graph.node(id).unwrap().shape)
        .collect();
    assert_eq!(
        shapes,
        vec![
            NodeShape::Rect,
            NodeShape::Round,
            NodeShape::Stadium,
            NodeShape::Stadium,
            NodeShape::Diamond,
            NodeShape::Subroutine,
            NodeShape::Flag,
        ]
    );
    assert_eq!(graph.node("g").unwrap().label, "seven");
}

#[test]
fn arrow_endpoints_never_overwrite_an_earlier_label() {
    let graph = parsed("A[First] --> B\nA[Second] --> C\n");
    assert_eq!(graph.node("A").unwrap().label, "First");
}

#[test]
fn standalone_node_line_updates_in_place() {
    let graph = parsed("A[First] --> B\nA{Second}\n");
    let a = graph.node("A").unwrap();
    assert_eq!(a.label, "Second");
    assert_eq!(a.shape, NodeShape::Diamond);
    assert_eq!(graph.nodes().len(), 2);
}

#[test]
fn unicode_labels_survive_the_pipeline() {
    let graph = parsed("A[日本語ラベル] --> B\n");
    assert_eq!(graph.node("A").unwrap().label, "日本語ラベル");
}

#[test]
fn labels_are_trimmed_at_every_site() {
    let graph = parsed("A[ Start ] -->| go | B(Finish)\nB[]\n");
    assert_eq!(graph.node("A").unwrap().label, "Start");
    assert_eq!(graph.edges()[0].label, "go");
    assert_eq!(graph.node("B").unwrap().label, "B");
}

// =============================================================================
// Leniency
// =============================================================================

#[test]
fn junk_lines_are_dropped_without_error() {
    let input = "\
flowchart TD
%% comment
A --> B
!!! not a line
A -
[B] --> C
";
    let graph = parsed(input);
    assert_eq!(graph.nodes().len(), 2);
    assert_eq!(graph.edges().len(), 1);
}

#[test]
fn parse_is_total_over_arbitrary_text() {
    let junk = "\u{0}\u{1}\nππππ\n--->\n>>>\n-->B\n((((\n";
    let graph = parsed(junk);
    assert!(graph.is_empty());
}

#[test]
fn empty_input_yields_an_empty_graph() {
    let graph = parsed("");
    assert!(graph.is_empty());
    assert_eq!(graph.edges().len(), 0);
}

#[test]
fn header_lines_are_skipped() {
    let graph = parsed("graph LR\nA --> B\n");
    assert!(graph.node("graph").is_none());
    assert_eq!(graph.nodes().len(), 2);
}

#[test]
fn self_loops_in_text_are_kept() {
    let graph = parsed("A --> A\n");
    assert_eq!(graph.nodes().len(), 1);
    assert_eq!(graph.edges().len(), 1);
}

#[test]
fn duplicate_arrows_are_kept() {
    let graph = parsed("A --> B\nA --> B\n");
    assert_eq!(graph.edges().len(), 2);
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn linear_chain_stacks_rows() {
    let graph = parsed("A --> B\nB --> C\n");
    let ys: Vec<f32> = ["A", "B", "C"]
        .iter()
        .map(|id| graph.node(id).unwrap().y)
        .collect();
    assert_eq!(ys, vec![60.0, 180.0, 300.0]);
    assert!(["A", "B", "C"]
        .iter()
        .all(|id| graph.node(id).unwrap().x == 60.0));
}

#[test]
fn level_mates_share_a_row_and_step_columns() {
    let graph = parsed("A --> B\nA --> C\nB --> D\nC --> D\n");
    let b = graph.node("B").unwrap();
    let c = graph.node("C").unwrap();
    assert_eq!(b.y, c.y);
    assert_eq!(c.x - b.x, NODE_WIDTH + 76.0);
    let d = graph.node("D").unwrap();
    assert_eq!(d.y, b.y + NODE_HEIGHT + 68.0);
}

#[test]
fn two_step_flow_levels_then_delete_cascade() {
    let mut graph = parsed("flowchart TD\nA[Start] --> B{Check}\nB -->|yes| C(Done)\n");
    let ys: Vec<f32> = ["A", "B", "C"]
        .iter()
        .map(|id| graph.node(id).unwrap().y)
        .collect();
    assert_eq!(ys, vec![60.0, 180.0, 300.0]);

    graph.delete_node("B");
    assert_eq!(graph.nodes().len(), 2);
    assert_eq!(graph.edges().len(), 0);
}

#[test]
fn cycles_do_not_hang_the_layout() {
    let graph = parsed("A --> B\nB --> C\nC --> A\n");
    assert_eq!(graph.nodes().len(), 3);
    assert_eq!(graph.node("A").unwrap().y, 60.0);
}

#[test]
fn disconnected_nodes_join_the_top_row() {
    let graph = parsed("A --> B\nLoner[Alone]\n");
    let loner = graph.node("Loner").unwrap();
    assert_eq!(loner.y, 60.0);
    assert_eq!(loner.x, 60.0 + NODE_WIDTH + 76.0);
}
