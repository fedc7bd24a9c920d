use crate::export::{Primitive, VectorDescription};

const BACKGROUND: &str = "#ffffff";
const EDGE_STROKE: &str = "#c4b8a0";
const SHAPE_FILL: &str = "#f5f0e8";
const SHAPE_STROKE: &str = "#8b5e3c";
const TEXT_COLOR: &str = "#2c1810";

/// Serializes a vector description as a standalone SVG document.
pub fn write_svg(desc: &VectorDescription) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.0} {:.0}\" font-family=\"Georgia, serif\">\n",
        desc.width, desc.height, desc.width, desc.height
    ));
    svg.push_str(&format!(
        "  <defs>\n    <marker id=\"arrow\" markerWidth=\"10\" markerHeight=\"7\" refX=\"10\" refY=\"3.5\" orient=\"auto\">\n      <polygon points=\"0 0,10 3.5,0 7\" fill=\"{EDGE_STROKE}\" />\n    </marker>\n  </defs>\n"
    ));
    svg.push_str(&format!(
        "  <rect width=\"100%\" height=\"100%\" fill=\"{BACKGROUND}\" />\n"
    ));

    for primitive in &desc.primitives {
        match primitive {
            Primitive::Rect {
                x,
                y,
                width,
                height,
                corner_radius,
            } => svg.push_str(&format!(
                "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{width:.1}\" height=\"{height:.1}\" rx=\"{corner_radius:.1}\" fill=\"{SHAPE_FILL}\" stroke=\"{SHAPE_STROKE}\" stroke-width=\"1.5\" />\n"
            )),
            Primitive::Polygon { points } => {
                let list = points
                    .iter()
                    .map(|p| format!("{:.1},{:.1}", p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(" ");
                svg.push_str(&format!(
                    "  <polygon points=\"{list}\" fill=\"{SHAPE_FILL}\" stroke=\"{SHAPE_STROKE}\" stroke-width=\"1.5\" />\n"
                ));
            }
            Primitive::Curve {
                start,
                control,
                end,
            } => svg.push_str(&format!(
                "  <path d=\"M{:.1},{:.1} Q{:.1},{:.1} {:.1},{:.1}\" stroke=\"{EDGE_STROKE}\" stroke-width=\"1.5\" fill=\"none\" marker-end=\"url(#arrow)\" />\n",
                start.x, start.y, control.x, control.y, end.x, end.y
            )),
            Primitive::Text {
                x,
                y,
                content,
                size,
            } => svg.push_str(&format!(
                "  <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"{TEXT_COLOR}\" font-size=\"{size}\">{}</text>\n",
                escape_xml(content)
            )),
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
