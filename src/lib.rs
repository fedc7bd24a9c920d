pub mod export;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod parser;
pub mod raster;
pub mod svg;
pub mod viewport;

/// Parses the text, lays it out, and renders a standalone SVG document.
pub fn render_svg(input: &str) -> Result<String, export::ExportError> {
    let mut graph = parser::parse(input);
    layout::assign_positions(&mut graph);
    let description = export::project(&graph)?;
    Ok(svg::write_svg(&description))
}

/// Parses the text, lays it out, and renders PNG bytes at the given scale.
pub fn render_png(input: &str, scale: f32) -> Result<Vec<u8>, export::ExportError> {
    let mut graph = parser::parse(input);
    layout::assign_positions(&mut graph);
    let description = export::project(&graph)?;
    raster::encode_png(&description, scale)
}
