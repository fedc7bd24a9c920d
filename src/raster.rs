use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use tracing::debug;

use crate::export::{ExportError, VectorDescription};
use crate::svg;

/// Default supersampling factor for PNG export.
pub const DEFAULT_RASTER_SCALE: f32 = 2.0;

/// Rasterizes the description to PNG bytes at the given supersampling scale.
pub fn encode_png(desc: &VectorDescription, scale: f32) -> Result<Vec<u8>, ExportError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ExportError::InvalidScale);
    }

    let markup = svg::write_svg(desc);
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(&markup, &options)?;

    let size = tree.size().to_int_size();
    let width = (size.width() as f32 * scale).ceil();
    let height = (size.height() as f32 * scale).ceil();
    // Degenerate sizes only happen through the scale factor; the projector
    // always pads the canvas to a drawable size.
    if !(1.0..=u32::MAX as f32).contains(&width) || !(1.0..=u32::MAX as f32).contains(&height) {
        return Err(ExportError::InvalidScale);
    }
    let width = width as u32;
    let height = height as u32;

    let mut pixmap =
        Pixmap::new(width, height).ok_or(ExportError::PixmapAlloc { width, height })?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    debug!("rasterized {width}x{height} PNG");

    pixmap
        .encode_png()
        .map_err(|err| ExportError::PngEncode(err.to_string()))
}
