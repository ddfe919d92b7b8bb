//! SVG to PNG rasterisation
//!
//! EMF images are translated to SVG first and rendered here, as is the
//! placeholder icon for images missing from the package.

use thiserror::Error;

/// Rasterisation errors
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Failed to parse SVG: {0}")]
    ParseError(String),

    #[error("Failed to create image buffer: dimensions {width}x{height}")]
    BufferError { width: u32, height: u32 },

    #[error("Failed to encode PNG")]
    EncodeError,
}

/// Render SVG bytes into a PNG of exactly `width` x `height` pixels
///
/// # Parameters
/// * `svg_data` - Raw SVG document bytes
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
///
/// # Returns
/// * `Ok(Vec<u8>)` - PNG bytes
/// * `Err(RasterError)` - Parsing, allocation or encoding failed
pub fn svg_to_png(svg_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::BufferError { width, height });
    }

    let options = resvg::usvg::Options::default();
    let tree = resvg::usvg::Tree::from_data(svg_data, &options)
        .map_err(|e| RasterError::ParseError(e.to_string()))?;

    let size = tree.size();
    let scale_x = width as f32 / size.width();
    let scale_y = height as f32 / size.height();

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or(RasterError::BufferError { width, height })?;

    let transform = resvg::tiny_skia::Transform::from_scale(scale_x, scale_y);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|_| RasterError::EncodeError)
}
