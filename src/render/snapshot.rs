//! Raster capture of the rendered view: SVG in, opaque PNG out.

use crate::error::{Result, StudioError};

/// Capture scale used for PDF export, 2x the display resolution.
pub const CAPTURE_SCALE: f32 = 2.0;

/// A fixed-resolution raster capture of the invoice view.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Rasterize SVG markup onto an opaque white pixmap at the given scale
/// and encode it as PNG.
pub fn capture(svg: &str, scale: f32) -> Result<Snapshot> {
    let tree = {
        let mut opt = usvg::Options::default();
        opt.fontdb_mut().load_system_fonts();
        usvg::Tree::from_str(svg, &opt)
            .map_err(|e| StudioError::Snapshot(format!("SVG parsing failed: {e}")))?
    };

    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        StudioError::Snapshot(format!("Failed to create pixmap ({width}x{height})"))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let png = pixmap
        .encode_png()
        .map_err(|e| StudioError::Snapshot(format!("PNG encoding failed: {e}")))?;

    Ok(Snapshot {
        png,
        width_px: width,
        height_px: height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_doubles_dimensions() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="250"><rect width="100%" height="100%" fill="#ffffff"/><rect x="10" y="10" width="30" height="30" fill="#2563eb"/></svg>"##;
        let snapshot = capture(svg, 2.0).unwrap();
        assert_eq!(snapshot.width_px, 200);
        assert_eq!(snapshot.height_px, 500);
        assert!(snapshot.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn malformed_svg_is_an_error() {
        let err = capture("<svg", 2.0).unwrap_err();
        assert!(err.to_string().contains("snapshot"));
    }
}
