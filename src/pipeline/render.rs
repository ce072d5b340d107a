//! SVG rasterisation: parse with `usvg`, paint with `resvg` onto a white
//! `tiny_skia` pixmap of exactly the configured size.
//!
//! The output is always exactly `width × height`. The SVG is scaled by one
//! factor so it fits inside the target and is centred; when the aspect ratios
//! differ the leftover margins stay white. Transparent regions end up white
//! because the pixmap is filled before painting; the returned image is fully
//! opaque.
//!
//! Everything here is blocking and CPU-bound. The async batch loop calls it
//! through `spawn_blocking`.

use crate::error::FileError;
use image::RgbaImage;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg;
use std::path::Path;
use tracing::debug;

/// Read and rasterise the SVG at `svg_path`.
///
/// Relative `href`s inside the document resolve against the file's directory.
pub fn rasterize(svg_path: &Path, width: u32, height: u32) -> Result<RgbaImage, FileError> {
    let data = std::fs::read(svg_path).map_err(|e| FileError::ReadFailed {
        path: svg_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let resources_dir = std::fs::canonicalize(svg_path)
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    let opt = usvg::Options {
        resources_dir,
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_data(&data, &opt).map_err(|e| FileError::InvalidSvg {
        path: svg_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    render_tree(&tree, width, height)
}

/// Rasterise SVG markup held in memory.
pub fn rasterize_data(data: &[u8], width: u32, height: u32) -> Result<RgbaImage, FileError> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default()).map_err(|e| {
        FileError::InvalidSvg {
            path: "<memory>".into(),
            detail: e.to_string(),
        }
    })?;
    render_tree(&tree, width, height)
}

fn render_tree(tree: &usvg::Tree, width: u32, height: u32) -> Result<RgbaImage, FileError> {
    let mut pixmap = Pixmap::new(width, height).ok_or(FileError::PixmapAlloc { width, height })?;
    pixmap.fill(Color::WHITE);

    let size = tree.size();
    let transform = fit_transform(size.width(), size.height(), width, height);
    resvg::render(tree, transform, &mut pixmap.as_mut());

    debug!(
        "Rendered {}x{} SVG → {}x{} px",
        size.width(),
        size.height(),
        width,
        height
    );

    // Opaque after the white fill, but demultiply anyway so the RGBA buffer
    // is straight alpha whatever the renderer left behind.
    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    RgbaImage::from_raw(width, height, rgba).ok_or(FileError::PixmapAlloc { width, height })
}

/// Uniform scale that fits `src_w × src_h` inside `width × height`, centred.
fn fit_transform(src_w: f32, src_h: f32, width: u32, height: u32) -> Transform {
    let (width, height) = (width as f32, height as f32);
    let scale = (width / src_w).min(height / src_h);
    let tx = (width - src_w * scale) / 2.0;
    let ty = (height - src_h * scale) / 2.0;
    Transform::from_row(scale, 0.0, 0.0, scale, tx, ty)
}
