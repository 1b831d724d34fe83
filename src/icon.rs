use std::fs;
use std::path::Path;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use serde::Serialize;

use crate::error::MaintError;

pub const ICON_SIZE: u32 = 512;

#[derive(Debug, Clone, Serialize)]
pub struct RenderResult {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Rasterizes the SVG at `svg_path` to an exactly `size`x`size` PNG at
/// `png_path`, creating the output's parent directories first. The image is
/// scaled to fill the output on both axes, so a non-square source is
/// stretched rather than letterboxed.
pub fn render_png(svg_path: &Path, png_path: &Path, size: u32) -> Result<RenderResult, MaintError> {
    let svg_data = fs::read(svg_path).map_err(|err| {
        MaintError::Filesystem(format!("read svg {}: {err}", svg_path.display()))
    })?;

    let mut options = usvg::Options::default();
    options.resources_dir = fs::canonicalize(svg_path)
        .ok()
        .and_then(|path| path.parent().map(|parent| parent.to_path_buf()));
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_data(&svg_data, &options)
        .map_err(|err| MaintError::SvgParse(err.to_string()))?;

    let mut pixmap = Pixmap::new(size, size)
        .ok_or_else(|| MaintError::Render(format!("cannot allocate {size}x{size} pixmap")))?;
    let tree_size = tree.size();
    let transform = Transform::from_scale(
        size as f32 / tree_size.width(),
        size as f32 / tree_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    if let Some(parent) = png_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| MaintError::Filesystem(err.to_string()))?;
    }
    pixmap
        .save_png(png_path)
        .map_err(|err| MaintError::Render(err.to_string()))?;

    Ok(RenderResult {
        path: png_path.display().to_string(),
        width: size,
        height: size,
    })
}
