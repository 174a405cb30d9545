use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use log::debug;

use crate::catalog::Catalog;
use crate::render::RenderError;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    /// Edge length of the square canvas, in pixels.
    pub size: u32,
    pub star_radius: f64,
    /// Light-years of empty space kept around the outermost star.
    pub margin: f64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        RasterOptions {
            size: 4096,
            star_radius: 9.0,
            margin: 4.0,
        }
    }
}

/// Paints the catalog looking down the z axis, furthest systems first.
pub fn rasterize(catalog: &Catalog, opts: &RasterOptions) -> Result<RgbaImage, RenderError> {
    if catalog.is_empty() {
        return Err(RenderError::EmptyCatalog);
    }
    if opts.size == 0 || !(opts.star_radius >= 0.0) || !opts.margin.is_finite() {
        return Err(RenderError::InvalidParameter(format!(
            "bad raster options: {opts:?}"
        )));
    }

    let span_x = catalog
        .systems
        .iter()
        .map(|s| s.position.x.abs())
        .fold(0.0, f64::max)
        + opts.margin;
    let span_y = catalog
        .systems
        .iter()
        .map(|s| s.position.y.abs())
        .fold(0.0, f64::max)
        + opts.margin;
    let size = opts.size as f64;
    debug!(
        "raster: {}px canvas spanning ±{span_x:.2} x ±{span_y:.2} ly",
        opts.size
    );

    let mut img = RgbaImage::from_pixel(opts.size, opts.size, BACKGROUND);
    for system in catalog.painter_order() {
        let cx = (system.position.x + span_x) / (2.0 * span_x) * size;
        let cy = (system.position.y + span_y) / (2.0 * span_y) * size;
        fill_circle(&mut img, cx, cy, opts.star_radius, Rgba(system.color.rgba()));
    }
    Ok(img)
}

pub fn save_png<P: AsRef<Path>>(img: &RgbaImage, path: P) -> Result<(), RenderError> {
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn fill_circle(img: &mut RgbaImage, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
    let (width, height) = img.dimensions();
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil().max(0.0) as u32).min(width.saturating_sub(1));
    let y1 = ((cy + radius).ceil().max(0.0) as u32).min(height.saturating_sub(1));
    let r2 = radius * radius;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                img.put_pixel(x, y, color);
            }
        }
    }
}
