//! Raster image backend (feature `png`).
//!
//! Time on the x axis (`0..=horizon`), global neuron index on the y axis
//! (`0` at the bottom).  Each population gets its own colour.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::{OutputResult, SpikeRaster};

const WIDTH:  u32 = 1600;
const HEIGHT: u32 = 1200;
const MARGIN: u32 = 60;
/// Grid lines every tenth of each axis.
const GRID:   u32 = 10;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS:       Rgb<u8> = Rgb([0, 0, 0]);
const GRID_LINE:  Rgb<u8> = Rgb([191, 191, 191]);

const PALETTE: [Rgb<u8>; 8] = [
    Rgb([0, 0, 0]),
    Rgb([0, 0, 255]),
    Rgb([255, 0, 0]),
    Rgb([0, 128, 0]),
    Rgb([0, 191, 191]),
    Rgb([191, 0, 191]),
    Rgb([64, 64, 64]),
    Rgb([191, 191, 0]),
];

/// Render `raster` over `[0, horizon]` and save it as PNG.
pub fn write_raster_png(path: &Path, raster: &SpikeRaster, horizon: f64) -> OutputResult<()> {
    render(raster, horizon).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

pub fn render(raster: &SpikeRaster, horizon: f64) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let (x0, x1) = (MARGIN, WIDTH - MARGIN);
    let (y0, y1) = (MARGIN, HEIGHT - MARGIN);

    for k in 1..GRID {
        let x = x0 + (x1 - x0) * k / GRID;
        let y = y0 + (y1 - y0) * k / GRID;
        for yy in y0..=y1 {
            img.put_pixel(x, yy, GRID_LINE);
        }
        for xx in x0..=x1 {
            img.put_pixel(xx, y, GRID_LINE);
        }
    }
    for xx in x0..=x1 {
        img.put_pixel(xx, y0, AXIS);
        img.put_pixel(xx, y1, AXIS);
    }
    for yy in y0..=y1 {
        img.put_pixel(x0, yy, AXIS);
        img.put_pixel(x1, yy, AXIS);
    }

    let span_x = f64::from(x1 - x0);
    let span_y = f64::from(y1 - y0);
    let top = raster.size().saturating_sub(1).max(1) as f64;
    for row in raster.entries() {
        let fx = if horizon > 0.0 { (row.time / horizon).clamp(0.0, 1.0) } else { 0.0 };
        let fy = (f64::from(row.neuron) / top).clamp(0.0, 1.0);
        let x = x0 + (fx * span_x).round() as u32;
        let y = y1 - (fy * span_y).round() as u32;
        let colour = PALETTE[row.population as usize % PALETTE.len()];
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let (px, py) = (x + dx, y.saturating_sub(dy));
            if px < WIDTH && py < HEIGHT {
                img.put_pixel(px, py, colour);
            }
        }
    }
    img
}
