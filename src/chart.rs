//! Pie chart of products per stock status, written as a PNG.
//!
//! Slices start at twelve o'clock and run counter-clockwise in status order.
//! Statuses with no products get no slice. A legend strip on the right shows
//! one swatch per charted status, each followed by a bar whose length is
//! proportional to the count.

use crate::error::ChartError;
use crate::models::ProductStatus;
use crate::stats::StatusCounts;
use image::{ImageFormat, Rgb, RgbImage};
use log::info;
use std::path::Path;

pub const DEFAULT_CHART_PATH: &str = "thong_ke_kho_hang.png";

const WIDTH: u32 = 640;
const HEIGHT: u32 = 400;
const CENTER: (f64, f64) = (200.0, 200.0);
const RADIUS: f64 = 170.0;
const LEGEND_X: u32 = 420;
const LEGEND_Y: u32 = 60;
const SWATCH: u32 = 24;
const LEGEND_ROW: u32 = 48;
const LEGEND_BAR_MAX: u32 = 170;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BAR_COLOR: Rgb<u8> = Rgb([90, 90, 90]);

/// Slice colour of a status
pub fn status_color(status: ProductStatus) -> Rgb<u8> {
    match status {
        ProductStatus::NeedsRestock => Rgb([0xff, 0x99, 0x99]),
        ProductStatus::Normal => Rgb([0x66, 0xb3, 0xff]),
        ProductStatus::SlowMoving => Rgb([0x99, 0xff, 0x99]),
    }
}

/// Non-empty statuses with the angle (degrees, from twelve o'clock) where
/// their slice ends
fn slice_bounds(stats: &StatusCounts) -> Vec<(ProductStatus, f64)> {
    let total = stats.total() as f64;
    let mut end = 0.0;
    stats
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| {
            end += count as f64 / total * 360.0;
            (status, end)
        })
        .collect()
}

/// Draws the chart in memory
pub fn draw_status_pie(stats: &StatusCounts) -> Result<RgbImage, ChartError> {
    if stats.total() == 0 {
        return Err(ChartError::NoData);
    }

    let slices = slice_bounds(stats);
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - CENTER.0;
        let dy = CENTER.1 - (y as f64 + 0.5);
        if dx * dx + dy * dy > RADIUS * RADIUS {
            continue;
        }
        let angle = (dy.atan2(dx).to_degrees() - 90.0).rem_euclid(360.0);
        let slice = slices
            .iter()
            .find(|(_, end)| angle < *end)
            .or_else(|| slices.last());
        if let Some((status, _)) = slice {
            *pixel = status_color(*status);
        }
    }

    let max_count = stats.iter().map(|(_, c)| c).max().unwrap_or(1).max(1);
    for (row, (status, count)) in stats.iter().filter(|(_, c)| *c > 0).enumerate() {
        let top = LEGEND_Y + row as u32 * LEGEND_ROW;
        fill_rect(&mut img, LEGEND_X, top, SWATCH, SWATCH, status_color(status));
        let bar = legend_bar_length(count, max_count);
        fill_rect(&mut img, LEGEND_X + SWATCH + 8, top + 8, bar, SWATCH - 16, BAR_COLOR);
    }

    Ok(img)
}

/// Bar length for `count`, scaled against the largest count and never zero
fn legend_bar_length(count: usize, max_count: usize) -> u32 {
    let scaled = count as u128 * LEGEND_BAR_MAX as u128 / max_count.max(1) as u128;
    scaled.clamp(1, LEGEND_BAR_MAX as u128) as u32
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

/// Draws the chart and writes it to `path` as PNG
pub fn render_status_pie(stats: &StatusCounts, path: &Path) -> Result<(), ChartError> {
    let img = draw_status_pie(stats)?;
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|source| ChartError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Chart saved to {}", path.display());
    Ok(())
}
