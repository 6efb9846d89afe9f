use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{ColorImage, Rect};
use image::{ImageFormat, RgbaImage};

/// Title drawn above the charts.
pub const CHART_TITLE: &str = "Gage R&R Variance Breakdown";

/// Chart title carrying the current header labels.
pub fn chart_caption(operator: &str, part: &str) -> String {
    format!("{CHART_TITLE} | Operator: {operator}, Part: {part}")
}

/// Download name proposed in the save dialog.
pub fn export_file_name(operator: &str, part: &str) -> String {
    format!("GageRR_{operator}_{part}.png")
}

// ---------------------------------------------------------------------------
// Screenshot → PNG
// ---------------------------------------------------------------------------

/// Cut `region` (in points) out of a full-viewport screenshot.
pub fn crop(screenshot: &ColorImage, region: Option<Rect>, pixels_per_point: f32) -> ColorImage {
    match region {
        Some(rect) => screenshot.region(&rect, Some(pixels_per_point)),
        None => screenshot.clone(),
    }
}

/// Convert egui pixels into an `image` buffer.
pub fn to_rgba_image(img: &ColorImage) -> Option<RgbaImage> {
    let [w, h] = img.size;
    let raw: Vec<u8> = img
        .pixels
        .iter()
        .flat_map(|c| c.to_srgba_unmultiplied())
        .collect();
    RgbaImage::from_raw(w as u32, h as u32, raw)
}

/// Write `img` as a PNG file.
pub fn save_png(path: &Path, img: &ColorImage) -> Result<()> {
    let buffer = to_rgba_image(img).context("screenshot has inconsistent dimensions")?;
    buffer
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported chart to {}", path.display());
    Ok(())
}

/// Ask where to save, then write the cropped chart.
pub fn save_screenshot_dialog(
    file_name: &str,
    screenshot: &ColorImage,
    region: Option<Rect>,
    pixels_per_point: f32,
) -> Result<()> {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export chart")
        .set_file_name(file_name)
        .add_filter("PNG image", &["png"])
        .save_file()
    else {
        log::info!("Chart export cancelled");
        return Ok(());
    };
    save_png(&path, &crop(screenshot, region, pixels_per_point))
}
