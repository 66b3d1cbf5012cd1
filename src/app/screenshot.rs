use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use eframe::egui::ColorImage;

pub(super) fn screenshot_file_name(taken_at: DateTime<Local>) -> String {
    format!("geometric_art_{}.png", taken_at.format("%Y%m%d_%H%M%S"))
}

/// Writes a captured frame as `geometric_art_<timestamp>.png` inside `dir`.
pub(super) fn save_screenshot(
    frame: &ColorImage,
    dir: &Path,
    taken_at: DateTime<Local>,
) -> Result<PathBuf> {
    let [width, height] = frame.size;
    let rgba = frame
        .pixels
        .iter()
        .flat_map(|pixel| pixel.to_srgba_unmultiplied())
        .collect::<Vec<u8>>();

    let path = dir.join(screenshot_file_name(taken_at));
    image::save_buffer_with_format(
        &path,
        &rgba,
        u32::try_from(width).context("screenshot too wide")?,
        u32::try_from(height).context("screenshot too tall")?,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("failed to write screenshot {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn taken_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn file_name_carries_timestamp() {
        assert_eq!(screenshot_file_name(taken_at()), "geometric_art_20240305_140709.png");
    }

    #[test]
    fn saved_png_matches_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut rgba = [248, 250, 252, 255].repeat(6);
        rgba[..4].copy_from_slice(&[255, 0, 0, 255]);
        let frame = ColorImage::from_rgba_unmultiplied([3, 2], &rgba);

        let path = save_screenshot(&frame, dir.path(), taken_at()).unwrap();

        assert_eq!(path, dir.path().join("geometric_art_20240305_140709.png"));
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(2, 1).0, [248, 250, 252, 255]);
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let frame = ColorImage::from_rgba_unmultiplied([1, 1], &[0, 0, 0, 255]);

        let error = save_screenshot(&frame, &dir.path().join("absent"), taken_at()).unwrap_err();

        assert!(error.to_string().contains("failed to write screenshot"));
    }
}
