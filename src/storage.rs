// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for rendered frame snapshots

use crate::constants::snapshot;
use crate::errors::{AppError, AppResult};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default snapshot directory: `<Pictures>/depth-replay`, or the working directory
pub fn default_snapshot_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(snapshot::DIR_NAME)
}

/// File name for a snapshot of `frame_number` taken now
pub fn snapshot_file_name(frame_number: usize) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!(
        "FRAME_{:04}_{}.{}",
        frame_number,
        timestamp,
        snapshot::EXTENSION
    )
}

/// Export file name for a frame: the full frame file name plus `.png`,
/// so `a.raw` and `a.bin` stay distinct
pub fn export_file_name(frame_path: &Path, frame_number: usize) -> String {
    match frame_path.file_name() {
        Some(name) => format!("{}.{}", name.to_string_lossy(), snapshot::EXTENSION),
        None => format!("frame_{:04}.{}", frame_number, snapshot::EXTENSION),
    }
}

/// Write `image` to `path`, creating parent directories
pub fn save_image(image: &RgbImage, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::Export(format!("cannot create {}: {}", parent.display(), e)))?;
    }
    image.save(path)?;
    Ok(())
}

/// Save a timestamped snapshot of the current frame into `dir`
pub fn save_snapshot(image: &RgbImage, dir: &Path, frame_number: usize) -> AppResult<PathBuf> {
    let path = dir.join(snapshot_file_name(frame_number));
    save_image(image, &path)?;
    info!(path = %path.display(), "Snapshot saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_snapshot_file_name() {
        let name = snapshot_file_name(7);
        assert!(name.starts_with("FRAME_0007_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_export_names_keep_extension() {
        let a = export_file_name(Path::new("/frames/a.raw"), 1);
        let b = export_file_name(Path::new("/frames/a.bin"), 2);
        assert_eq!(a, "a.raw.png");
        assert_eq!(b, "a.bin.png");
        assert_eq!(export_file_name(Path::new("/"), 3), "frame_0003.png");
    }

    #[test]
    fn test_save_snapshot_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let image = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));

        let path = save_snapshot(&image, &target, 1).unwrap();
        assert!(path.starts_with(&target));

        let reloaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reloaded, image);
    }
}
