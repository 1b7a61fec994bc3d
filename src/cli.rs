// SPDX-License-Identifier: GPL-3.0-only

//! Headless export
//!
//! Tracks the whole session and writes one annotated image per frame,
//! without opening the terminal viewer.

use depth_replay::PlaybackController;
use depth_replay::config::Config;
use depth_replay::skeleton::overlay::OverlayStyle;
use depth_replay::storage;
use std::path::Path;

/// Track all frames and save `<output>/<frame file name>.png` for each
pub fn export_all(
    player: &mut PlaybackController,
    config: &Config,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if player.is_empty() {
        println!("No frames to export.");
        return Ok(());
    }

    let report = player.track()?;
    println!(
        "Tracked {} frames ({} with joints, {} failed)",
        report.frames,
        report.with_joints,
        report.failures.len()
    );
    for failure in &report.failures {
        println!(
            "  frame {} ({}): {}",
            failure.index + 1,
            failure.path.display(),
            failure.error
        );
    }

    let style = OverlayStyle {
        point_size: config.point_size,
        connections: true,
    };

    player.first();
    loop {
        if let (Some(image), Some(path)) = (player.render_current(&style), player.current_path()) {
            let target = output.join(storage::export_file_name(path, player.frame_number()));
            storage::save_image(&image, &target)?;
        }
        if !player.next() {
            break;
        }
    }

    println!("Wrote {} images to {}", player.len(), output.display());
    Ok(())
}
