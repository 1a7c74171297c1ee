use std::path::PathBuf;

use tracing::info;

use crate::capture::DisplayInfo;
use crate::error::{Result, SnapshotError};

pub const OUTPUT_FILE_NAME: &str = "snapshot.jpg";

/// `<desktop>/snapshot.jpg`, falling back to `~/Desktop` when the platform
/// has no desktop directory registered
pub fn default_output_path() -> Result<PathBuf> {
    dirs::desktop_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
        .map(|desktop| desktop.join(OUTPUT_FILE_NAME))
        .ok_or(SnapshotError::NoOutputDirectory)
}

/// Pick the display to capture: the first one the platform lists
pub fn select_display(displays: &[DisplayInfo]) -> Result<DisplayInfo> {
    let display = displays.first().ok_or(SnapshotError::NoDisplay)?;

    // `display` is shadowed by `tracing::field::display` inside the macro
    let chosen = display;
    info!(
        "Using display {} \"{}\" ({}x{}{})",
        chosen.id,
        chosen.name,
        chosen.width,
        chosen.height,
        if chosen.is_primary { ", primary" } else { "" }
    );

    Ok(display.clone())
}
