pub mod capture;
pub mod error;
pub mod pipeline;
pub mod utils;

use std::path::PathBuf;
use std::time::Duration;

pub use capture::{Frame, XcapSource};
pub use error::{Result, SnapshotError};
pub use pipeline::{take_snapshot, Snapshot};

/// Knobs of one run. The binary always runs with the defaults; tests steer
/// the output path and timeouts through here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub capture: CaptureSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    /// Upper bound on waiting for the first frame
    pub frame_timeout_ms: u64,
    /// Cadence at which the backend grabs the display
    pub frame_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Overrides `<desktop>/snapshot.jpg`
    pub path: Option<PathBuf>,
    /// Lossy compression quality in (0, 1]
    pub quality: f32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            frame_timeout_ms: 2000,
            frame_interval_ms: 16,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: None,
            quality: 0.7,
        }
    }
}

impl CaptureSettings {
    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl OutputSettings {
    /// Quality on the 1..=100 scale JPEG encoders take
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let quality = self.output.quality;
        if !(quality > 0.0 && quality <= 1.0) {
            return Err(SnapshotError::InvalidConfig(format!(
                "output.quality must be in (0, 1], got {quality}"
            )));
        }
        if self.capture.frame_timeout_ms == 0 {
            return Err(SnapshotError::InvalidConfig(
                "capture.frame_timeout_ms must be positive".into(),
            ));
        }
        if self.capture.frame_interval_ms == 0 {
            return Err(SnapshotError::InvalidConfig(
                "capture.frame_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Where the snapshot lands
    pub fn output_path(&self) -> Result<PathBuf> {
        match &self.output.path {
            Some(path) => Ok(path.clone()),
            None => utils::default_output_path(),
        }
    }
}
