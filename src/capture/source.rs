//! Seams between the snapshot pipeline and a platform capture backend

use std::time::Duration;

use crate::capture::sink::FrameSink;
use crate::error::Result;

/// One display the platform is willing to share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    pub id: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

/// Stream parameters handed to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    pub width: u32,
    pub height: u32,
    /// Frames buffered between backend and consumer
    pub queue_depth: usize,
    pub frame_interval: Duration,
}

impl StreamConfig {
    /// Full-resolution, single-buffer stream for `display`
    pub fn for_display(display: &DisplayInfo, frame_interval: Duration) -> Self {
        Self {
            width: display.width,
            height: display.height,
            queue_depth: 1,
            frame_interval,
        }
    }
}

/// Enumerates shareable displays and opens capture streams on them
pub trait ScreenSource {
    type Stream: CaptureStream;

    fn displays(&self) -> Result<Vec<DisplayInfo>>;

    /// Configure a stream on `display` that will push frames into `sink`
    /// once started.
    fn open_stream(
        &self,
        display: &DisplayInfo,
        config: &StreamConfig,
        sink: FrameSink,
    ) -> Result<Self::Stream>;
}

/// A configured capture stream. Dropping a running stream must signal it to
/// stop without blocking the caller.
pub trait CaptureStream: Send + 'static {
    fn start(&mut self) -> Result<()>;

    /// Stop delivery and wait for the backend to wind down. May block for one
    /// in-flight grab; calling it on a stopped stream is a no-op.
    fn stop(&mut self) -> Result<()>;
}
