//! One-shot snapshot pipeline: display → stream → frame → mono JPEG → file

pub mod encode;
pub mod transform;
pub mod writer;

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::capture::{
    frame_channel, CaptureStream, DisplayInfo, Frame, ScreenSource, StreamConfig,
};
use crate::error::Result;
use crate::{utils, Settings};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes_written: u64,
    pub display: DisplayInfo,
}

/// A frame in hand, not yet written. The output path is resolved up front so
/// a run without a destination fails before touching the display.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub frame: Frame,
    pub display: DisplayInfo,
    pub path: PathBuf,
}

/// Capture one frame from the first display of `source` and write it as a
/// monochrome JPEG to the configured output path.
pub async fn take_snapshot<S: ScreenSource>(source: &S, settings: &Settings) -> Result<Snapshot> {
    let captured = capture(source, settings).await?;
    save(captured, settings).await
}

/// Display selection and frame capture. Dropping this future leaves no
/// output behind.
#[instrument(skip_all)]
pub async fn capture<S: ScreenSource>(source: &S, settings: &Settings) -> Result<CapturedFrame> {
    settings.validate()?;
    let path = settings.output_path()?;

    let displays = source.displays()?;
    let display = utils::select_display(&displays)?;

    let frame = capture_one(source, &display, settings).await?;

    Ok(CapturedFrame {
        frame,
        display,
        path,
    })
}

/// Transform, encode and write a captured frame
#[instrument(skip_all)]
pub async fn save(captured: CapturedFrame, settings: &Settings) -> Result<Snapshot> {
    let CapturedFrame {
        frame,
        display,
        path,
    } = captured;

    let quality = settings.output.jpeg_quality();
    let (width, height, bytes_written) = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || process_frame(&frame, quality, &path)).await??
    };

    info!("Snapshot written to {} ({} bytes)", path.display(), bytes_written);

    Ok(Snapshot {
        path,
        width,
        height,
        bytes_written,
        display,
    })
}

/// Start a single-buffer stream, take the first frame, stop the stream
async fn capture_one<S: ScreenSource>(
    source: &S,
    display: &DisplayInfo,
    settings: &Settings,
) -> Result<Frame> {
    let config = StreamConfig::for_display(display, settings.capture.frame_interval());
    let (sink, receiver) = frame_channel(config.queue_depth);

    let mut stream = source.open_stream(display, &config, sink)?;
    stream.start()?;

    let frame = receiver.next_frame(settings.capture.frame_timeout()).await;
    drop(receiver);

    // Joining the backend may wait out an in-flight grab
    let stopped = tokio::task::spawn_blocking(move || stream.stop()).await?;

    let frame = match (frame, stopped) {
        (Ok(frame), Ok(())) => frame,
        (Ok(_), Err(e)) => return Err(e),
        (Err(e), stopped) => {
            if let Err(stop_err) = stopped {
                warn!("Failed to stop capture after error: {}", stop_err);
            }
            return Err(e);
        }
    };

    info!(
        "Captured frame {} ({}x{}, {:?}) after {:?}",
        frame.meta.sequence,
        frame.meta.width,
        frame.meta.height,
        frame.meta.format,
        frame.timestamp.elapsed()
    );
    Ok(frame)
}

/// Transform, encode and persist; runs off the async runtime
fn process_frame(frame: &Frame, quality: u8, path: &Path) -> Result<(u32, u32, u64)> {
    let mono = transform::to_monochrome(frame)?;
    let jpeg = encode::encode_jpeg(&mono, quality)?;
    let written = writer::write_snapshot(path, &jpeg)?;
    Ok((mono.width(), mono.height(), written))
}
