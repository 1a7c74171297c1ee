//! Display capture backed by xcap

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};
use xcap::Monitor;

use crate::capture::sink::{Delivery, FrameSink};
use crate::capture::source::{CaptureStream, DisplayInfo, ScreenSource, StreamConfig};
use crate::capture::Frame;
use crate::error::{Result, SnapshotError};

/// Give up after this many failed grabs in a row
const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Monitors of the local machine
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapSource;

impl XcapSource {
    pub fn new() -> Self {
        Self
    }
}

fn display_info(monitor: &Monitor) -> std::result::Result<DisplayInfo, xcap::XCapError> {
    Ok(DisplayInfo {
        id: monitor.id()?,
        name: monitor.name()?,
        width: monitor.width()?,
        height: monitor.height()?,
        is_primary: monitor.is_primary()?,
    })
}

impl ScreenSource for XcapSource {
    type Stream = XcapStream;

    #[instrument(skip(self))]
    fn displays(&self) -> Result<Vec<DisplayInfo>> {
        let monitors =
            Monitor::all().map_err(|e| SnapshotError::backend("enumerate displays", e.to_string()))?;

        monitors
            .iter()
            .map(|monitor| {
                display_info(monitor)
                    .map_err(|e| SnapshotError::backend("query display", e.to_string()))
            })
            .collect()
    }

    fn open_stream(
        &self,
        display: &DisplayInfo,
        config: &StreamConfig,
        sink: FrameSink,
    ) -> Result<XcapStream> {
        if config.width == 0 || config.height == 0 {
            return Err(SnapshotError::backend(
                "configure stream",
                format!("display {} reports a zero-sized area", display.id),
            ));
        }

        // `display` is shadowed by `tracing::field::display` inside the macro
        let display_id = display.id;
        info!(
            "Configured capture of display {} ({}x{}, queue depth {})",
            display_id, config.width, config.height, config.queue_depth
        );

        Ok(XcapStream {
            display_id: display.id,
            interval: config.frame_interval,
            sink: Some(sink),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }
}

/// Grabs the monitor on a worker thread until stopped
pub struct XcapStream {
    display_id: u32,
    interval: Duration,
    sink: Option<FrameSink>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl CaptureStream for XcapStream {
    fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let sink = self
            .sink
            .take()
            .ok_or_else(|| SnapshotError::backend("start capture", "stream was already used"))?;

        let display_id = self.display_id;
        let interval = self.interval;
        let stop = Arc::clone(&self.stop);

        let worker = thread::Builder::new()
            .name("monoshot-capture".into())
            .spawn(move || capture_loop(display_id, interval, sink, stop))
            .map_err(|e| SnapshotError::backend("spawn capture worker", e))?;

        self.worker = Some(worker);
        info!("Capture stream started on display {}", display_id);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        self.stop.store(true, Ordering::Release);
        worker
            .join()
            .map_err(|_| SnapshotError::backend("stop capture", "capture worker panicked"))?;

        info!("Capture stream stopped");
        Ok(())
    }
}

impl Drop for XcapStream {
    fn drop(&mut self) {
        // Detach: the worker exits after its current grab
        if self.worker.take().is_some() {
            self.stop.store(true, Ordering::Release);
        }
    }
}

fn find_monitor(display_id: u32) -> std::result::Result<Monitor, String> {
    Monitor::all()
        .map_err(|e| e.to_string())?
        .into_iter()
        .find(|monitor| monitor.id().ok() == Some(display_id))
        .ok_or_else(|| format!("display {} disappeared", display_id))
}

fn capture_loop(display_id: u32, interval: Duration, sink: FrameSink, stop: Arc<AtomicBool>) {
    let monitor = match find_monitor(display_id) {
        Ok(monitor) => monitor,
        Err(e) => {
            error!("Capture worker could not open display: {}", e);
            return;
        }
    };

    let mut sequence = 0u64;
    let mut failures = 0u32;

    while !stop.load(Ordering::Acquire) {
        match monitor.capture_image() {
            Ok(image) => {
                failures = 0;
                sequence += 1;

                let frame = Frame::from_rgba_image(image, display_id, sequence);
                debug!(
                    sequence,
                    width = frame.meta.width,
                    height = frame.meta.height,
                    "Frame grabbed"
                );

                if sink.deliver(frame) == Delivery::Closed {
                    debug!("Frame receiver gone, ending capture");
                    break;
                }
            }
            Err(e) => {
                failures += 1;
                warn!(display_id, failures, "Screen grab failed: {}", e);
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    error!("Giving up on display {} after {} failed grabs", display_id, failures);
                    break;
                }
            }
        }

        thread::sleep(interval);
    }
}
