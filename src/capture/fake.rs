//! In-process screen source serving synthetic frames

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use image::{Rgba, RgbaImage};

use crate::capture::{
    CaptureStream, DisplayInfo, Frame, FrameMetadata, FrameSink, PixelFormat, RowOrder,
    ScreenSource, StreamConfig,
};
use crate::error::Result;

pub fn display(id: u32, width: u32, height: u32) -> DisplayInfo {
    DisplayInfo {
        id,
        name: format!("fake-{id}"),
        width,
        height,
        is_primary: id == 0,
    }
}

/// Top half `top`, bottom half `bottom`, in buffer row order
pub fn split_frame(
    width: u32,
    height: u32,
    top: [u8; 4],
    bottom: [u8; 4],
    row_order: RowOrder,
) -> Frame {
    let image = RgbaImage::from_fn(width, height, |_, y| {
        if y < height / 2 {
            Rgba(top)
        } else {
            Rgba(bottom)
        }
    });

    Frame::new(
        image.into_raw(),
        FrameMetadata {
            sequence: 1,
            display_id: 0,
            width,
            height,
            stride: width * 4,
            format: PixelFormat::Rgba8,
            row_order,
        },
    )
}

pub struct FakeSource {
    pub displays: Vec<DisplayInfo>,
    /// Delivered once after start; `None` never delivers
    pub frame: Option<Frame>,
    pub delay: Duration,
    /// Let go of the sink after start, as a backend whose worker gave up
    pub end_without_frame: bool,
    pub stops: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn new(frame: Option<Frame>) -> Self {
        Self {
            displays: vec![display(0, 64, 48), display(1, 32, 32)],
            frame,
            delay: Duration::from_millis(5),
            end_without_frame: false,
            stops: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl ScreenSource for FakeSource {
    type Stream = FakeStream;

    fn displays(&self) -> Result<Vec<DisplayInfo>> {
        Ok(self.displays.clone())
    }

    fn open_stream(
        &self,
        _display: &DisplayInfo,
        _config: &StreamConfig,
        sink: FrameSink,
    ) -> Result<FakeStream> {
        Ok(FakeStream {
            sink: Some(sink),
            frame: self.frame.clone(),
            delay: self.delay,
            end_without_frame: self.end_without_frame,
            stops: Arc::clone(&self.stops),
            worker: None,
        })
    }
}

pub struct FakeStream {
    sink: Option<FrameSink>,
    frame: Option<Frame>,
    delay: Duration,
    end_without_frame: bool,
    stops: Arc<AtomicUsize>,
    worker: Option<JoinHandle<()>>,
}

impl CaptureStream for FakeStream {
    fn start(&mut self) -> Result<()> {
        let sink = self.sink.take();
        let frame = self.frame.take();
        let delay = self.delay;
        let end_without_frame = self.end_without_frame;

        self.worker = Some(thread::spawn(move || {
            thread::sleep(delay);
            if end_without_frame {
                drop(sink);
                return;
            }
            if let (Some(sink), Some(frame)) = (&sink, frame) {
                sink.deliver(frame);
            }
            // Hold the sink so an undelivered stream times out instead of ending
            while sink.as_ref().is_some_and(|s| !s.is_closed()) {
                thread::sleep(Duration::from_millis(5));
            }
        }));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.worker.take().is_some() {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
