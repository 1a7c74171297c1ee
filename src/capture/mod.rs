pub mod frame;
pub mod screen;
pub mod sink;
pub mod source;

#[cfg(test)]
pub(crate) mod fake;

pub use frame::{Frame, FrameMetadata, PixelFormat, RowOrder};
pub use screen::XcapSource;
pub use sink::{frame_channel, Delivery, FrameReceiver, FrameSink};
pub use source::{CaptureStream, DisplayInfo, ScreenSource, StreamConfig};
