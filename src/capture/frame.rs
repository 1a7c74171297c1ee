use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use image::RgbaImage;

/// Captured frame; pixel data is shared, never copied between stages
#[derive(Clone)]
pub struct Frame {
    pub data: Bytes,

    pub meta: Arc<FrameMetadata>,

    /// When the backend handed the frame over
    pub timestamp: Instant,
}

/// Frame metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMetadata {
    pub sequence: u64,
    pub display_id: u32,
    pub width: u32,
    pub height: u32,
    /// Bytes per row, including any padding
    pub stride: u32,
    pub format: PixelFormat,
    pub row_order: RowOrder,
}

/// Pixel layouts the capture backends hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
    Bgra8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
        }
    }
}

/// Which row the buffer starts with.
///
/// Image files are written top row first; some capture buffers come out
/// bottom row first and must be mirrored before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    TopDown,
    BottomUp,
}

impl Frame {
    pub fn new(data: impl Into<Bytes>, meta: FrameMetadata) -> Self {
        Self {
            data: data.into(),
            meta: Arc::new(meta),
            timestamp: Instant::now(),
        }
    }

    /// Wrap a tightly packed, top-down RGBA grab from a display
    pub fn from_rgba_image(image: RgbaImage, display_id: u32, sequence: u64) -> Self {
        let (width, height) = image.dimensions();
        let meta = FrameMetadata {
            sequence,
            display_id,
            width,
            height,
            stride: width * PixelFormat::Rgba8.bytes_per_pixel(),
            format: PixelFormat::Rgba8,
            row_order: RowOrder::TopDown,
        };
        Self::new(image.into_raw(), meta)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("len", &self.data.len())
            .field("meta", &self.meta)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_grab_is_packed_top_down() {
        let image = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
        let frame = Frame::from_rgba_image(image, 7, 1);

        assert_eq!(frame.data.len(), 3 * 2 * 4);
        assert_eq!(frame.meta.stride, 12);
        assert_eq!(frame.meta.display_id, 7);
        assert_eq!(frame.meta.format, PixelFormat::Rgba8);
        assert_eq!(frame.meta.row_order, RowOrder::TopDown);
    }
}
