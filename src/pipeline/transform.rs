//! Frame → monochrome, top-row-first bitmap

use image::{imageops, GrayImage, RgbaImage};

use crate::capture::{Frame, PixelFormat, RowOrder};
use crate::error::{Result, SnapshotError};

/// Unpack the frame into a tightly packed RGBA image, honoring stride and
/// channel order. Rows stay in buffer order.
pub fn to_rgba(frame: &Frame) -> Result<RgbaImage> {
    let meta = &frame.meta;
    let bpp = meta.format.bytes_per_pixel() as usize;
    let (width, height) = (meta.width as usize, meta.height as usize);
    let stride = meta.stride as usize;
    let row_len = width * bpp;

    if width == 0 || height == 0 {
        return Err(SnapshotError::InvalidFrame(format!(
            "empty frame {}x{}",
            meta.width, meta.height
        )));
    }
    if stride < row_len {
        return Err(SnapshotError::InvalidFrame(format!(
            "stride {} shorter than a {}-pixel row",
            stride, width
        )));
    }
    let needed = stride * (height - 1) + row_len;
    if frame.data.len() < needed {
        return Err(SnapshotError::InvalidFrame(format!(
            "buffer holds {} bytes, {}x{} needs {}",
            frame.data.len(),
            meta.width,
            meta.height,
            needed
        )));
    }

    let mut packed = Vec::with_capacity(row_len * height);
    for row in frame.data.chunks(stride).take(height) {
        let row = &row[..row_len];
        match meta.format {
            PixelFormat::Rgba8 => packed.extend_from_slice(row),
            PixelFormat::Bgra8 => {
                for px in row.chunks_exact(4) {
                    packed.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
        }
    }

    RgbaImage::from_raw(meta.width, meta.height, packed)
        .ok_or_else(|| SnapshotError::InvalidFrame("pixel buffer size mismatch".into()))
}

/// Grayscale, then mirror vertically when the buffer was bottom-up
pub fn to_monochrome(frame: &Frame) -> Result<GrayImage> {
    let rgba = to_rgba(frame)?;
    let mut gray = imageops::grayscale(&rgba);

    if frame.meta.row_order == RowOrder::BottomUp {
        imageops::flip_vertical_in_place(&mut gray);
    }

    Ok(gray)
}
