use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::GrayImage;

use crate::error::Result;

/// Encode a luma bitmap as baseline JPEG at `quality` (1..=100)
pub fn encode_jpeg(image: &GrayImage, quality: u8) -> Result<Bytes> {
    let mut buf = Vec::with_capacity(image.as_raw().len() / 4);
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(image)?;
    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Luma};

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]))
    }

    #[test]
    fn output_is_decodable_jpeg() {
        let bytes = encode_jpeg(&gradient(40, 30), 70).unwrap();

        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn lower_quality_is_smaller() {
        let image = gradient(128, 128);
        let low = encode_jpeg(&image, 10).unwrap();
        let high = encode_jpeg(&image, 95).unwrap();
        assert!(low.len() < high.len(), "{} >= {}", low.len(), high.len());
    }
}
