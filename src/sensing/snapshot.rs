use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::devices::Frame;

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(image)
        .context("failed to encode frame as JPEG")?;
    Ok(buffer)
}

pub fn to_data_url(jpeg: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg))
}

/// Still image of `frame` in the form the classifier accepts.
pub fn snapshot_data_url(frame: &Frame, quality: u8) -> Result<String> {
    let jpeg = encode_jpeg(&frame.image, quality)?;
    Ok(to_data_url(&jpeg))
}

#[cfg(test)]
mod tests {
    use image::{ImageFormat, Rgb};

    use super::*;

    #[test]
    fn produces_decodable_jpeg_data_url() {
        let image = RgbImage::from_pixel(32, 24, Rgb([200, 120, 40]));
        let frame = Frame { sequence: 1, image };

        let url = snapshot_data_url(&frame, 85).unwrap();
        let encoded = url.strip_prefix("data:image/jpeg;base64,").unwrap();
        let bytes = STANDARD.decode(encoded).unwrap();

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }
}
