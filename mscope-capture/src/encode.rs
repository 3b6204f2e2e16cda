//! Frame encoding: JPEG, data URL, bare base64 payload

use base64::{engine::general_purpose, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageResult, RgbImage};

pub const JPEG_QUALITY: u8 = 80;
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

pub fn encode_jpeg(frame: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(frame)?;
    Ok(buf)
}

/// `data:image/jpeg;base64,...`
pub fn to_data_url(jpeg: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        JPEG_MIME_TYPE,
        general_purpose::STANDARD.encode(jpeg)
    )
}

/// Everything after the first comma; input without a comma is returned whole
pub fn strip_data_url_prefix(data_url: &str) -> &str {
    data_url
        .split_once(',')
        .map(|(_, payload)| payload)
        .unwrap_or(data_url)
}

/// Frame → JPEG (quality 80) → bare base64, as submitted for analysis
pub fn encode_frame(frame: &RgbImage) -> ImageResult<String> {
    let jpeg = encode_jpeg(frame, JPEG_QUALITY)?;
    Ok(strip_data_url_prefix(&to_data_url(&jpeg)).to_string())
}

pub fn decode_base64(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(payload)
}
