//! Template decoding and PNG encoding

use std::io::Cursor;

use bytes::Bytes;
use image::{ImageFormat, RgbaImage};

use crate::error::{RenderError, Result};

/// Decode a template image (PNG or JPEG) to RGBA
pub fn decode_template(data: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(data).map_err(RenderError::Decode)?;
    Ok(image.to_rgba8())
}

/// Encode a rendered banner as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Bytes> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(RenderError::Encode)?;
    Ok(Bytes::from(buffer.into_inner()))
}
