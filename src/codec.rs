//! Image file collaborators: decode a photo into a grayscale sample buffer
//! and encode a processed buffer back out. Format handling is entirely the
//! `image` crate's; the pipeline core only ever sees raw samples.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::GrayImage;

use crate::core::buffer::PixelBuffer;

/// Decode any supported image file as 8-bit grayscale.
pub fn decode_gray(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_luma8();
    let (width, height) = img.dimensions();
    Ok(PixelBuffer::new(width, height, 255, img.into_raw()))
}

/// Encode a grayscale buffer to `path`; the format follows the extension.
pub fn encode_gray(image: &PixelBuffer, path: &Path) -> Result<()> {
    let img = GrayImage::from_raw(image.width(), image.height(), image.samples().to_vec())
        .ok_or_else(|| anyhow!("pixel buffer shape mismatch"))?;
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))
}
