//! Image validation and normalization
//!
//! Every downloaded payload passes through here before hashing and
//! classification. Payloads that are too small to be real photographs, or
//! whose decoded dimensions are icon-sized, are rejected outright. JPEG and
//! PNG payloads within the size bound pass through byte-for-byte, which
//! keeps the content fingerprint stable for already-canonical images;
//! everything else is converted to a bounded-size RGB JPEG.

use crate::config::ImageConfig;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

/// Why a payload was rejected as "not an analyzable image"
///
/// Rejections are expected skips, not failures: the pipeline logs them at
/// warning level, counts the URL as processed, and moves on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageRejection {
    #[error("Payload of {0} bytes is below the minimum image size")]
    TooSmall(usize),

    #[error("Decoded dimensions {0}x{1} are icon-sized")]
    TinyDimensions(u32, u32),

    #[error("Payload could not be decoded as an image")]
    Undecodable,
}

/// Normalizes raw image bytes into the canonical analyzable form
///
/// 1. Payloads under `min-bytes`, or whose smaller decoded side is at or
///    below `min-dimension` pixels, are rejected.
/// 2. JPEG/PNG payloads within `max-passthrough-bytes` are returned
///    unchanged.
/// 3. Anything else is converted to 3-channel RGB, downscaled (preserving
///    aspect ratio) so the longer side fits `max-edge`, and re-encoded as
///    JPEG at the configured quality.
pub fn normalize(bytes: &[u8], config: &ImageConfig) -> Result<Vec<u8>, ImageRejection> {
    if bytes.len() < config.min_bytes {
        return Err(ImageRejection::TooSmall(bytes.len()));
    }

    let format = image::guess_format(bytes).map_err(|_| ImageRejection::Undecodable)?;
    let decoded = image::load_from_memory(bytes).map_err(|_| ImageRejection::Undecodable)?;

    let (width, height) = decoded.dimensions();
    if width.min(height) <= config.min_dimension {
        return Err(ImageRejection::TinyDimensions(width, height));
    }

    // Already-canonical payloads pass through untouched
    if matches!(format, ImageFormat::Jpeg | ImageFormat::Png)
        && bytes.len() <= config.max_passthrough_bytes
    {
        return Ok(bytes.to_vec());
    }

    let bounded = if width.max(height) > config.max_edge {
        decoded.resize(config.max_edge, config.max_edge, FilterType::Lanczos3)
    } else {
        decoded
    };

    let rgb = bounded.to_rgb8();
    let mut output = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut output, config.jpeg_quality);
    encoder
        .encode_image(&rgb)
        .map_err(|_| ImageRejection::Undecodable)?;

    Ok(output.into_inner())
}
