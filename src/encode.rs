//! PNG/JPEG encoding of decoded HEIC pixels.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::path::Path;

use crate::config::{clamp_quality, OutputFormat, DEFAULT_JPEG_QUALITY};
use crate::decode::{ColorMode, DecodedImage};
use crate::error::EncodeError;
use crate::exif;

/// Writes a decoded image to disk in the requested format.
///
/// `exif` is the raw HEIF Exif item payload to carry over, if any.
pub trait OutputEncoder {
    fn encode(
        &self,
        image: &DecodedImage,
        exif: Option<&[u8]>,
        format: OutputFormat,
        path: &Path,
    ) -> Result<(), EncodeError>;
}

/// [`OutputEncoder`] backed by the `image` crate.
///
/// The file is encoded fully in memory and written in one call, so a
/// failed encode never leaves a partial output behind.
#[derive(Debug, Clone)]
pub struct ImageFileEncoder {
    jpeg_quality: u8,
}

impl ImageFileEncoder {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: clamp_quality(jpeg_quality),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }
}

impl Default for ImageFileEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl OutputEncoder for ImageFileEncoder {
    fn encode(
        &self,
        image: &DecodedImage,
        exif: Option<&[u8]>,
        format: OutputFormat,
        path: &Path,
    ) -> Result<(), EncodeError> {
        let mut bytes = encode_to_vec(image, format, self.jpeg_quality)?;

        if let Some(payload) = exif {
            match exif::tiff_payload(payload) {
                Some(tiff) => bytes = exif::embed(bytes, format, tiff)?,
                None => log::warn!(
                    "Unusable Exif block ({} bytes), writing {} without it",
                    payload.len(),
                    path.display()
                ),
            }
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Encode a decoded image into an in-memory PNG or JPEG.
///
/// JPEG has no alpha channel, so RGBA input is flattened to RGB by
/// dropping alpha.
pub fn encode_to_vec(
    image: &DecodedImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    check_buffer(image)?;

    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            let color = match image.mode {
                ColorMode::Rgb => ExtendedColorType::Rgb8,
                ColorMode::Rgba => ExtendedColorType::Rgba8,
            };
            PngEncoder::new(&mut buf).write_image(&image.pixels, image.width, image.height, color)?;
        }
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, clamp_quality(jpeg_quality));
            match image.mode {
                ColorMode::Rgb => encoder.write_image(
                    &image.pixels,
                    image.width,
                    image.height,
                    ExtendedColorType::Rgb8,
                )?,
                ColorMode::Rgba => {
                    let rgb = strip_alpha(&image.pixels);
                    encoder.write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)?
                }
            }
        }
    }
    Ok(buf)
}

fn check_buffer(image: &DecodedImage) -> Result<(), EncodeError> {
    let expected = image.width as usize * image.height as usize * image.mode.channels();
    if image.pixels.len() != expected || expected == 0 {
        return Err(EncodeError::BufferMismatch {
            width: image.width,
            height: image.height,
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}

fn strip_alpha(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}
