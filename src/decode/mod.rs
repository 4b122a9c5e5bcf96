//! HEIC decoding.
//!
//! [`HeicDecoder`] is the seam between the conversion pipeline and the
//! native decoder. The shipped implementation is [`LibHeifDecoder`] (behind
//! the `heif` feature); tests plug in their own.

#[cfg(feature = "heif")]
mod libheif;

#[cfg(feature = "heif")]
pub use libheif::LibHeifDecoder;

use std::path::Path;

use crate::error::DecodeError;

/// Metadata block kind that gates conversion.
pub const EXIF_KIND: &str = "Exif";

/// Pixel layout of a decoded buffer. Always 8 bits per channel, interleaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// One metadata block from the container, in container order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    /// Block kind as reported by the container, e.g. `Exif` or `mime`.
    pub kind: String,
    pub payload: Vec<u8>,
}

impl MetadataEntry {
    pub fn new(kind: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    pub fn is_exif(&self) -> bool {
        self.kind == EXIF_KIND
    }
}

/// A fully decoded HEIC primary image.
///
/// `pixels` is tightly packed: `width * height * mode.channels()` bytes,
/// no row padding.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub mode: ColorMode,
    pub width: u32,
    pub height: u32,
    pub metadata: Vec<MetadataEntry>,
}

impl DecodedImage {
    /// First Exif block in container order.
    pub fn first_exif(&self) -> Option<&MetadataEntry> {
        self.metadata.iter().find(|entry| entry.is_exif())
    }

    /// Number of Exif blocks in the container.
    pub fn exif_count(&self) -> usize {
        self.metadata.iter().filter(|entry| entry.is_exif()).count()
    }
}

/// Decodes a HEIC file into pixels plus metadata.
pub trait HeicDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError>;
}

/// The decoder this build was compiled with, if any.
///
/// Returns `None` when the crate is built without the `heif` feature.
pub fn default_decoder() -> Option<Box<dyn HeicDecoder>> {
    #[cfg(feature = "heif")]
    {
        Some(Box::new(LibHeifDecoder::new()))
    }
    #[cfg(not(feature = "heif"))]
    {
        None
    }
}

/// Copy `height` rows of `row_bytes` out of a buffer whose rows are `stride`
/// bytes apart, dropping the padding.
pub(crate) fn pack_rows(
    data: &[u8],
    stride: usize,
    row_bytes: usize,
    height: usize,
) -> Result<Vec<u8>, DecodeError> {
    if stride == row_bytes {
        let len = row_bytes * height;
        return data
            .get(..len)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| short_plane(len, data.len()));
    }
    if stride < row_bytes {
        return Err(DecodeError::Other(format!(
            "plane stride {stride} is smaller than row width {row_bytes}"
        )));
    }

    let mut packed = Vec::with_capacity(row_bytes * height);
    for row in 0..height {
        let start = row * stride;
        let line = data
            .get(start..start + row_bytes)
            .ok_or_else(|| short_plane(start + row_bytes, data.len()))?;
        packed.extend_from_slice(line);
    }
    Ok(packed)
}

fn short_plane(needed: usize, actual: usize) -> DecodeError {
    DecodeError::Other(format!(
        "pixel plane holds {actual} bytes, needed at least {needed}"
    ))
}
