//! Error types for per-file conversion.
//!
//! Each stage has its own error so callers and tests can tell a corrupt
//! input from a missing Exif block or a failed write. The batch driver
//! flattens them all into one skip record.

use std::path::PathBuf;
use thiserror::Error;

/// Decoding a HEIC container failed.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// libheif rejected the file (unreadable, truncated, unsupported variant).
    #[cfg(feature = "heif")]
    #[error("{0}")]
    Heif(#[from] libheif_rs::HeifError),

    /// The decoded image did not expose an interleaved pixel plane.
    #[error("decoded image has no interleaved pixel plane")]
    MissingPlane,

    /// libheif only accepts UTF-8 paths.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for decoders that only have a message to offer.
    #[error("{0}")]
    Other(String),
}

/// Encoding or writing an output image failed.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Pixel buffer length does not match the declared mode and dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// The encoded output could not be re-parsed to attach Exif.
    #[error("failed to embed Exif: {0}")]
    Exif(#[from] img_parts::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a single file was not converted.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("no Exif metadata found in {}", .path.display())]
    MissingExif { path: PathBuf },

    #[error("{source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

impl ConvertError {
    /// The file the error refers to: the input for decode and Exif
    /// failures, the output for encode failures.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Decode { path, .. } | Self::MissingExif { path } | Self::Encode { path, .. } => {
                path
            }
        }
    }
}
