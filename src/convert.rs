use serde::Serialize;
use std::path::PathBuf;

use crate::config::OutputFormat;
use crate::decode::HeicDecoder;
use crate::encode::OutputEncoder;
use crate::error::ConvertError;

/// One file to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub target_format: OutputFormat,
}

/// A successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Exif blocks seen in the source. Only the first one is used.
    pub exif_entries: usize,
}

/// Decodes HEIC inputs and re-encodes those that carry Exif metadata.
///
/// Exif presence gates conversion: a file that decodes fine but has no
/// `Exif` block is rejected with [`ConvertError::MissingExif`].
pub struct Converter<'a> {
    decoder: &'a dyn HeicDecoder,
    encoder: &'a dyn OutputEncoder,
    keep_exif: bool,
}

impl<'a> Converter<'a> {
    pub fn new(decoder: &'a dyn HeicDecoder, encoder: &'a dyn OutputEncoder) -> Self {
        Self {
            decoder,
            encoder,
            keep_exif: false,
        }
    }

    /// Copy the first Exif block into the output file.
    pub fn keep_exif(mut self, keep: bool) -> Self {
        self.keep_exif = keep;
        self
    }

    /// Convert a single file. The output is written at most once, no matter
    /// how many Exif blocks the input carries.
    pub fn convert(&self, request: &ConversionRequest) -> Result<Conversion, ConvertError> {
        let input = &request.input_path;

        let image = self
            .decoder
            .decode(input)
            .map_err(|source| ConvertError::Decode {
                path: input.clone(),
                source,
            })?;

        let exif = image.first_exif().ok_or_else(|| ConvertError::MissingExif {
            path: input.clone(),
        })?;
        let exif_entries = image.exif_count();
        if exif_entries > 1 {
            log::debug!(
                "{} has {exif_entries} Exif blocks, using the first",
                input.display()
            );
        }

        let passthrough = self.keep_exif.then_some(exif.payload.as_slice());
        self.encoder
            .encode(&image, passthrough, request.target_format, &request.output_path)
            .map_err(|source| ConvertError::Encode {
                path: request.output_path.clone(),
                source,
            })?;

        Ok(Conversion {
            input_path: input.clone(),
            output_path: request.output_path.clone(),
            width: image.width,
            height: image.height,
            exif_entries,
        })
    }
}
