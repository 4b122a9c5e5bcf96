use libheif_rs::{ColorSpace, HeifContext, ImageHandle, ItemId, LibHeif, RgbChroma};
use std::path::Path;

use super::{pack_rows, ColorMode, DecodedImage, HeicDecoder, MetadataEntry, EXIF_KIND};
use crate::error::DecodeError;

/// Metadata block kinds pulled out of the container. `mime` carries XMP.
const METADATA_KINDS: [&[u8; 4]; 2] = [b"Exif", b"mime"];

/// [`HeicDecoder`] backed by the system libheif.
///
/// Decodes the primary image to 8-bit interleaved RGB, or RGBA when the
/// image carries an alpha channel.
pub struct LibHeifDecoder {
    lib: LibHeif,
}

impl LibHeifDecoder {
    pub fn new() -> Self {
        Self { lib: LibHeif::new() }
    }
}

impl Default for LibHeifDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeicDecoder for LibHeifDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| DecodeError::NonUtf8Path(path.to_path_buf()))?;

        let ctx = HeifContext::read_from_file(path_str)?;
        let handle = ctx.primary_image_handle()?;

        let (mode, chroma) = if handle.has_alpha_channel() {
            (ColorMode::Rgba, RgbChroma::Rgba)
        } else {
            (ColorMode::Rgb, RgbChroma::Rgb)
        };

        let image = self.lib.decode(&handle, ColorSpace::Rgb(chroma), None)?;
        let planes = image.planes();
        let plane = planes.interleaved.ok_or(DecodeError::MissingPlane)?;

        let width = plane.width;
        let height = plane.height;
        let row_bytes = width as usize * mode.channels();
        let pixels = pack_rows(plane.data, plane.stride, row_bytes, height as usize)?;

        let metadata = read_metadata(&handle)?;
        log::debug!(
            "Decoded {}: {width}x{height} {mode:?}, {} metadata block(s)",
            path.display(),
            metadata.len()
        );

        Ok(DecodedImage {
            pixels,
            mode,
            width,
            height,
            metadata,
        })
    }
}

/// Collect the Exif and XMP blocks attached to the primary image, in item order.
fn read_metadata(handle: &ImageHandle) -> Result<Vec<MetadataEntry>, DecodeError> {
    let mut ids: Vec<(ItemId, &str)> = Vec::new();
    for filter in METADATA_KINDS {
        let count = handle.number_of_metadata_blocks(filter);
        if count <= 0 {
            continue;
        }
        let mut found: Vec<ItemId> = vec![0; count as usize];
        let written = handle.metadata_block_ids(&mut found, filter);
        found.truncate(written);
        let kind = std::str::from_utf8(filter).unwrap_or(EXIF_KIND);
        ids.extend(found.into_iter().map(|id| (id, kind)));
    }
    ids.sort_by_key(|(id, _)| *id);

    let mut entries = Vec::with_capacity(ids.len());
    for (id, fallback_kind) in ids {
        let kind = handle
            .metadata_type(id)
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback_kind)
            .to_string();
        let payload = handle.metadata(id)?;
        entries.push(MetadataEntry::new(kind, payload));
    }
    Ok(entries)
}
