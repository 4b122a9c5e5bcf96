//! Exif passthrough from HEIC metadata into PNG/JPEG output.
//!
//! A HEIF `Exif` item starts with a 4-byte big-endian offset to the TIFF
//! header (usually 6, skipping an `Exif\0\0` marker). PNG `eXIf` chunks and
//! JPEG APP1 segments written through img-parts both want the bare TIFF
//! data, so the prefix is stripped here.

use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::{Bytes, ImageEXIF};

use crate::config::OutputFormat;
use crate::error::EncodeError;

const TIFF_LE: &[u8] = b"II*\0";
const TIFF_BE: &[u8] = b"MM\0*";

/// Extract the TIFF data from a HEIF Exif item payload.
///
/// Returns `None` when the offset points past the payload or the data there
/// does not start with a TIFF byte-order mark.
pub fn tiff_payload(payload: &[u8]) -> Option<&[u8]> {
    let offset: [u8; 4] = payload.get(..4)?.try_into().ok()?;
    let start = 4usize.checked_add(u32::from_be_bytes(offset) as usize)?;
    let tiff = payload.get(start..)?;
    if tiff.starts_with(TIFF_LE) || tiff.starts_with(TIFF_BE) {
        Some(tiff)
    } else {
        None
    }
}

/// Attach TIFF-formatted Exif data to an encoded PNG or JPEG.
pub fn embed(encoded: Vec<u8>, format: OutputFormat, tiff: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let exif = Some(Bytes::copy_from_slice(tiff));
    let bytes = match format {
        OutputFormat::Png => {
            let mut png = Png::from_bytes(Bytes::from(encoded))?;
            png.set_exif(exif);
            png.encoder().bytes()
        }
        OutputFormat::Jpeg => {
            let mut jpeg = Jpeg::from_bytes(Bytes::from(encoded))?;
            jpeg.set_exif(exif);
            jpeg.encoder().bytes()
        }
    };
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, RgbImage};

    const TIFF: &[u8] = b"MM\0*\0\0\0\x08\0\0";

    fn heif_exif_item(tiff: &[u8]) -> Vec<u8> {
        let mut item = vec![0, 0, 0, 6];
        item.extend_from_slice(b"Exif\0\0");
        item.extend_from_slice(tiff);
        item
    }

    fn encoded(format: OutputFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
        let mut buf = Vec::new();
        match format {
            OutputFormat::Png => image::codecs::png::PngEncoder::new(&mut buf)
                .write_image(img.as_raw(), 2, 2, image::ExtendedColorType::Rgb8)
                .unwrap(),
            OutputFormat::Jpeg => image::codecs::jpeg::JpegEncoder::new(&mut buf)
                .write_image(img.as_raw(), 2, 2, image::ExtendedColorType::Rgb8)
                .unwrap(),
        }
        buf
    }

    #[test]
    fn tiff_payload_skips_exif_marker() {
        let item = heif_exif_item(TIFF);
        assert_eq!(tiff_payload(&item), Some(TIFF));
    }

    #[test]
    fn tiff_payload_zero_offset() {
        let mut item = vec![0, 0, 0, 0];
        item.extend_from_slice(b"II*\0\x08\0\0\0");
        assert_eq!(tiff_payload(&item), Some(&item[4..]));
    }

    #[test]
    fn tiff_payload_rejects_bad_input() {
        assert_eq!(tiff_payload(&[]), None);
        assert_eq!(tiff_payload(&[0, 0, 0]), None);
        // offset past the end
        assert_eq!(tiff_payload(&[0, 0, 0, 40, b'M', b'M']), None);
        // no byte-order mark
        assert_eq!(tiff_payload(&[0, 0, 0, 0, 1, 2, 3, 4]), None);
        assert_eq!(tiff_payload(&[0xFF, 0xFF, 0xFF, 0xFF]), None);
    }

    #[test]
    fn embed_into_png() {
        let out = embed(encoded(OutputFormat::Png), OutputFormat::Png, TIFF).unwrap();
        let png = Png::from_bytes(Bytes::from(out.clone())).unwrap();
        assert_eq!(&png.exif().unwrap()[..], TIFF);
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
    }

    #[test]
    fn embed_into_jpeg() {
        let out = embed(encoded(OutputFormat::Jpeg), OutputFormat::Jpeg, TIFF).unwrap();
        let jpeg = Jpeg::from_bytes(Bytes::from(out.clone())).unwrap();
        assert_eq!(&jpeg.exif().unwrap()[..], TIFF);
        assert!(image::load_from_memory(&out).is_ok());
    }

    #[test]
    fn embed_rejects_mismatched_container() {
        let png = encoded(OutputFormat::Png);
        assert!(matches!(
            embed(png, OutputFormat::Jpeg, TIFF),
            Err(EncodeError::Exif(_))
        ));
    }
}
