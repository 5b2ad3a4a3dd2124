//! Image inspection and transcoding.
//!
//! Gemini accepts inline images with a declared MIME type; the proxy always
//! declares JPEG, so anything else is re-encoded before it is sent.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{Error, Result};

/// JPEG quality used when transcoding (0-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Image metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Identify the image format from its leading bytes.
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    image::guess_format(data).map_err(|_| Error::UnknownFormat)
}

/// Get format and dimensions without decoding pixel data.
pub fn get_image_metadata(data: &[u8]) -> Result<ImageMetadata> {
    let format = detect_format(data)?;
    let (width, height) = ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .map_err(|e| Error::image("failed to read image dimensions", e))?;

    Ok(ImageMetadata {
        width,
        height,
        format,
    })
}

/// MIME type for a detected format.
pub fn media_type(format: ImageFormat) -> &'static str {
    format.to_mime_type()
}

/// Preferred file extension for a detected format.
pub fn extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("img")
}

/// Return `data` as JPEG bytes, re-encoding if it is in another format.
///
/// Alpha is dropped; JPEG has no transparency.
pub fn to_jpeg(data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let format = detect_format(data)?;
    if format == ImageFormat::Jpeg {
        return Ok(data.to_vec());
    }

    let img = ImageReader::with_format(Cursor::new(data), format)
        .decode()
        .map_err(|e| Error::image("failed to decode image", e))?;
    encode_jpeg_with_quality(&DynamicImage::ImageRgb8(img.to_rgb8()), quality)
}

fn encode_jpeg_with_quality(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut output = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
    img.write_with_encoder(encoder)
        .map_err(|e| Error::image("failed to encode as JPEG", e))?;
    Ok(output.into_inner())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod tests {
    use {super::*, image::RgbaImage};

    /// A `width`x`height` semi-transparent PNG.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 128]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn metadata_reads_dimensions() {
        let meta = get_image_metadata(&png_bytes(3, 2)).unwrap();
        assert_eq!(meta.width, 3);
        assert_eq!(meta.height, 2);
        assert_eq!(meta.format, ImageFormat::Png);
        assert_eq!(media_type(meta.format), "image/png");
        assert_eq!(extension(meta.format), "png");
    }

    #[test]
    fn unknown_bytes_are_rejected() {
        assert!(matches!(
            detect_format(b"definitely not an image"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn png_is_transcoded_to_jpeg() {
        let jpeg = to_jpeg(&png_bytes(4, 4), DEFAULT_JPEG_QUALITY).unwrap();
        let meta = get_image_metadata(&jpeg).unwrap();
        assert_eq!(meta.format, ImageFormat::Jpeg);
        assert_eq!((meta.width, meta.height), (4, 4));
    }

    #[test]
    fn jpeg_passes_through_untouched() {
        let jpeg = to_jpeg(&png_bytes(2, 2), DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(to_jpeg(&jpeg, 10).unwrap(), jpeg);
    }
}
