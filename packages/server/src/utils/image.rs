use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// Formats accepted into the public bucket.
const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Upload limits applied before an image is stored.
#[derive(Debug, Clone, Copy)]
pub struct ImageLimits {
    pub max_bytes: u64,
    pub max_dimension: u32,
}

/// Facts about an accepted image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Canonical file extension used for the object key.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }
}

#[derive(Debug, PartialEq)]
pub enum ImageError {
    Empty,
    TooLarge { size: u64, limit: u64 },
    /// Bytes are not one of the accepted image formats.
    Unsupported,
    /// Header could not be decoded.
    Corrupt(String),
    DimensionsTooLarge { width: u32, height: u32, limit: u32 },
}

impl ImageError {
    pub fn message(&self) -> String {
        match self {
            Self::Empty => "Image file is empty".into(),
            Self::TooLarge { limit, .. } => {
                format!("Image exceeds maximum size of {limit} bytes")
            }
            Self::Unsupported => "Only PNG, JPEG, GIF and WebP images are accepted".into(),
            Self::Corrupt(detail) => format!("Image could not be decoded: {detail}"),
            Self::DimensionsTooLarge {
                width,
                height,
                limit,
            } => format!("Image is {width}x{height}px; each side must be at most {limit}px"),
        }
    }
}

/// Sniff the format from the bytes and check size and dimensions.
///
/// Only the header is decoded; pixel data is never loaded.
pub fn inspect(data: &[u8], limits: ImageLimits) -> Result<ImageInfo, ImageError> {
    if data.is_empty() {
        return Err(ImageError::Empty);
    }
    let size = data.len() as u64;
    if size > limits.max_bytes {
        return Err(ImageError::TooLarge {
            size,
            limit: limits.max_bytes,
        });
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::Corrupt(e.to_string()))?;
    let format = reader
        .format()
        .filter(|f| ACCEPTED_FORMATS.contains(f))
        .ok_or(ImageError::Unsupported)?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ImageError::Corrupt(e.to_string()))?;

    if width > limits.max_dimension || height > limits.max_dimension {
        return Err(ImageError::DimensionsTooLarge {
            width,
            height,
            limit: limits.max_dimension,
        });
    }

    Ok(ImageInfo {
        format,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: ImageLimits = ImageLimits {
        max_bytes: 1024 * 1024,
        max_dimension: 64,
    };

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn png_dimensions_are_read() {
        let info = inspect(&encode(32, 16, ImageFormat::Png), LIMITS).unwrap();
        assert_eq!(info.format, ImageFormat::Png);
        assert_eq!((info.width, info.height), (32, 16));
        assert_eq!(info.content_type(), "image/png");
        assert_eq!(info.extension(), "png");
    }

    #[test]
    fn jpeg_is_accepted() {
        let info = inspect(&encode(8, 8, ImageFormat::Jpeg), LIMITS).unwrap();
        assert_eq!(info.content_type(), "image/jpeg");
    }

    #[test]
    fn oversize_dimensions_are_rejected() {
        let err = inspect(&encode(65, 10, ImageFormat::Png), LIMITS).unwrap_err();
        assert_eq!(
            err,
            ImageError::DimensionsTooLarge {
                width: 65,
                height: 10,
                limit: 64
            }
        );
    }

    #[test]
    fn oversize_file_is_rejected_before_decoding() {
        let limits = ImageLimits {
            max_bytes: 10,
            max_dimension: 64,
        };
        let err = inspect(&encode(8, 8, ImageFormat::Png), limits).unwrap_err();
        assert!(matches!(err, ImageError::TooLarge { limit: 10, .. }));
    }

    #[test]
    fn non_images_are_rejected() {
        assert_eq!(
            inspect(b"%PDF-1.7 not an image", LIMITS).unwrap_err(),
            ImageError::Unsupported
        );
        assert_eq!(inspect(b"", LIMITS).unwrap_err(), ImageError::Empty);
    }

    #[test]
    fn truncated_png_is_corrupt() {
        let png = encode(8, 8, ImageFormat::Png);
        let err = inspect(&png[..12], LIMITS).unwrap_err();
        assert!(matches!(err, ImageError::Corrupt(_)));
    }
}
