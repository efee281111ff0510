use std::path::Path;

use crate::imaging::domain::image_reader::{DecodeError, ImageReader};
use crate::shared::frame::Frame;

/// Image decoding via the `image` crate. Everything is converted to
/// 8-bit RGB at the boundary; the rest of the pipeline only sees that.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

fn to_frame(img: image::DynamicImage) -> Frame {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Frame::new(rgb.into_raw(), width, height, 3)
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, DecodeError> {
        let img = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(source) => DecodeError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => DecodeError::Malformed(other.to_string()),
        })?;
        Ok(to_frame(img))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Frame, DecodeError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;
        Ok(to_frame(img))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_valid_png() {
        let frame = ImageFileReader::new().decode(&png_bytes(4, 3)).unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.channels(), 3);
        assert_eq!(&frame.data()[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let err = ImageFileReader::new().decode(b"not an image").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = ImageFileReader::new()
            .read(Path::new("/nonexistent/definitely_missing.png"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }

    #[test]
    fn test_read_roundtrip_through_tempfile() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("img.png");
        std::fs::write(&path, png_bytes(8, 8)).unwrap();
        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 8));
    }
}
