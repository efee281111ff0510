use std::path::Path;

use crate::imaging::domain::image_writer::{EncodeError, ImageWriter};
use crate::shared::frame::Frame;

/// Image encoding via the `image` crate; format chosen by extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, frame: &Frame, path: &Path) -> Result<(), EncodeError> {
        let img =
            image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
                .ok_or_else(|| {
                    EncodeError::Encode("frame buffer does not match its dimensions".into())
                })?;
        img.save(path).map_err(|e| match e {
            image::ImageError::IoError(source) => EncodeError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => EncodeError::Encode(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::domain::image_reader::ImageReader;
    use crate::imaging::infrastructure::image_file_reader::ImageFileReader;

    #[test]
    fn test_write_then_read_back() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.png");

        let frame = Frame::new(vec![200u8; 6 * 4 * 3], 6, 4, 3);
        ImageFileWriter::new().write(&frame, &path).unwrap();

        let read = ImageFileReader::new().read(&path).unwrap();
        assert_eq!((read.width(), read.height()), (6, 4));
        assert_eq!(read.data(), frame.data());
    }

    #[test]
    fn test_write_to_invalid_directory_fails() {
        let frame = Frame::new(vec![0u8; 3], 1, 1, 3);
        let result = ImageFileWriter::new().write(&frame, Path::new("/nonexistent/dir/out.png"));
        assert!(result.is_err());
    }
}
