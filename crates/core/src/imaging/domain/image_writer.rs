use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to encode image: {0}")]
    Encode(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Encodes annotated frames to image files.
pub trait ImageWriter: Send {
    fn write(&self, frame: &Frame, path: &Path) -> Result<(), EncodeError>;
}
