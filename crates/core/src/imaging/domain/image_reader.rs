use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Malformed(String),
}

/// Decodes transport-level bytes or files into frames.
///
/// On any decode failure the call errors; a partially valid frame is
/// never returned.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Frame, DecodeError>;

    fn decode(&self, bytes: &[u8]) -> Result<Frame, DecodeError>;
}
