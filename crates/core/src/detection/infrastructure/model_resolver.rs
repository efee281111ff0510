use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelFetchError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
/// Shared (`Arc`) so one callback can serve several model downloads.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Resolve a model file by name: return it from the user cache if
/// present, otherwise download it there.
pub fn resolve(
    name: &str,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelFetchError> {
    let cache_dir = model_cache_dir()?;
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    log::info!("model {name} not cached, downloading");
    fs::create_dir_all(&cache_dir).map_err(ModelFetchError::CacheDir)?;
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory
/// (e.g. `~/.cache/facemark/models/` on Linux).
pub fn model_cache_dir() -> Result<PathBuf, ModelFetchError> {
    dirs::cache_dir()
        .map(|d| d.join("facemark").join("models"))
        .ok_or(ModelFetchError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelFetchError> {
    let response = reqwest::blocking::get(url).map_err(|e| ModelFetchError::Download {
        url: url.to_string(),
        source: e,
    })?;

    let total = response.content_length().unwrap_or(0);

    // Fetch the full body before touching the filesystem
    let bytes = response.bytes().map_err(|e| ModelFetchError::Download {
        url: url.to_string(),
        source: e,
    })?;

    store(&bytes, dest, total, progress)
}

/// Write via a `.part` temp file renamed into place. The temp file is
/// removed on any failure, so an aborted download never strands it.
fn store(
    bytes: &[u8],
    dest: &Path,
    total: u64,
    progress: Option<ProgressFn>,
) -> Result<(), ModelFetchError> {
    let temp_path = dest.with_extension("part");
    let result = write_chunks(bytes, &temp_path, total, progress).and_then(|_| {
        fs::rename(&temp_path, dest).map_err(|e| ModelFetchError::Write {
            path: dest.to_path_buf(),
            source: e,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_chunks(
    bytes: &[u8],
    temp_path: &Path,
    total: u64,
    progress: Option<ProgressFn>,
) -> Result<(), ModelFetchError> {
    let write_err = |e: std::io::Error| ModelFetchError::Write {
        path: temp_path.to_path_buf(),
        source: e,
    };

    let mut file = fs::File::create(temp_path).map_err(write_err)?;

    let mut downloaded: u64 = 0;
    let chunk_size = 1024 * 1024;
    for chunk in bytes.chunks(chunk_size) {
        file.write_all(chunk).map_err(write_err)?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(write_err)
}
