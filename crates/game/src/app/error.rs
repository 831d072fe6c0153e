use std::path::PathBuf;

use realm_engine::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ViewerError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path} at {at}: {source}")]
    Decode {
        path: PathBuf,
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid room {path}: {reason}")]
    InvalidRoom { path: PathBuf, reason: String },
    #[error("frame of {width}x{height} does not fit an image buffer")]
    FrameSize { width: u32, height: u32 },
    #[error("failed to write snapshot {path}: {source}")]
    EncodePng {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    App(#[from] AppError),
}
