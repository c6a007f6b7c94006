use std::path::PathBuf;

use collage_core::CollageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid annotation {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Annotation has no polygon points in its first shape")]
    MissingShape,

    #[error("No {kind} found in {dir}")]
    EmptyDirectory { kind: &'static str, dir: PathBuf },

    #[error(transparent)]
    Collage(#[from] CollageError),
}

impl IoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IoError>;
