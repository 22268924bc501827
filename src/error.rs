//! Error types for label persistence and image access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing labels and images.
#[derive(Error, Debug)]
pub enum LabelError {
    /// I/O error during file operations
    #[error("IO error on {path:?}: {source}")]
    Io {
        /// File or directory being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Image could not be opened or decoded
    #[error("Failed to decode image {path:?}: {source}")]
    Image {
        /// Path of the image
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },

    /// Image decoded with a zero-sized axis
    #[error("Image {path:?} has no pixels ({width}x{height})")]
    EmptyImage {
        /// Path of the image
        path: PathBuf,
        /// Decoded width
        width: u32,
        /// Decoded height
        height: u32,
    },

    /// Path has no file stem to derive a label name from
    #[error("Cannot derive a label file name from {path:?}")]
    InvalidImagePath {
        /// Offending path
        path: PathBuf,
    },

    /// Operation needs an active image but none is loaded
    #[error("No active image")]
    NoActiveImage,

    /// Navigation requested with an empty image list
    #[error("No images loaded")]
    NoImages,

    /// Image index past the end of the image list
    #[error("Image index {index} out of range ({len} images)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of images
        len: usize,
    },
}

impl LabelError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap an image decoding error with the path it happened on.
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}
