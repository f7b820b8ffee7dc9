use thiserror::Error;

/// Errors raised at the boundary between the editor and the outside world.
///
/// Geometry and numeric settings never end up here: those clamp or fall back
/// to defaults. Only surface allocation, decoding, encoding and configuration
/// parsing can fail.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The surface could not be allocated with the requested dimensions
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The producer of a pending image went away without resolving it
    #[error("Image load was cancelled before it resolved")]
    LoadCancelled,
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
