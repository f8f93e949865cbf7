//! Error types for the virtual try-on library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding failed
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark set is missing a required index or holds non-finite values
    #[error("Malformed landmarks: {0}")]
    MalformedLandmarks(String),

    /// The landmark detection engine could not be initialised
    #[error("Detection unavailable: {0}")]
    DetectionUnavailable(String),

    /// The video stream could not be acquired (device missing, permission denied)
    #[error("Stream acquisition failed: {0}")]
    StreamAcquisition(String),

    /// Operation not allowed in the current session state
    #[error("Session state error: {0}")]
    SessionState(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
