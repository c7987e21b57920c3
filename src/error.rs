//! Error types for poster rendering and output

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for poster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, rendering or saving a poster
#[derive(Error, Debug)]
pub enum Error {
    /// Out-of-range or contradictory configuration
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A file could not be read or written
    #[error("I/O failure on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PNG encoder rejected the image
    #[error("PNG encoding failed: {0}")]
    Encoding(String),

    /// TrueType font data could not be used
    #[cfg(feature = "font")]
    #[error("Font error: {0}")]
    Font(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidParameter(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoFailure {
            path: path.into(),
            source,
        }
    }
}
