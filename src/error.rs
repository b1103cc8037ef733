//! Error handling for the rtpview receive/overlay/display chain.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for the viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    // Assembly errors, all fatal: the chain cannot function with a
    // missing element or an unlinked pair.
    #[error("GStreamer initialisation failed: {0}")]
    Init(#[from] gstreamer::glib::Error),

    #[error("GStreamer element creation failed: {0}")]
    ElementCreationFailed(String),

    #[error("Failed to link pipeline elements: {0}")]
    LinkFailed(String),

    #[error("GStreamer pipeline error: {0}")]
    Pipeline(String),

    #[error("Pipeline state change failed: {0}")]
    StateChange(String),

    // Runtime errors surfaced on the bus
    #[error("Stream error: {message} ({debug})")]
    Stream { message: String, debug: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<gstreamer::StateChangeError> for ViewerError {
    fn from(err: gstreamer::StateChangeError) -> Self {
        ViewerError::StateChange(err.to_string())
    }
}

/// Result type alias for convenience
pub type ViewerResult<T> = std::result::Result<T, ViewerError>;
