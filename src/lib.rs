//! rtpview
//!
//! Receives a JPEG-over-RTP video stream on a UDP port, strokes a vertical
//! marker line onto every decoded frame and shows the result in a window.
//! The transport/decode/display chain is GStreamer; the drawing surface
//! handed to the overlay callback is Cairo.

pub mod config;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod runner;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, DisplayConfig, NetworkConfig, OverlayConfig};
pub use error::{ViewerError, ViewerResult};
pub use overlay::OverlayState;
pub use pipeline::ViewerPipeline;
pub use runner::{BusEvent, LoopControl, Termination};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
