//! Screen capture domain: public API.
//!
//! Two halves that never share state directly:
//!
//! - **bridge**: the trusted side. Owns the consent dialog and the screen
//!   enumerator, and answers the UI surface over a request channel.
//! - **pipeline** / **surface**: the untrusted side. Asks the bridge for
//!   consent and a source id, then grabs, encodes and saves one frame.
//! - **download**: where finished screenshots land on disk.
//! - **screenshot** (desktop only): xcap-backed enumerator and media devices.

pub mod bridge;
pub mod download;
pub mod pipeline;
#[cfg(feature = "desktop")]
pub mod screenshot;
pub mod surface;

pub use bridge::{
    bridge_channel, BridgeClient, BridgeError, BridgeHost, ConsentGate, ConsentPrompt,
    PrivilegedBridge, SourceEnumerator,
};
pub use download::{DownloadDir, DownloadSink};
pub use pipeline::{
    encode_png, take_screenshot, try_take_screenshot, MediaDevices, StreamMetadata,
    VideoStream, SCREENSHOT_FILENAME,
};
pub use surface::UiSurface;

use serde::{Deserialize, Serialize};

/// One capturable screen, as handed to the UI surface.
///
/// Only valid for the capture attempt that asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSource {
    pub id: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Privileged bridge is not available in this context")]
    BridgeUnavailable,

    #[error("User denied screen capture")]
    ConsentDenied,

    #[error("No capturable screens")]
    NoSources,

    #[error("Video stream failed: {0}")]
    Stream(String),

    #[error("Stream reported a zero-sized frame ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Failed to save {}: {source}", path.display())]
    Save {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaptureError {
    /// Aborts the user chose (or that mean there is nothing to capture).
    /// These are not worth a diagnostic.
    pub fn is_silent(&self) -> bool {
        matches!(self, CaptureError::ConsentDenied | CaptureError::NoSources)
    }
}

/// Source id for a screen, in the `screen:<display>:0` form.
pub fn screen_source_id(display_id: u32) -> String {
    format!("screen:{}:0", display_id)
}

/// Display id encoded in a `screen:` source id.
pub fn parse_screen_source_id(source_id: &str) -> Option<u32> {
    let mut parts = source_id.split(':');
    match (parts.next(), parts.next()) {
        (Some("screen"), Some(display)) => display.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_round_trips_display_id() {
        let id = screen_source_id(69733382);
        assert_eq!(id, "screen:69733382:0");
        assert_eq!(parse_screen_source_id(&id), Some(69733382));
    }

    #[test]
    fn window_and_garbage_ids_are_rejected() {
        assert_eq!(parse_screen_source_id("window:1234:0"), None);
        assert_eq!(parse_screen_source_id("screen:main:0"), None);
        assert_eq!(parse_screen_source_id(""), None);
    }

    #[test]
    fn capture_source_serializes_as_id_and_name_only() {
        let source = CaptureSource {
            id: "screen:1:0".to_string(),
            name: "Built-in Display".to_string(),
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "screen:1:0", "name": "Built-in Display"})
        );
    }

    #[test]
    fn only_denial_and_empty_sources_are_silent() {
        assert!(CaptureError::ConsentDenied.is_silent());
        assert!(CaptureError::NoSources.is_silent());
        assert!(!CaptureError::BridgeUnavailable.is_silent());
        assert!(!CaptureError::Stream("gone".into()).is_silent());
    }
}
