//! The sandboxed UI surface.
//!
//! Holds a bridge handle (or none, when the page runs outside the shell)
//! plus the media and download collaborators. It has no other way to reach
//! the trusted process.

use super::bridge::PrivilegedBridge;
use super::download::DownloadSink;
use super::pipeline::{take_screenshot, MediaDevices};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct UiSurface {
    bridge: Option<Arc<dyn PrivilegedBridge>>,
    media: Arc<dyn MediaDevices>,
    downloads: Arc<dyn DownloadSink>,
}

impl UiSurface {
    pub fn new(
        bridge: Option<Arc<dyn PrivilegedBridge>>,
        media: Arc<dyn MediaDevices>,
        downloads: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            bridge,
            media,
            downloads,
        }
    }

    pub fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    /// Handler for the page's screenshot button.
    pub async fn on_screenshot_clicked(&self) -> Option<PathBuf> {
        take_screenshot(
            self.bridge.as_deref(),
            self.media.as_ref(),
            self.downloads.as_ref(),
        )
        .await
    }
}
