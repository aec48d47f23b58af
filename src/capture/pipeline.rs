//! UI-side screenshot flow.
//!
//! consent → sources → open stream → wait for metadata → copy one frame →
//! stop tracks → encode PNG → save `screenshot.png`.
//!
//! Each step awaits the previous one; nothing runs concurrently and there is
//! no mid-flow cancellation. Every failure ends the attempt without touching
//! anything else: [`take_screenshot`] only ever yields a path or `None`.

use super::bridge::{BridgeError, PrivilegedBridge};
use super::download::DownloadSink;
use super::CaptureError;
use async_trait::async_trait;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;

pub const SCREENSHOT_FILENAME: &str = "screenshot.png";

/// Frame size reported by a stream once it is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
}

/// A live video capture bound to one source.
#[async_trait]
pub trait VideoStream: Send {
    /// Resolves once the stream knows its dimensions. Grabbing before this
    /// yields a zero-sized frame.
    async fn loaded_metadata(&mut self) -> Result<StreamMetadata, CaptureError>;

    /// The current frame.
    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError>;

    /// Release every track. Must be safe to call more than once.
    fn stop_tracks(&mut self);
}

/// Opens video-only streams by source id.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn open_stream(&self, source_id: &str) -> Result<Box<dyn VideoStream>, CaptureError>;
}

/// Run the whole flow, collapsing every failure to `None`.
///
/// A missing bridge is logged as an error. A denial or an empty source list
/// is expected and stays quiet.
pub async fn take_screenshot(
    bridge: Option<&dyn PrivilegedBridge>,
    media: &dyn MediaDevices,
    sink: &dyn DownloadSink,
) -> Option<PathBuf> {
    match try_take_screenshot(bridge, media, sink).await {
        Ok(path) => {
            log::info!("[CAPTURE] Screenshot saved to {}", path.display());
            Some(path)
        }
        Err(CaptureError::BridgeUnavailable) => {
            log::error!(
                "[CAPTURE] Privileged bridge not available; is the app running in the desktop shell?"
            );
            None
        }
        Err(e) if e.is_silent() => {
            log::debug!("[CAPTURE] Screenshot aborted: {}", e);
            None
        }
        Err(e) => {
            log::warn!("[CAPTURE] Screenshot failed: {}", e);
            None
        }
    }
}

/// Same flow as [`take_screenshot`], keeping the reason it stopped.
pub async fn try_take_screenshot(
    bridge: Option<&dyn PrivilegedBridge>,
    media: &dyn MediaDevices,
    sink: &dyn DownloadSink,
) -> Result<PathBuf, CaptureError> {
    let bridge = bridge.ok_or(CaptureError::BridgeUnavailable)?;

    let allowed = bridge
        .request_screenshot_permission()
        .await
        .map_err(|_| CaptureError::BridgeUnavailable)?;
    if !allowed {
        return Err(CaptureError::ConsentDenied);
    }

    let sources = match bridge.get_screen_sources().await {
        Ok(sources) => sources,
        Err(BridgeError::Closed) => return Err(CaptureError::BridgeUnavailable),
        Err(e) => {
            log::debug!("[CAPTURE] No source list: {}", e);
            return Err(CaptureError::NoSources);
        }
    };
    // First in enumeration order; no primary-display preference.
    let source = sources.into_iter().next().ok_or(CaptureError::NoSources)?;
    log::debug!("[CAPTURE] Using source '{}' ({})", source.name, source.id);

    let mut stream = media.open_stream(&source.id).await?;
    let frame = copy_one_frame(stream.as_mut()).await;
    stream.stop_tracks();
    let frame = frame?;

    let png = encode_png(&frame)?;
    sink.save(SCREENSHOT_FILENAME, &png)
}

/// Wait for metadata, then copy a single frame into a buffer of the
/// reported size.
async fn copy_one_frame(stream: &mut dyn VideoStream) -> Result<RgbaImage, CaptureError> {
    let StreamMetadata { width, height } = stream.loaded_metadata().await?;
    if width == 0 || height == 0 {
        return Err(CaptureError::EmptyFrame { width, height });
    }

    let frame = stream.grab_frame()?;
    let mut canvas = RgbaImage::new(width, height);
    image::imageops::replace(&mut canvas, &frame, 0, 0);
    Ok(canvas)
}

/// PNG-encode a frame.
pub fn encode_png(frame: &RgbaImage) -> Result<Vec<u8>, CaptureError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    frame
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;
    Ok(png_bytes)
}
