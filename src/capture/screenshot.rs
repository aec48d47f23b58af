//! Screen sources and frame capture using the `xcap` crate.
//!
//! This is the infrastructure layer; it talks to the OS. Streams only keep
//! the display id and look the monitor up again when grabbing, so nothing
//! platform-specific is held across an await.

use super::bridge::{BridgeError, SourceEnumerator};
use super::pipeline::{MediaDevices, StreamMetadata, VideoStream};
use super::{parse_screen_source_id, screen_source_id, CaptureError, CaptureSource};
use async_trait::async_trait;
use image::RgbaImage;
use xcap::Monitor;

/// Enumerates attached monitors.
pub struct XcapScreens;

impl SourceEnumerator for XcapScreens {
    fn screens(&self) -> Result<Vec<CaptureSource>, BridgeError> {
        let monitors = Monitor::all().map_err(|e| BridgeError::Enumeration(e.to_string()))?;

        let mut sources = Vec::with_capacity(monitors.len());
        for monitor in monitors {
            let id = match monitor.id() {
                Ok(id) => id,
                Err(e) => {
                    log::warn!("[CAPTURE] Skipping monitor without id: {}", e);
                    continue;
                }
            };
            let name = monitor
                .name()
                .ok()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Screen {}", sources.len() + 1));
            sources.push(CaptureSource {
                id: screen_source_id(id),
                name,
            });
        }
        Ok(sources)
    }
}

/// Opens single-monitor "streams".
pub struct XcapMedia;

#[async_trait]
impl MediaDevices for XcapMedia {
    async fn open_stream(&self, source_id: &str) -> Result<Box<dyn VideoStream>, CaptureError> {
        let display_id = parse_screen_source_id(source_id)
            .ok_or_else(|| CaptureError::Stream(format!("Not a screen source: {}", source_id)))?;
        find_monitor(display_id)?;
        log::debug!("[CAPTURE] Opened display {}", display_id);
        Ok(Box::new(MonitorStream {
            display_id,
            latest: None,
            live: true,
        }))
    }
}

/// Metadata becomes available with the first decoded frame, as with a
/// video element. Sizes come from the pixels, not the monitor's reported
/// (possibly scaled) dimensions.
struct MonitorStream {
    display_id: u32,
    latest: Option<RgbaImage>,
    live: bool,
}

impl MonitorStream {
    fn next_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        if !self.live {
            return Err(CaptureError::Stream("Stream already stopped".to_string()));
        }
        find_monitor(self.display_id)?
            .capture_image()
            .map_err(|e| CaptureError::Stream(e.to_string()))
    }
}

#[async_trait]
impl VideoStream for MonitorStream {
    async fn loaded_metadata(&mut self) -> Result<StreamMetadata, CaptureError> {
        let frame = self.next_frame()?;
        let (width, height) = frame.dimensions();
        self.latest = Some(frame);
        Ok(StreamMetadata { width, height })
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        match self.latest.take() {
            Some(frame) => Ok(frame),
            None => self.next_frame(),
        }
    }

    fn stop_tracks(&mut self) {
        self.live = false;
        self.latest = None;
    }
}

fn find_monitor(display_id: u32) -> Result<Monitor, CaptureError> {
    Monitor::all()
        .map_err(|e| CaptureError::Stream(format!("Failed to enumerate monitors: {}", e)))?
        .into_iter()
        .find(|m| m.id().ok() == Some(display_id))
        .ok_or_else(|| CaptureError::Stream(format!("Display {} is gone", display_id)))
}
