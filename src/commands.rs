//! Tauri command handlers exposed to the webview.
//!
//! This is the complete IPC allow-list (see `build.rs` and
//! `capabilities/default.json`). The capture commands go through the same
//! [`BridgeClient`] the native UI surface uses, so the trusted side sees one
//! request stream regardless of where a request came from.

use crate::capture::{BridgeClient, CaptureSource, PrivilegedBridge};

/// Tauri command: ask the user whether the app may capture the screen.
///
/// Shows the Allow/Deny dialog every time; nothing is remembered.
#[tauri::command]
pub async fn request_screenshot_permission(
    bridge: tauri::State<'_, BridgeClient>,
) -> Result<bool, String> {
    bridge
        .request_screenshot_permission()
        .await
        .map_err(|e| e.to_string())
}

/// Tauri command: list capturable screens as `{id, name}` pairs.
#[tauri::command]
pub async fn get_screen_sources(
    bridge: tauri::State<'_, BridgeClient>,
) -> Result<Vec<CaptureSource>, String> {
    bridge.get_screen_sources().await.map_err(|e| e.to_string())
}

/// Tauri command: liveness probe for the page.
#[tauri::command]
pub fn ping() -> &'static str {
    "pong"
}
