//! Build script for the snapshot-shell Tauri app.
//!
//! Only does work with the `desktop` feature. The app manifest lists every
//! command the webview may invoke; anything not granted in
//! `capabilities/default.json` is rejected by the Tauri runtime.

fn main() {
    #[cfg(feature = "desktop")]
    {
        let manifest = tauri_build::AppManifest::new().commands(&[
            "request_screenshot_permission",
            "get_screen_sources",
            "ping",
        ]);
        tauri_build::try_build(tauri_build::Attributes::new().app_manifest(manifest))
            .expect("Failed to run tauri-build");
    }
}
