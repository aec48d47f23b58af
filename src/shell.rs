//! Desktop shell glue: window creation, window events, app lifecycle.
//!
//! Adapts Tauri windows and monitors to the geometry traits and plugs the
//! native dialog into the capture bridge. No persistence or capture policy
//! lives here.

use crate::capture::screenshot::{XcapMedia, XcapScreens};
use crate::capture::{
    bridge_channel, BridgeClient, BridgeHost, ConsentGate, ConsentPrompt, DownloadDir,
    PrivilegedBridge, UiSurface,
};
use crate::config::{self, ShellConfig};
use crate::geometry::{
    restore_placement, DisplayTopology, FileGeometryStore, GeometryController, GeometryRecord,
    GeometryStore, InitialPlacement, WindowState, WorkArea,
};
use crate::commands;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tauri::{
    AppHandle, Listener, Manager, PhysicalPosition, PhysicalSize, RunEvent, WebviewUrl,
    WebviewWindow, WebviewWindowBuilder, WindowEvent,
};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};

/// Event the page emits when its screenshot button is pressed.
pub const SCREENSHOT_REQUESTED_EVENT: &str = "screenshot-requested";

const WINDOW_TITLE: &str = "Snapshot Shell";

/// Managed state shared by every window.
struct ShellState {
    config: ShellConfig,
    store: Arc<dyn GeometryStore>,
    runtime: tokio::runtime::Handle,
    window_seq: AtomicUsize,
}

/// `WindowState` over a Tauri window. Outer position, inner size.
struct TauriWindow(WebviewWindow);

impl WindowState for TauriWindow {
    fn bounds(&self) -> Result<GeometryRecord, String> {
        let position = self.0.outer_position().map_err(|e| e.to_string())?;
        let size = self.0.inner_size().map_err(|e| e.to_string())?;
        Ok(GeometryRecord::new(
            position.x,
            position.y,
            i32::try_from(size.width).map_err(|e| e.to_string())?,
            i32::try_from(size.height).map_err(|e| e.to_string())?,
        ))
    }

    fn is_minimized(&self) -> Result<bool, String> {
        self.0.is_minimized().map_err(|e| e.to_string())
    }

    fn is_maximized(&self) -> Result<bool, String> {
        self.0.is_maximized().map_err(|e| e.to_string())
    }
}

/// Work areas of the monitors attached right now.
struct TauriDisplays<'a>(&'a AppHandle);

impl DisplayTopology for TauriDisplays<'_> {
    fn work_areas(&self) -> Vec<WorkArea> {
        match self.0.available_monitors() {
            Ok(monitors) => monitors
                .iter()
                .map(|m| {
                    let area = m.work_area();
                    WorkArea::new(
                        area.position.x,
                        area.position.y,
                        i32::try_from(area.size.width).unwrap_or(i32::MAX),
                        i32::try_from(area.size.height).unwrap_or(i32::MAX),
                    )
                })
                .collect(),
            Err(e) => {
                log::warn!("[SHELL] Failed to enumerate monitors: {}", e);
                Vec::new()
            }
        }
    }
}

/// Consent via a native message box owned by the trusted process.
struct DialogConsent {
    app: AppHandle,
}

#[async_trait]
impl ConsentGate for DialogConsent {
    async fn ask(&self, prompt: &ConsentPrompt) -> bool {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.app
            .dialog()
            .message(prompt.message.clone())
            .title(prompt.title.clone())
            .kind(MessageDialogKind::Info)
            .buttons(MessageDialogButtons::OkCancelCustom(
                prompt.allow_label.clone(),
                prompt.deny_label.clone(),
            ))
            .show(move |allowed| {
                let _ = tx.send(allowed);
            });
        // Dialog torn down without an answer counts as Deny.
        rx.await.unwrap_or(false)
    }
}

/// Create a window, restoring saved geometry when it is still on-screen,
/// and attach a geometry controller to it.
fn open_window(app: &AppHandle) -> Result<WebviewWindow, Box<dyn std::error::Error>> {
    let state = app.state::<ShellState>();
    let config = &state.config;

    let placement = restore_placement(
        state.store.as_ref(),
        &TauriDisplays(app),
        (config.default_width, config.default_height),
    );

    let seq = state.window_seq.fetch_add(1, Ordering::SeqCst);
    let label = if seq == 0 {
        "main".to_string()
    } else {
        format!("main-{}", seq)
    };
    let url: tauri::Url = config
        .start_url
        .parse()
        .map_err(|e| format!("Invalid start URL '{}': {}", config.start_url, e))?;

    let restored = matches!(placement, InitialPlacement::Restored(_));
    let window = WebviewWindowBuilder::new(app, &label, WebviewUrl::External(url))
        .title(WINDOW_TITLE)
        .inner_size(f64::from(config.default_width), f64::from(config.default_height))
        .visible(!restored)
        .build()?;

    if let InitialPlacement::Restored(record) = placement {
        // Physical units, so a restored window lands on the same pixels
        // regardless of the display's scale factor.
        window.set_size(PhysicalSize::new(
            record.width.unsigned_abs(),
            record.height.unsigned_abs(),
        ))?;
        window.set_position(PhysicalPosition::new(record.x, record.y))?;
        window.show()?;
    }

    let controller = Arc::new(Mutex::new(GeometryController::new(
        Arc::new(TauriWindow(window.clone())),
        Arc::clone(&state.store),
        config.save_debounce,
        state.runtime.clone(),
    )));
    window.on_window_event(move |event| {
        let Ok(mut controller) = controller.lock() else {
            return;
        };
        match event {
            WindowEvent::Moved(_) => controller.on_moved(),
            WindowEvent::Resized(_) => controller.on_resized(),
            WindowEvent::CloseRequested { .. } => controller.on_close(),
            _ => {}
        }
    });

    log::info!("[SHELL] Opened window '{}'", label);
    Ok(window)
}

/// Run the screenshot flow whenever the page asks for it. The surface task
/// only holds a bridge client, never the host.
fn listen_for_screenshots(app: &AppHandle, bridge: BridgeClient, config: &ShellConfig) {
    let bridge: Arc<dyn PrivilegedBridge> = Arc::new(bridge);
    let surface = UiSurface::new(
        Some(bridge),
        Arc::new(XcapMedia),
        Arc::new(DownloadDir::new(config.download_dir.clone())),
    );
    app.listen(SCREENSHOT_REQUESTED_EVENT, move |_event| {
        let surface = surface.clone();
        tauri::async_runtime::spawn(async move {
            surface.on_screenshot_clicked().await;
        });
    });
}

/// Entry point, called by the Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    config::load_dotenv();
    env_logger::init();

    let config = ShellConfig::from_env();
    log::info!(
        "[CONFIG] Data dir {}, start URL {}",
        config.data_dir.display(),
        config.start_url
    );
    let store: Arc<dyn GeometryStore> = Arc::new(FileGeometryStore::new(config.bounds_path()));
    let (bridge, requests) = bridge_channel(8);

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(bridge.clone())
        .invoke_handler(tauri::generate_handler![
            commands::request_screenshot_permission,
            commands::get_screen_sources,
            commands::ping,
        ])
        .setup(move |app| {
            log::info!("Snapshot Shell starting up");

            let host = BridgeHost::new(
                DialogConsent {
                    app: app.handle().clone(),
                },
                XcapScreens,
            );
            tauri::async_runtime::spawn(host.serve(requests));

            // Window events arrive on the main thread; debounce timers need
            // a runtime handle to schedule onto.
            let runtime =
                tauri::async_runtime::block_on(async { tokio::runtime::Handle::current() });
            listen_for_screenshots(app.handle(), bridge, &config);
            app.manage(ShellState {
                config,
                store,
                runtime,
                window_seq: AtomicUsize::new(0),
            });

            open_window(app.handle())?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("Error building Snapshot Shell");

    app.run(|_app, event| match event {
        #[cfg(target_os = "macos")]
        RunEvent::Reopen {
            has_visible_windows: false,
            ..
        } => {
            if let Err(e) = open_window(_app) {
                log::error!("[SHELL] Failed to reopen window: {}", e);
            }
        }
        // macOS apps stay alive with no windows until Cmd+Q.
        RunEvent::ExitRequested { api, code: None, .. } if cfg!(target_os = "macos") => {
            api.prevent_exit();
        }
        _ => {}
    });
}
