//! Window geometry controller.
//!
//! Drives persistence from window lifecycle events:
//!
//! 1. Creation: restore saved bounds if they still overlap a display,
//!    otherwise use the default size.
//! 2. Move / resize: (re)arm a single-shot debounce timer. A drag produces
//!    dozens of events; only the last one, after the window settles, is saved.
//! 3. Close: cancel the timer and save once, synchronously, so a
//!    move-then-close sequence isn't lost.
//!
//! Minimized and maximized windows report bounds that are wrong to restore,
//! so saves are skipped while the window is in either state.

use super::store::GeometryStore;
use super::types::{GeometryRecord, InitialPlacement};
use super::validate::is_usable;
use super::DisplayTopology;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Window-manager queries the controller needs.
pub trait WindowState: Send + Sync {
    /// Current outer position and inner size.
    fn bounds(&self) -> Result<GeometryRecord, String>;
    fn is_minimized(&self) -> Result<bool, String>;
    fn is_maximized(&self) -> Result<bool, String>;
}

/// Decide how a new window should be placed.
pub fn restore_placement(
    store: &dyn GeometryStore,
    topology: &dyn DisplayTopology,
    default_size: (u32, u32),
) -> InitialPlacement {
    let (width, height) = default_size;
    let Some(record) = store.load() else {
        log::info!("[GEOMETRY] No saved bounds, using default {}x{}", width, height);
        return InitialPlacement::Default { width, height };
    };

    let work_areas = topology.work_areas();
    if is_usable(&record, &work_areas) {
        log::info!(
            "[GEOMETRY] Restoring {}x{} at {},{}",
            record.width,
            record.height,
            record.x,
            record.y
        );
        InitialPlacement::Restored(record)
    } else {
        log::info!(
            "[GEOMETRY] Saved bounds {}x{} at {},{} are off-screen on {} display(s), using default",
            record.width,
            record.height,
            record.x,
            record.y,
            work_areas.len()
        );
        InitialPlacement::Default { width, height }
    }
}

/// Per-window persistence state. One instance per window; the pending timer
/// is owned here so each window debounces independently.
pub struct GeometryController<W: WindowState + 'static> {
    window: Arc<W>,
    store: Arc<dyn GeometryStore>,
    delay: Duration,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl<W: WindowState + 'static> GeometryController<W> {
    /// `runtime` is where debounce timers are scheduled. Window events
    /// usually arrive on the UI thread, outside any runtime context.
    pub fn new(
        window: Arc<W>,
        store: Arc<dyn GeometryStore>,
        delay: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            window,
            store,
            delay,
            runtime,
            pending: None,
        }
    }

    pub fn on_moved(&mut self) {
        self.schedule_save();
    }

    pub fn on_resized(&mut self) {
        self.schedule_save();
    }

    /// Cancel any pending save and persist the current bounds now.
    pub fn on_close(&mut self) {
        self.cancel_pending();
        persist_current_bounds(self.window.as_ref(), self.store.as_ref());
    }

    /// Whether a debounced save is armed and hasn't fired yet.
    pub fn has_pending_save(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn schedule_save(&mut self) {
        self.cancel_pending();

        let window = Arc::clone(&self.window);
        let store = Arc::clone(&self.store);
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            persist_current_bounds(window.as_ref(), store.as_ref());
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<W: WindowState + 'static> Drop for GeometryController<W> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Save the window's bounds unless it is minimized or maximized.
///
/// Returns whether a save was attempted.
fn persist_current_bounds(window: &dyn WindowState, store: &dyn GeometryStore) -> bool {
    match (window.is_minimized(), window.is_maximized()) {
        (Ok(false), Ok(false)) => {}
        (Ok(minimized), Ok(maximized)) => {
            log::debug!(
                "[GEOMETRY] Skipping save (minimized={}, maximized={})",
                minimized,
                maximized
            );
            return false;
        }
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("[GEOMETRY] Skipping save, window state unavailable: {}", e);
            return false;
        }
    }

    match window.bounds() {
        Ok(record) if record.is_well_formed() => {
            store.save(&record);
            true
        }
        Ok(record) => {
            log::debug!(
                "[GEOMETRY] Skipping save of degenerate bounds {}x{}",
                record.width,
                record.height
            );
            false
        }
        Err(e) => {
            log::warn!("[GEOMETRY] Skipping save, bounds unavailable: {}", e);
            false
        }
    }
}
