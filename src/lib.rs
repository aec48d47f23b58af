//! Snapshot Shell: desktop app shell.
//!
//! Two domains, both usable without a GUI:
//!   - geometry/  restore the window where it was, debounce saves of its bounds
//!   - capture/   consent-gated screenshots across a privileged bridge
//!
//! With the `desktop` feature, `shell.rs` wires them into a Tauri app and
//! `commands.rs` holds the IPC allow-list exposed to the webview.

pub mod capture;
#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod geometry;
#[cfg(feature = "desktop")]
mod shell;

#[cfg(feature = "desktop")]
pub use shell::run;
