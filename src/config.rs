//! Shell configuration.
//!
//! Values come from environment variables (optionally seeded from
//! `.env.local` / `.env` at startup). Anything missing or unparseable falls
//! back to the built-in default; configuration never stops the app.

use std::path::PathBuf;
use std::time::Duration;

/// Directory name under the platform data dir.
pub const APP_DIR_NAME: &str = "snapshot-shell";

/// Persisted geometry file name, inside the data dir.
pub const BOUNDS_FILE: &str = "window-bounds.json";

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 700;
pub const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_START_URL: &str = "http://localhost:3000";

pub const ENV_DATA_DIR: &str = "SNAPSHOT_SHELL_DATA_DIR";
pub const ENV_START_URL: &str = "SNAPSHOT_SHELL_START_URL";
pub const ENV_SAVE_DEBOUNCE_MS: &str = "SNAPSHOT_SHELL_SAVE_DEBOUNCE_MS";
pub const ENV_DOWNLOAD_DIR: &str = "SNAPSHOT_SHELL_DOWNLOAD_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    /// Application data directory; holds `window-bounds.json`.
    pub data_dir: PathBuf,
    /// Where captured screenshots are written.
    pub download_dir: PathBuf,
    /// Page loaded into every window.
    pub start_url: String,
    pub default_width: u32,
    pub default_height: u32,
    /// Quiescence window before a moved/resized window is persisted.
    pub save_debounce: Duration,
}

impl ShellConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = non_empty(lookup(ENV_DATA_DIR))
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let download_dir = non_empty(lookup(ENV_DOWNLOAD_DIR))
            .map(PathBuf::from)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| data_dir.clone());

        let start_url =
            non_empty(lookup(ENV_START_URL)).unwrap_or_else(|| DEFAULT_START_URL.to_string());

        let debounce_ms = match non_empty(lookup(ENV_SAVE_DEBOUNCE_MS)) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => ms,
                Err(e) => {
                    log::warn!(
                        "[CONFIG] Ignoring {}={:?}: {}; using {}ms",
                        ENV_SAVE_DEBOUNCE_MS,
                        raw,
                        e,
                        DEFAULT_SAVE_DEBOUNCE_MS
                    );
                    DEFAULT_SAVE_DEBOUNCE_MS
                }
            },
            None => DEFAULT_SAVE_DEBOUNCE_MS,
        };

        Self {
            data_dir,
            download_dir,
            start_url,
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            save_debounce: Duration::from_millis(debounce_ms),
        }
    }

    /// Full path to the persisted window geometry.
    pub fn bounds_path(&self) -> PathBuf {
        self.data_dir.join(BOUNDS_FILE)
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// `~/.local/share/snapshot-shell` on Linux,
/// `~/Library/Application Support/snapshot-shell` on macOS.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Load `.env.local`, then `.env`, from the working directory. First hit wins.
///
/// Runs before the logger exists (so `RUST_LOG` can come from the file),
/// hence `eprintln!`.
pub fn load_dotenv() {
    for env_file in [".env.local", ".env"] {
        let path = std::path::Path::new(env_file);
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ShellConfig::from_lookup(|_| None);
        assert_eq!(config.default_width, 1000);
        assert_eq!(config.default_height, 700);
        assert_eq!(config.save_debounce, Duration::from_millis(500));
        assert_eq!(config.start_url, "http://localhost:3000");
        assert!(config.data_dir.ends_with(APP_DIR_NAME));
        assert!(config.bounds_path().ends_with("window-bounds.json"));
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = ShellConfig::from_lookup(lookup_from(&[
            (ENV_DATA_DIR, "/tmp/shell-data"),
            (ENV_DOWNLOAD_DIR, "/tmp/shell-downloads"),
            (ENV_START_URL, "http://127.0.0.1:5173"),
            (ENV_SAVE_DEBOUNCE_MS, "250"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shell-data"));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/shell-downloads"));
        assert_eq!(config.start_url, "http://127.0.0.1:5173");
        assert_eq!(config.save_debounce, Duration::from_millis(250));
        assert_eq!(
            config.bounds_path(),
            PathBuf::from("/tmp/shell-data/window-bounds.json")
        );
    }

    #[test]
    fn bad_debounce_falls_back_to_default() {
        let config = ShellConfig::from_lookup(lookup_from(&[(ENV_SAVE_DEBOUNCE_MS, "soon")]));
        assert_eq!(config.save_debounce, Duration::from_millis(500));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = ShellConfig::from_lookup(lookup_from(&[
            (ENV_START_URL, "   "),
            (ENV_DATA_DIR, ""),
        ]));
        assert_eq!(config.start_url, DEFAULT_START_URL);
        assert!(config.data_dir.ends_with(APP_DIR_NAME));
    }
}
