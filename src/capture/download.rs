//! Local "download" of finished screenshots.
//!
//! Files go into a single directory (Downloads by default). An existing file
//! is never overwritten; the name gets a ` (n)` suffix instead, the way a
//! browser download would.

use super::CaptureError;
use std::path::{Path, PathBuf};

/// Destination for encoded screenshots.
pub trait DownloadSink: Send + Sync {
    /// Write `bytes` under `filename`, returning where it actually landed.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, CaptureError>;
}

#[derive(Debug, Clone)]
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DownloadDir {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, CaptureError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CaptureError::Save {
            path: self.dir.clone(),
            source: e,
        })?;
        let path = unique_path(&self.dir, filename);
        std::fs::write(&path, bytes).map_err(|e| CaptureError::Save {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

/// `dir/filename`, or the first free `dir/stem (n).ext`.
fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(filename);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_save_uses_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DownloadDir::new(dir.path());
        let path = sink.save("screenshot.png", b"png").unwrap();
        assert_eq!(path, dir.path().join("screenshot.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png");
    }

    #[test]
    fn repeated_saves_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DownloadDir::new(dir.path());
        let first = sink.save("screenshot.png", b"one").unwrap();
        let second = sink.save("screenshot.png", b"two").unwrap();
        let third = sink.save("screenshot.png", b"three").unwrap();

        assert_eq!(second, dir.path().join("screenshot (1).png"));
        assert_eq!(third, dir.path().join("screenshot (2).png"));
        assert_eq!(std::fs::read(first).unwrap(), b"one");
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DownloadDir::new(dir.path().join("Downloads"));
        let path = sink.save("screenshot.png", b"png").unwrap();
        assert!(path.starts_with(sink.dir()));
        assert!(path.exists());
    }
}
