//! Output surfaces: the region a response is rendered into, plus alerts.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Where outcomes land. `clear` + `insert_text` address the output region;
/// `alert` is the user-facing failure notice.
pub trait Surface: Send + Sync {
    fn clear(&self) -> io::Result<()>;
    fn insert_text(&self, text: &str) -> io::Result<()>;
    fn alert(&self, message: &str);
}

fn alert_stderr(message: &str) {
    let mut err = io::stderr().lock();
    let _ = writeln!(err, "alert: {}", message);
}

/// Body to stdout, alerts to stderr. Printed text cannot be taken back, so
/// `clear` does nothing.
#[derive(Debug, Default)]
pub struct StdoutSurface;

impl Surface for StdoutSurface {
    fn clear(&self) -> io::Result<()> {
        Ok(())
    }

    fn insert_text(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn alert(&self, message: &str) {
        alert_stderr(message);
    }
}

/// Output region backed by a file: `clear` truncates, `insert_text` appends.
#[derive(Debug)]
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Surface for FileSurface {
    fn clear(&self) -> io::Result<()> {
        fs::File::create(&self.path).map(|_| ())
    }

    fn insert_text(&self, text: &str) -> io::Result<()> {
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        f.write_all(text.as_bytes())
    }

    fn alert(&self, message: &str) {
        alert_stderr(message);
    }
}

/// One thing that happened on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Clear,
    Insert(String),
    Alert(String),
}

/// In-memory surface that records events in order. Used by tests and
/// anything that needs to inspect what a handler rendered.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.lock().clone()
    }

    /// Current region contents: everything inserted since the last clear.
    pub fn contents(&self) -> String {
        let mut s = String::new();
        for e in self.lock().iter() {
            match e {
                SurfaceEvent::Clear => s.clear(),
                SurfaceEvent::Insert(t) => s.push_str(t),
                SurfaceEvent::Alert(_) => {}
            }
        }
        s
    }

    pub fn alerts(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Alert(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SurfaceEvent>> {
        self.events.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Surface for RecordingSurface {
    fn clear(&self) -> io::Result<()> {
        self.lock().push(SurfaceEvent::Clear);
        Ok(())
    }

    fn insert_text(&self, text: &str) -> io::Result<()> {
        self.lock().push(SurfaceEvent::Insert(text.to_string()));
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.lock().push(SurfaceEvent::Alert(message.to_string()));
    }
}
