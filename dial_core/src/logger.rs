//! Operator journal: one plain-text line per event, rotated by age.

use std::cell::{Cell, RefCell};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dial_traits::Clock;

/// Best-effort sink; implementations must never fail the caller.
pub trait Logger {
    fn log(&self, message: &str);
}

/// Journal file that is copied to `<file>.backup` and restarted once the
/// active segment is older than `rotate_wait`.
pub struct RotatingFileLogger {
    path: PathBuf,
    backup: PathBuf,
    rotate_wait: Duration,
    clock: Arc<dyn Clock + Send + Sync>,
    first_write: Cell<Option<Instant>>,
}

impl RotatingFileLogger {
    pub fn new(
        path: impl Into<PathBuf>,
        rotate_wait: Duration,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let path = path.into();
        let backup = suffixed(&path, ".backup");
        Self {
            path,
            backup,
            rotate_wait,
            clock,
            first_write: Cell::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Truncate the journal and open a fresh segment with `banner`.
    pub fn start(&self, banner: &str) {
        let res = File::create(&self.path).and_then(|mut f| writeln!(f, "{banner}"));
        if let Err(e) = res {
            tracing::warn!(path = %self.path.display(), error = %e, "journal start failed");
        }
        self.first_write.set(Some(self.clock.now()));
    }

    /// Copy the active file over the backup (via a temp file so the backup is
    /// replaced in one rename), then truncate the active file.
    fn rotate(&self) -> std::io::Result<()> {
        if self.path.exists() {
            let tmp = suffixed(&self.path, ".backup.tmp");
            fs::copy(&self.path, &tmp)?;
            fs::rename(&tmp, &self.backup)?;
        }
        File::create(&self.path)?;
        Ok(())
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{message}")
    }
}

impl Logger for RotatingFileLogger {
    fn log(&self, message: &str) {
        let now = self.clock.now();
        let due = match self.first_write.get() {
            Some(t0) => now.saturating_duration_since(t0) > self.rotate_wait,
            None => {
                self.first_write.set(Some(now));
                false
            }
        };
        if due {
            match self.rotate() {
                Ok(()) => {
                    tracing::debug!(backup = %self.backup.display(), "journal rotated");
                    self.first_write.set(Some(now));
                }
                Err(e) => tracing::warn!(error = %e, "journal rotation failed"),
            }
        }
        if let Err(e) = self.append(message) {
            tracing::warn!(path = %self.path.display(), error = %e, "journal write failed");
        }
    }
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// In-memory journal; clones share the same lines.
#[derive(Clone, Default)]
pub struct MemoryLogger {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _message: &str) {}
}
