//! Audit sinks for keychain events.
//!
//! Sinks receive [`AuditEvent`]s, which only ever carry a logical name, an
//! outcome, or a status code. Sinks never fail the operation being audited.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use keyward_core::{AuditEntry, AuditEvent};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::error::Result;

/// Receives structured audit events.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Emits audit events as `tracing` records under the `keyward::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        match event {
            AuditEvent::KeychainOperation {
                operation,
                key_name,
                success,
            } => {
                info!(
                    target: "keyward::audit",
                    operation = operation.as_str(),
                    key_name = %key_name,
                    success,
                    "keychain operation"
                );
            }
            AuditEvent::KeychainError { code, context } => {
                warn!(target: "keyward::audit", error = code, context = %context, "keychain error");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: AuditEvent) {}
}

/// Collects events in memory for inspection in tests.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.lock().push(event);
    }
}

/// Appends one JSON [`AuditEntry`] per line to a file.
///
/// The file is created with mode `0600` on Unix.
pub struct FileAuditSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Open (or create) the audit file, creating parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: AuditEvent) {
        let entry = AuditEntry::new(event);
        let line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                warn!(path = %self.path.display(), "could not serialize audit entry: {e}");
                return;
            }
        };
        let mut file = self.file.lock();
        if let Err(e) = writeln!(file, "{line}") {
            warn!(path = %self.path.display(), "could not write audit entry: {e}");
        }
    }
}
